/*!

Assembly of the single-particle Green's function tensors.

[`GreensFunction`] orchestrates the frequency-domain linear solves and the
time-domain propagation for requested orbital index sets. All assembled
tensors are indexed `[bra, ket, point]`. The solver strategy is chosen at
construction; the EOM operator of a sector is built exactly once per
top-level call and shared across its whole sweep.

*/

use crate::amplitudes::{CcAmplitudes, Sector};
use crate::eom::{EomCc, EomOperator, ShiftedEomOperator};
use crate::settings::GfConfig;
use crate::solvers::{GMinRes, ResponseSolver};
use crate::vectors::{ea, ip};
use crate::{c64, GfError};
use itertools::iproduct;
use ndarray::prelude::*;

pub mod td;

pub use td::TimeDomainGf;

/// Driver for IP/EA Green's function evaluations.
pub struct GreensFunction<S = GMinRes> {
    solver: S,
    config: GfConfig,
}

impl GreensFunction<GMinRes> {
    /// Driver with the default configuration and the preconditioned
    /// minimum-residual solver.
    pub fn new() -> Self {
        Self::from_config(GfConfig::default())
    }

    pub fn from_config(config: GfConfig) -> Self {
        let solver = GMinRes::from_config(&config.solver);
        GreensFunction { solver, config }
    }
}

impl Default for GreensFunction<GMinRes> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ResponseSolver> GreensFunction<S> {
    /// Driver with an explicitly injected solver strategy.
    pub fn with_solver(solver: S, config: GfConfig) -> Self {
        GreensFunction { solver, config }
    }

    pub fn config(&self) -> &GfConfig {
        &self.config
    }

    /// IP-sector Green's function `G[p, q, w]` for bra orbitals `ps` and
    /// ket orbitals `qs` on the frequency grid `omegas`.
    pub fn solve_ip<C: EomCc>(
        &self,
        cc: &C,
        ps: &[usize],
        qs: &[usize],
        omegas: &[f64],
        broadening: f64,
    ) -> Result<Array3<c64>, GfError> {
        let amps = cc.amplitudes();
        check_orbitals(ps, amps.nmo())?;
        check_orbitals(qs, amps.nmo())?;
        let eom = cc.make_ip();
        let e = bra_matrix(amps, Sector::Ip, ps);
        let b = ket_matrix(amps, Sector::Ip, qs);
        self.solve_sector(&eom, e.view(), b.view(), omegas, broadening, 1.0, -1.0)
    }

    /// EA-sector Green's function `G[p, q, w]`.
    pub fn solve_ea<C: EomCc>(
        &self,
        cc: &C,
        ps: &[usize],
        qs: &[usize],
        omegas: &[f64],
        broadening: f64,
    ) -> Result<Array3<c64>, GfError> {
        let amps = cc.amplitudes();
        check_orbitals(ps, amps.nmo())?;
        check_orbitals(qs, amps.nmo())?;
        let eom = cc.make_ea();
        let e = bra_matrix(amps, Sector::Ea, ps);
        let b = ket_matrix(amps, Sector::Ea, qs);
        self.solve_sector(&eom, e.view(), b.view(), omegas, broadening, -1.0, 1.0)
    }

    /// IP-sector Green's function in the AO basis, restricted to the AO
    /// subset `ps` of the orbital coefficient matrix. The MO-basis bra/ket
    /// vectors of all orbitals are rebuilt on every call.
    pub fn solve_ip_ao<C: EomCc>(
        &self,
        cc: &C,
        ps: &[usize],
        omegas: &[f64],
        mo_coeff: ArrayView2<f64>,
        broadening: f64,
    ) -> Result<Array3<c64>, GfError> {
        let (e_ao, b_ao) = ao_matrices(cc.amplitudes(), Sector::Ip, ps, mo_coeff)?;
        let eom = cc.make_ip();
        self.solve_sector(&eom, e_ao.view(), b_ao.view(), omegas, broadening, 1.0, -1.0)
    }

    /// EA-sector Green's function in the AO basis.
    pub fn solve_ea_ao<C: EomCc>(
        &self,
        cc: &C,
        ps: &[usize],
        omegas: &[f64],
        mo_coeff: ArrayView2<f64>,
        broadening: f64,
    ) -> Result<Array3<c64>, GfError> {
        let (e_ao, b_ao) = ao_matrices(cc.amplitudes(), Sector::Ea, ps, mo_coeff)?;
        let eom = cc.make_ea();
        self.solve_sector(&eom, e_ao.view(), b_ao.view(), omegas, broadening, -1.0, 1.0)
    }

    /// Frequency trace of a single `(bra, ket)` orbital pair, IP sector.
    pub fn solve_ip_single<C: EomCc>(
        &self,
        cc: &C,
        p: usize,
        q: usize,
        omegas: &[f64],
        broadening: f64,
    ) -> Result<Array1<c64>, GfError> {
        let gf = self.solve_ip(cc, &[p], &[q], omegas, broadening)?;
        Ok(gf.slice(s![0, 0, ..]).to_owned())
    }

    /// Frequency trace of a single `(bra, ket)` orbital pair, EA sector.
    pub fn solve_ea_single<C: EomCc>(
        &self,
        cc: &C,
        p: usize,
        q: usize,
        omegas: &[f64],
        broadening: f64,
    ) -> Result<Array1<c64>, GfError> {
        let gf = self.solve_ea(cc, &[p], &[q], omegas, broadening)?;
        Ok(gf.slice(s![0, 0, ..]).to_owned())
    }

    /// Both sectors on the same grids, evaluated independently.
    pub fn solve_gf<C: EomCc>(
        &self,
        cc: &C,
        ps: &[usize],
        qs: &[usize],
        omegas: &[f64],
        broadening: f64,
    ) -> Result<(Array3<c64>, Array3<c64>), GfError> {
        Ok((
            self.solve_ip(cc, ps, qs, omegas, broadening)?,
            self.solve_ea(cc, ps, qs, omegas, broadening)?,
        ))
    }

    /// The shared frequency sweep. `e` holds one bra vector per row, `b`
    /// one ket vector per column; the shifted system is solved for every
    /// (ket, frequency) pair with the previous solution as the next
    /// initial guess.
    fn solve_sector<O: EomOperator<c64>>(
        &self,
        eom: &O,
        e: ArrayView2<f64>,
        b: ArrayView2<f64>,
        omegas: &[f64],
        broadening: f64,
        shift_sign: f64,
        proj_sign: f64,
    ) -> Result<Array3<c64>, GfError> {
        let dim = eom.len();
        let e_c: Array2<c64> = e.mapv(|x| c64::new(x, 0.0));
        let b_c: Array2<c64> = b.mapv(|x| c64::new(x, 0.0));
        let mut gf: Array3<c64> = Array3::zeros((e.nrows(), b.ncols(), omegas.len()));

        // The sweep starts from a zero guess; afterwards every solve is
        // warm-started from the previous solution, across kets as well.
        let mut x0: Array1<c64> = Array1::zeros(dim);
        let p0: Array1<c64> = Array1::ones(dim);

        for (iq, iw) in iproduct!(0..b_c.ncols(), 0..omegas.len()) {
            let shift = c64::new(shift_sign * omegas[iw], -broadening);
            let op = ShiftedEomOperator::new(eom, shift);
            let x = self
                .solver
                .solve(&op, b_c.column(iq), x0.view(), p0.view())?;
            let proj: Array1<c64> = e_c.dot(&x) * proj_sign;
            gf.slice_mut(s![.., iq, iw]).assign(&proj);
            x0 = x;
        }
        Ok(gf)
    }
}

/// One bra vector per row, shape `[ps.len(), sector_len]`.
pub(crate) fn bra_matrix(cc: &CcAmplitudes, sector: Sector, ps: &[usize]) -> Array2<f64> {
    let len = sector.len(cc.nocc(), cc.nvir());
    let mut e: Array2<f64> = Array2::zeros((ps.len(), len));
    for (row, &p) in ps.iter().enumerate() {
        let v = match sector {
            Sector::Ip => ip::bra_vector(cc, p),
            Sector::Ea => ea::bra_vector(cc, p),
        };
        e.row_mut(row).assign(&v);
    }
    e
}

/// One ket vector per column, shape `[sector_len, qs.len()]`.
pub(crate) fn ket_matrix(cc: &CcAmplitudes, sector: Sector, qs: &[usize]) -> Array2<f64> {
    let len = sector.len(cc.nocc(), cc.nvir());
    let mut b: Array2<f64> = Array2::zeros((len, qs.len()));
    for (col, &q) in qs.iter().enumerate() {
        let v = match sector {
            Sector::Ip => ip::ket_vector(cc, q),
            Sector::Ea => ea::ket_vector(cc, q),
        };
        b.column_mut(col).assign(&v);
    }
    b
}

/// Bra/ket vector sets of all molecular orbitals, rotated into the AO
/// basis and restricted to the subset `ps`.
pub(crate) fn ao_matrices(
    cc: &CcAmplitudes,
    sector: Sector,
    ps: &[usize],
    mo_coeff: ArrayView2<f64>,
) -> Result<(Array2<f64>, Array2<f64>), GfError> {
    check_orbitals(ps, mo_coeff.nrows())?;
    let all: Vec<usize> = (0..cc.nmo()).collect();
    let e_mo = bra_matrix(cc, sector, &all);
    let b_mo = ket_matrix(cc, sector, &all);
    let rows = crate::basis::coeff_rows(mo_coeff, ps);
    let e_ao = crate::basis::bra_mo_to_ao(rows.view(), e_mo.view());
    let b_ao = crate::basis::ket_mo_to_ao(b_mo.view(), rows.view());
    Ok((e_ao, b_ao))
}

pub(crate) fn check_orbitals(ps: &[usize], norb: usize) -> Result<(), GfError> {
    match ps.iter().find(|&&p| p >= norb) {
        Some(&p) => Err(GfError::OrbitalOutOfRange { p, norb }),
        None => Ok(()),
    }
}
