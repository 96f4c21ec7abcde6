//! Time-domain Green's functions. For every ket orbital the b-vector is
//! propagated under the time-independent EOM operator and the sampled
//! trajectory is projected onto the bra e-vectors. Real-time propagation
//! produces a complex tensor, imaginary-time propagation a real one.

use crate::amplitudes::Sector;
use crate::eom::{EomCc, EomOperator};
use crate::greens::{ao_matrices, bra_matrix, check_orbitals, ket_matrix, GreensFunction};
use crate::propagation::{integrate_sampled, GfScalar, TimeMode};
use crate::solvers::ResponseSolver;
use crate::{c64, GfError};
use ndarray::prelude::*;
use rayon::prelude::*;

/// Time-domain Green's function tensor `[bra, ket, time]`. The variant
/// encodes the arithmetic domain of the requested mode.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeDomainGf {
    Real(Array3<f64>),
    Complex(Array3<c64>),
}

impl TimeDomainGf {
    pub fn is_real(&self) -> bool {
        matches!(self, TimeDomainGf::Real(_))
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        match self {
            TimeDomainGf::Real(a) => a.dim(),
            TimeDomainGf::Complex(a) => a.dim(),
        }
    }

    pub fn as_real(&self) -> Option<&Array3<f64>> {
        match self {
            TimeDomainGf::Real(a) => Some(a),
            TimeDomainGf::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&Array3<c64>> {
        match self {
            TimeDomainGf::Complex(a) => Some(a),
            TimeDomainGf::Real(_) => None,
        }
    }
}

impl<S: ResponseSolver> GreensFunction<S> {
    /// IP-sector time-domain Green's function for bra orbitals `ps` and
    /// ket orbitals `qs`, sampled at `times`.
    pub fn td_ip<C: EomCc>(
        &self,
        cc: &C,
        ps: &[usize],
        qs: &[usize],
        times: &[f64],
        mode: TimeMode,
    ) -> Result<TimeDomainGf, GfError> {
        let amps = cc.amplitudes();
        check_orbitals(ps, amps.nmo())?;
        check_orbitals(qs, amps.nmo())?;
        let e = bra_matrix(amps, Sector::Ip, ps);
        let b = ket_matrix(amps, Sector::Ip, qs);
        let eom = cc.make_ip();
        self.propagate(&eom, Sector::Ip, e.view(), b.view(), times, mode)
    }

    /// EA-sector time-domain Green's function.
    pub fn td_ea<C: EomCc>(
        &self,
        cc: &C,
        ps: &[usize],
        qs: &[usize],
        times: &[f64],
        mode: TimeMode,
    ) -> Result<TimeDomainGf, GfError> {
        let amps = cc.amplitudes();
        check_orbitals(ps, amps.nmo())?;
        check_orbitals(qs, amps.nmo())?;
        let e = bra_matrix(amps, Sector::Ea, ps);
        let b = ket_matrix(amps, Sector::Ea, qs);
        let eom = cc.make_ea();
        self.propagate(&eom, Sector::Ea, e.view(), b.view(), times, mode)
    }

    /// IP-sector time-domain Green's function in the AO basis. The
    /// MO-basis vector sets are rebuilt on every call.
    pub fn td_ip_ao<C: EomCc>(
        &self,
        cc: &C,
        ps: &[usize],
        times: &[f64],
        mo_coeff: ArrayView2<f64>,
        mode: TimeMode,
    ) -> Result<TimeDomainGf, GfError> {
        let (e_ao, b_ao) = ao_matrices(cc.amplitudes(), Sector::Ip, ps, mo_coeff)?;
        let eom = cc.make_ip();
        self.propagate(&eom, Sector::Ip, e_ao.view(), b_ao.view(), times, mode)
    }

    /// EA-sector time-domain Green's function in the AO basis.
    pub fn td_ea_ao<C: EomCc>(
        &self,
        cc: &C,
        ps: &[usize],
        times: &[f64],
        mo_coeff: ArrayView2<f64>,
        mode: TimeMode,
    ) -> Result<TimeDomainGf, GfError> {
        let (e_ao, b_ao) = ao_matrices(cc.amplitudes(), Sector::Ea, ps, mo_coeff)?;
        let eom = cc.make_ea();
        self.propagate(&eom, Sector::Ea, e_ao.view(), b_ao.view(), times, mode)
    }

    /// Mode dispatch: the propagation factor is `+i`/`-i` (IP/EA) in real
    /// time and `+1`/`-1` in imaginary time.
    fn propagate<O>(
        &self,
        eom: &O,
        sector: Sector,
        e: ArrayView2<f64>,
        b: ArrayView2<f64>,
        times: &[f64],
        mode: TimeMode,
    ) -> Result<TimeDomainGf, GfError>
    where
        O: EomOperator<f64> + EomOperator<c64> + Sync,
    {
        let tol = self.config().propagation.tolerance;
        match mode {
            TimeMode::Imaginary => {
                let factor: f64 = match sector {
                    Sector::Ip => 1.0,
                    Sector::Ea => -1.0,
                };
                Ok(TimeDomainGf::Real(propagate_sector(
                    eom, factor, e, b, times, tol,
                )?))
            }
            TimeMode::Real => {
                let factor: c64 = match sector {
                    Sector::Ip => c64::new(0.0, 1.0),
                    Sector::Ea => c64::new(0.0, -1.0),
                };
                Ok(TimeDomainGf::Complex(propagate_sector(
                    eom, factor, e, b, times, tol,
                )?))
            }
        }
    }
}

/// Propagate every ket column and project the sampled trajectories onto
/// the bra rows. The ket columns are independent and run in parallel; the
/// operator is shared read-only.
fn propagate_sector<T, O>(
    eom: &O,
    factor: T,
    e: ArrayView2<f64>,
    b: ArrayView2<f64>,
    times: &[f64],
    tol: f64,
) -> Result<Array3<T>, GfError>
where
    T: GfScalar,
    O: EomOperator<T> + Sync,
{
    let e_t: Array2<T> = e.mapv(T::from_re);
    let (nbra, nket, nt) = (e.nrows(), b.ncols(), times.len());

    let blocks: Vec<Array2<T>> = (0..nket)
        .into_par_iter()
        .map(|iq| {
            let y0: Array1<T> = b.column(iq).mapv(T::from_re);
            let samples =
                integrate_sampled(|_t, y| eom.matvec(y) * factor, times, y0, tol, tol)?;
            Ok(e_t.dot(&samples))
        })
        .collect::<Result<Vec<_>, GfError>>()?;

    let mut gf: Array3<T> = Array3::zeros((nbra, nket, nt));
    for (iq, block) in blocks.into_iter().enumerate() {
        gf.slice_mut(s![.., iq, ..]).assign(&block);
    }
    Ok(gf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eom::testkit::ToyCc;
    use crate::greens::{bra_matrix, ket_matrix};
    use approx::assert_abs_diff_eq;
    use itertools::iproduct;

    const TIMES: [f64; 4] = [0.0, 0.1, 0.35, 0.6];

    #[test]
    fn imaginary_mode_is_structurally_real() {
        let toy = ToyCc::decaying();
        let driver = GreensFunction::new();
        let gf = driver
            .td_ip(&toy, &[0, 1], &[0, 1], &TIMES, TimeMode::Imaginary)
            .unwrap();
        assert!(gf.is_real());
        assert_eq!(gf.dim(), (2, 2, 4));
    }

    #[test]
    fn real_mode_is_structurally_complex() {
        let toy = ToyCc::decaying();
        let driver = GreensFunction::new();
        let gf = driver
            .td_ip(&toy, &[0], &[0], &TIMES, TimeMode::Real)
            .unwrap();
        assert!(!gf.is_real());
        assert_eq!(gf.dim(), (1, 1, 4));
    }

    #[test]
    fn imaginary_time_ip_matches_closed_form() {
        let toy = ToyCc::decaying();
        let driver = GreensFunction::new();
        let gf = driver
            .td_ip(&toy, &[0, 1], &[0, 1], &TIMES, TimeMode::Imaginary)
            .unwrap();
        let gf = gf.as_real().unwrap();

        // decoupled operator: G[p,q,t] = sum_k e_p[k] exp(d_k t) b_q[k]
        let amps = toy.amplitudes();
        let e = bra_matrix(amps, Sector::Ip, &[0, 1]);
        let b = ket_matrix(amps, Sector::Ip, &[0, 1]);
        let d = toy.ip_diag();
        for (p, q, it) in iproduct!(0..2, 0..2, 0..TIMES.len()) {
            let expected: f64 = (0..d.len())
                .map(|k| e[[p, k]] * (d[k] * TIMES[it]).exp() * b[[k, q]])
                .sum();
            assert_abs_diff_eq!(gf[[p, q, it]], expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn real_time_ea_matches_closed_form() {
        let toy = ToyCc::minimal();
        let driver = GreensFunction::new();
        let gf = driver
            .td_ea(&toy, &[0, 1], &[0, 1], &TIMES, TimeMode::Real)
            .unwrap();
        let gf = gf.as_complex().unwrap();

        // factor -i: G[p,q,t] = sum_k e_p[k] exp(-i d_k t) b_q[k]
        let amps = toy.amplitudes();
        let e = bra_matrix(amps, Sector::Ea, &[0, 1]);
        let b = ket_matrix(amps, Sector::Ea, &[0, 1]);
        let d = toy.ea_diag();
        for (p, q, it) in iproduct!(0..2, 0..2, 0..TIMES.len()) {
            let expected: c64 = (0..d.len())
                .map(|k| c64::new(0.0, -d[k] * TIMES[it]).exp() * e[[p, k]] * b[[k, q]])
                .sum();
            assert_abs_diff_eq!(gf[[p, q, it]].re, expected.re, epsilon = 1e-4);
            assert_abs_diff_eq!(gf[[p, q, it]].im, expected.im, epsilon = 1e-4);
        }
    }

    #[test]
    fn ao_identity_matches_mo_propagation() {
        let toy = ToyCc::decaying();
        let driver = GreensFunction::new();
        let mo_coeff: Array2<f64> = Array2::eye(2);
        let ao = driver
            .td_ip_ao(&toy, &[0, 1], &TIMES, mo_coeff.view(), TimeMode::Imaginary)
            .unwrap();
        let mo = driver
            .td_ip(&toy, &[0, 1], &[0, 1], &TIMES, TimeMode::Imaginary)
            .unwrap();
        assert_eq!(ao, mo);
    }
}
