//! Synthetic coupled-cluster states with diagonal EOM operators, shared by
//! the unit tests of several modules.

use super::{EomCc, EomOperator};
use crate::amplitudes::{CcAmplitudes, Sector};
use crate::c64;
use ndarray::prelude::*;

/// A fully decoupled EOM Hamiltonian: `H v = diag * v`.
#[derive(Debug, Clone)]
pub(crate) struct DiagonalEom {
    pub diag: Array1<f64>,
}

impl EomOperator<f64> for DiagonalEom {
    fn len(&self) -> usize {
        self.diag.len()
    }

    fn matvec(&self, v: ArrayView1<f64>) -> Array1<f64> {
        &self.diag * &v
    }
}

impl EomOperator<c64> for DiagonalEom {
    fn len(&self) -> usize {
        self.diag.len()
    }

    fn matvec(&self, v: ArrayView1<c64>) -> Array1<c64> {
        v.iter()
            .zip(self.diag.iter())
            .map(|(&z, &d)| z * d)
            .collect()
    }
}

/// Two-orbital (one occupied, one virtual) system with hand-picked
/// amplitudes and diagonal sector Hamiltonians.
pub(crate) struct ToyCc {
    amps: CcAmplitudes,
    ip_diag: Array1<f64>,
    ea_diag: Array1<f64>,
}

impl ToyCc {
    pub fn minimal() -> Self {
        let amps = minimal_amplitudes();
        let ip_len = Sector::Ip.len(amps.nocc(), amps.nvir());
        let ea_len = Sector::Ea.len(amps.nocc(), amps.nvir());
        ToyCc {
            amps,
            ip_diag: Array1::linspace(0.9, 1.7, ip_len),
            ea_diag: Array1::linspace(1.1, 2.3, ea_len),
        }
    }

    /// Variant with diagonals shifted to negative values so that real-time
    /// and imaginary-time propagation both stay bounded.
    pub fn decaying() -> Self {
        let mut toy = Self::minimal();
        toy.ip_diag.mapv_inplace(|d| -d);
        toy.ea_diag.mapv_inplace(|d| -d);
        toy
    }

    pub fn ip_diag(&self) -> ArrayView1<'_, f64> {
        self.ip_diag.view()
    }

    pub fn ea_diag(&self) -> ArrayView1<'_, f64> {
        self.ea_diag.view()
    }
}

impl EomCc for ToyCc {
    type Ip = DiagonalEom;
    type Ea = DiagonalEom;

    fn amplitudes(&self) -> &CcAmplitudes {
        &self.amps
    }

    fn make_ip(&self) -> DiagonalEom {
        DiagonalEom {
            diag: self.ip_diag.clone(),
        }
    }

    fn make_ea(&self) -> DiagonalEom {
        DiagonalEom {
            diag: self.ea_diag.clone(),
        }
    }
}

/// One occupied, one virtual orbital; every tensor has a single entry.
pub(crate) fn minimal_amplitudes() -> CcAmplitudes {
    CcAmplitudes::new(
        array![[0.1]],
        Array4::from_elem((1, 1, 1, 1), 0.05),
        array![[0.2]],
        Array4::from_elem((1, 1, 1, 1), 0.03),
    )
    .unwrap()
}

/// A larger space with distinct, deterministic amplitude entries. Used to
/// exercise the index bookkeeping of the builders and the packing.
pub(crate) fn dense_amplitudes(nocc: usize, nvir: usize) -> CcAmplitudes {
    let t1 = Array2::from_shape_fn((nocc, nvir), |(i, a)| 0.01 * (1.0 + i as f64) + 0.002 * a as f64);
    let t2 = Array4::from_shape_fn((nocc, nocc, nvir, nvir), |(i, j, a, b)| {
        0.001 * (1.0 + i as f64) - 0.002 * j as f64 + 0.003 * a as f64 + 0.0007 * b as f64
    });
    let l1 = Array2::from_shape_fn((nocc, nvir), |(i, a)| 0.015 * (1.0 + a as f64) - 0.004 * i as f64);
    let l2 = Array4::from_shape_fn((nocc, nocc, nvir, nvir), |(i, j, a, b)| {
        0.0008 * (1.0 + j as f64) + 0.0011 * i as f64 - 0.0005 * a as f64 + 0.0009 * b as f64
    });
    CcAmplitudes::new(t1, t2, l1, l2).unwrap()
}
