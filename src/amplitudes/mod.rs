use crate::GfError;
use ndarray::prelude::*;
use ndarray::ErrorKind;

/// Converged amplitudes of a coupled-cluster ground state. `t1`/`l1` are
/// the single excitation/de-excitation amplitudes of shape `[nocc, nvir]`,
/// `t2`/`l2` the doubles of shape `[nocc, nocc, nvir, nvir]`. The tensors
/// are read-only inputs to every routine of this crate.
#[derive(Debug, Clone)]
pub struct CcAmplitudes {
    pub t1: Array2<f64>,
    pub t2: Array4<f64>,
    pub l1: Array2<f64>,
    pub l2: Array4<f64>,
}

impl CcAmplitudes {
    /// Bundle the four amplitude tensors after checking that their shapes
    /// describe the same orbital space.
    pub fn new(
        t1: Array2<f64>,
        t2: Array4<f64>,
        l1: Array2<f64>,
        l2: Array4<f64>,
    ) -> Result<Self, GfError> {
        let (nocc, nvir) = t1.dim();
        let doubles = (nocc, nocc, nvir, nvir);
        if t2.dim() != doubles || l1.dim() != (nocc, nvir) || l2.dim() != doubles {
            return Err(ndarray::ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
        }
        Ok(CcAmplitudes { t1, t2, l1, l2 })
    }

    /// Number of occupied orbitals.
    pub fn nocc(&self) -> usize {
        self.t1.nrows()
    }

    /// Number of virtual orbitals.
    pub fn nvir(&self) -> usize {
        self.t1.ncols()
    }

    /// Total number of molecular orbitals.
    pub fn nmo(&self) -> usize {
        self.nocc() + self.nvir()
    }
}

/// A molecular orbital index split at the occupied/virtual boundary. The
/// classifier is the single place where the split happens; every vector
/// builder matches on the result instead of comparing indices itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orbital {
    /// Index into the occupied block, `0 <= i < nocc`.
    Occupied(usize),
    /// Index into the virtual block, `0 <= a < nvir`.
    Virtual(usize),
}

impl Orbital {
    /// Classify a global orbital index `p` in `[0, nocc + nvir)`. The
    /// boundary value `p == nocc` is the first virtual orbital.
    pub fn classify(p: usize, nocc: usize) -> Self {
        if p < nocc {
            Orbital::Occupied(p)
        } else {
            Orbital::Virtual(p - nocc)
        }
    }
}

/// Excitation manifold of the single-particle Green's function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    /// Ionization potential: one hole plus two-hole-one-particle space.
    Ip,
    /// Electron affinity: one particle plus two-particle-one-hole space.
    Ea,
}

impl Sector {
    /// Length of the rank-1 block of a sector vector.
    pub fn singles_len(self, nocc: usize, nvir: usize) -> usize {
        match self {
            Sector::Ip => nocc,
            Sector::Ea => nvir,
        }
    }

    /// Shape of the rank-3 block of a sector vector.
    pub fn doubles_dim(self, nocc: usize, nvir: usize) -> (usize, usize, usize) {
        match self {
            Sector::Ip => (nocc, nocc, nvir),
            Sector::Ea => (nocc, nvir, nvir),
        }
    }

    /// Total length of a packed sector vector.
    pub fn len(self, nocc: usize, nvir: usize) -> usize {
        let (d0, d1, d2) = self.doubles_dim(nocc, nvir);
        self.singles_len(nocc, nvir) + d0 * d1 * d2
    }
}
