use crate::amplitudes::CcAmplitudes;
use crate::solvers::LinearOperator;
use crate::c64;
use ndarray::prelude::*;

#[cfg(test)]
pub(crate) mod testkit;

/// Action of a sector-specific equation-of-motion Hamiltonian on a packed
/// sector vector. Implementations carry their precomputed intermediates,
/// are built once per Green's function evaluation and are shared read-only
/// across all frequency/time/orbital iterations of that evaluation.
///
/// The operator is applied to real vectors during imaginary-time
/// propagation and to complex vectors everywhere else, hence the scalar
/// type parameter.
pub trait EomOperator<T> {
    /// Dimension of the sector vector space.
    fn len(&self) -> usize;

    /// The matrix-vector product with the EOM Hamiltonian.
    fn matvec(&self, v: ArrayView1<T>) -> Array1<T>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The coupled-cluster state seam. An implementation exposes the converged
/// amplitudes and builds the IP/EA operators (including their
/// intermediates) on demand.
pub trait EomCc {
    type Ip: EomOperator<f64> + EomOperator<c64> + Sync;
    type Ea: EomOperator<f64> + EomOperator<c64> + Sync;

    /// The converged amplitude tensors of the reference solution.
    fn amplitudes(&self) -> &CcAmplitudes;

    /// Build the IP-sector operator. Intermediates are computed here, once.
    fn make_ip(&self) -> Self::Ip;

    /// Build the EA-sector operator. Intermediates are computed here, once.
    fn make_ea(&self) -> Self::Ea;
}

/// The shifted operator `A(v) = H v + shift * v` of the frequency-domain
/// linear response problem. Holding the shift explicitly avoids capturing
/// the frequency loop variable in a closure.
pub struct ShiftedEomOperator<'a, O> {
    eom: &'a O,
    shift: c64,
}

impl<'a, O: EomOperator<c64>> ShiftedEomOperator<'a, O> {
    pub fn new(eom: &'a O, shift: c64) -> Self {
        ShiftedEomOperator { eom, shift }
    }
}

impl<O: EomOperator<c64>> LinearOperator for ShiftedEomOperator<'_, O> {
    fn len(&self) -> usize {
        self.eom.len()
    }

    fn apply(&self, v: ArrayView1<c64>) -> Array1<c64> {
        let mut av: Array1<c64> = self.eom.matvec(v);
        av.scaled_add(self.shift, &v);
        av
    }
}
