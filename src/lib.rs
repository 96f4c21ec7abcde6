/*!

# ccgf

Single-particle Green's functions (ionization-potential and electron-affinity
sectors) for a correlated coupled-cluster wavefunction.

The crate is an orchestration layer: the converged amplitudes and the
equation-of-motion (EOM) matrix-vector products are supplied from outside
through the [`EomCc`](crate::eom::EomCc) and
[`EomOperator`](crate::eom::EomOperator) traits. On top of these seams the
crate builds the sector-specific bra/ket vectors, drives a shifted linear
solve for every frequency point or an ODE propagation for every time point,
and assembles the results into `[bra, ket, point]` tensors in either the
molecular-orbital or the atomic-orbital basis.

*/

use thiserror::Error;

pub mod amplitudes;
pub mod basis;
pub mod defaults;
pub mod eom;
pub mod greens;
pub mod propagation;
pub mod settings;
pub mod solvers;
pub mod utils;
pub mod vectors;

pub use amplitudes::{CcAmplitudes, Orbital, Sector};
pub use eom::{EomCc, EomOperator, ShiftedEomOperator};
pub use greens::{GreensFunction, TimeDomainGf};
pub use propagation::TimeMode;
pub use settings::GfConfig;
pub use solvers::{GMinRes, Gmres, ResponseSolver};

/// Complex double-precision scalar used for all frequency-domain quantities.
#[allow(non_camel_case_types)]
pub type c64 = num_complex::Complex64;

/// Errors of the Green's function routines.
///
/// Shape mismatches of the underlying array operations are passed through
/// unmodified; none of the failures below is retried or recovered locally.
#[derive(Debug, Error)]
pub enum GfError {
    /// The requested time-domain mode is not one of `"re"` or `"im"`.
    #[error("unknown time mode '{0}', expected \"re\" or \"im\"")]
    UnknownTimeMode(String),
    /// The iterative linear solver did not reach the requested residual.
    #[error("linear response solver did not converge (info = {0})")]
    SolverNotConverged(i32),
    /// An orbital index lies outside the orbital space.
    #[error("orbital index {p} out of range for {norb} orbitals")]
    OrbitalOutOfRange { p: usize, norb: usize },
    /// The sampling times are empty or not strictly increasing.
    #[error("time grid must be non-empty and strictly increasing")]
    TimeGrid,
    /// The adaptive integrator ran out of step size.
    #[error("ode integration step size underflow at t = {0}")]
    StepSizeUnderflow(f64),
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
