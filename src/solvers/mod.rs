/*!

Iterative solvers for the shifted linear response problem
`(H + shift) x = b`.

The solver strategy is injected into the Green's function driver at
construction time. Two strategies exist: [`GMinRes`], a restarted GMRES
with a diagonal right preconditioner assembled from the reference vector
`p0`, and [`Gmres`], the plain restarted variant that ignores `p0`. Both
treat the operator as a black box behind [`LinearOperator`] and fail hard
with the iteration count when the residual target is not reached.

*/

use crate::c64;
use crate::GfError;
use ndarray::prelude::*;

mod gmres;
pub mod utils;

pub use gmres::{GMinRes, Gmres};

/// A linear operator over packed sector vectors, applied matrix-free.
pub trait LinearOperator {
    /// Dimension of the vector space.
    fn len(&self) -> usize;

    /// The product `A v`.
    fn apply(&self, v: ArrayView1<c64>) -> Array1<c64>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A solver strategy for one shifted linear system. `x0` is the warm-start
/// guess carried over from the previous frequency point; `p0` is a constant
/// reference vector that preconditioner-based strategies may use and others
/// ignore.
pub trait ResponseSolver {
    fn solve<A: LinearOperator>(
        &self,
        op: &A,
        b: ArrayView1<c64>,
        x0: ArrayView1<c64>,
        p0: ArrayView1<c64>,
    ) -> Result<Array1<c64>, GfError>;
}
