//! Diagnostic output of the iterative solvers. Best-effort only: the log
//! level decides whether anything is emitted, and nothing here affects the
//! solver result.

use log::debug;

pub fn print_solve_start(strategy: &str, dim: usize, tolerance: f64) {
    debug!(
        "  Solving linear response problem ({}, dim = {}, tol = {:.1e})",
        strategy, dim, tolerance
    );
}

pub fn print_solver_residual(iter: usize, residual: f64) {
    debug!("    iter {: >4}  res = {:.3e}", iter, residual);
}
