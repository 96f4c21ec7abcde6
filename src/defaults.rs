// FREQUENCY-DOMAIN RESPONSE SOLVER
// relative residual at which the shifted linear solve is converged
pub const SOLVER_TOLERANCE: f64 = 1.0e-7;
// Krylov subspace size before a restart
pub const SOLVER_RESTART: usize = 30;
// maximum number of restart cycles
pub const SOLVER_MAX_CYCLES: usize = 200;

// TIME-DOMAIN PROPAGATION
// rtol and atol of the adaptive integrator
pub const PROPAGATION_TOLERANCE: f64 = 1.0e-5;

// LOGGING
pub const VERBOSE: i8 = 0;
