use crate::defaults;
use crate::settings::SolverConfig;
use crate::solvers::utils::{print_solve_start, print_solver_residual};
use crate::solvers::{LinearOperator, ResponseSolver};
use crate::c64;
use crate::GfError;
use ndarray::prelude::*;
use num_traits::Zero;

/// Restarted GMRES with a Jacobi-style right preconditioner built from the
/// reference vector `p0`.
#[derive(Debug, Clone, PartialEq)]
pub struct GMinRes {
    pub tolerance: f64,
    pub restart: usize,
    pub max_cycles: usize,
}

impl GMinRes {
    pub fn new(tolerance: f64, restart: usize, max_cycles: usize) -> Self {
        GMinRes {
            tolerance,
            restart,
            max_cycles,
        }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(config.tolerance, config.restart, config.max_cycles)
    }
}

impl Default for GMinRes {
    fn default() -> Self {
        Self::new(
            defaults::SOLVER_TOLERANCE,
            defaults::SOLVER_RESTART,
            defaults::SOLVER_MAX_CYCLES,
        )
    }
}

impl ResponseSolver for GMinRes {
    fn solve<A: LinearOperator>(
        &self,
        op: &A,
        b: ArrayView1<c64>,
        x0: ArrayView1<c64>,
        p0: ArrayView1<c64>,
    ) -> Result<Array1<c64>, GfError> {
        // Entries of p0 close to zero are left unpreconditioned.
        let m_inv: Array1<c64> = p0.mapv(|z| {
            if z.norm() > f64::EPSILON {
                1.0 / z
            } else {
                c64::new(1.0, 0.0)
            }
        });
        print_solve_start("gminres", op.len(), self.tolerance);
        restarted_gmres(
            op,
            b,
            x0,
            Some(m_inv),
            self.tolerance,
            self.restart,
            self.max_cycles,
        )
    }
}

/// Plain restarted GMRES. The fallback strategy: `p0` is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Gmres {
    pub tolerance: f64,
    pub restart: usize,
    pub max_cycles: usize,
}

impl Gmres {
    pub fn new(tolerance: f64, restart: usize, max_cycles: usize) -> Self {
        Gmres {
            tolerance,
            restart,
            max_cycles,
        }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(config.tolerance, config.restart, config.max_cycles)
    }
}

impl Default for Gmres {
    fn default() -> Self {
        Self::new(
            defaults::SOLVER_TOLERANCE,
            defaults::SOLVER_RESTART,
            defaults::SOLVER_MAX_CYCLES,
        )
    }
}

impl ResponseSolver for Gmres {
    fn solve<A: LinearOperator>(
        &self,
        op: &A,
        b: ArrayView1<c64>,
        x0: ArrayView1<c64>,
        _p0: ArrayView1<c64>,
    ) -> Result<Array1<c64>, GfError> {
        print_solve_start("gmres", op.len(), self.tolerance);
        restarted_gmres(op, b, x0, None, self.tolerance, self.restart, self.max_cycles)
    }
}

/// Restarted GMRES over complex vectors, matrix-free. The Arnoldi basis is
/// built with modified Gram-Schmidt and the least-squares problem is kept
/// triangular with Givens rotations, so the residual is available at every
/// inner iteration. With `m_inv` the Krylov space is built for the
/// right-preconditioned operator `A M^{-1}`.
fn restarted_gmres<A: LinearOperator>(
    op: &A,
    b: ArrayView1<c64>,
    x0: ArrayView1<c64>,
    m_inv: Option<Array1<c64>>,
    tolerance: f64,
    restart: usize,
    max_cycles: usize,
) -> Result<Array1<c64>, GfError> {
    let n = op.len();
    let b_norm: f64 = norm(&b.to_owned());
    if b_norm == 0.0 {
        return Ok(Array1::zeros(n));
    }

    let mut x: Array1<c64> = x0.to_owned();
    let mut total_iters: usize = 0;

    for _cycle in 0..max_cycles {
        let r: Array1<c64> = &b - &op.apply(x.view());
        let beta: f64 = norm(&r);
        if beta <= tolerance * b_norm {
            return Ok(x);
        }

        // Arnoldi basis of the (preconditioned) Krylov space.
        let mut v: Vec<Array1<c64>> = vec![r / beta];
        let mut h: Array2<c64> = Array2::zeros((restart + 1, restart));
        let mut g: Array1<c64> = Array1::zeros(restart + 1);
        g[0] = c64::new(beta, 0.0);
        let mut cs: Vec<f64> = Vec::with_capacity(restart);
        let mut sn: Vec<c64> = Vec::with_capacity(restart);
        let mut k_used: usize = 0;

        for j in 0..restart {
            let z: Array1<c64> = match &m_inv {
                Some(m) => &v[j] * m,
                None => v[j].clone(),
            };
            let mut w: Array1<c64> = op.apply(z.view());

            // Modified Gram-Schmidt orthogonalization.
            for i in 0..=j {
                let hij: c64 = conj_dot(&v[i], &w);
                h[[i, j]] = hij;
                w.scaled_add(-hij, &v[i]);
            }
            let w_norm: f64 = norm(&w);
            h[[j + 1, j]] = c64::new(w_norm, 0.0);

            // Rotate the new column into triangular form.
            for i in 0..j {
                let (hi, hj) = rotate(cs[i], sn[i], h[[i, j]], h[[i + 1, j]]);
                h[[i, j]] = hi;
                h[[i + 1, j]] = hj;
            }
            let (c_new, s_new, r_val) = givens(h[[j, j]], h[[j + 1, j]]);
            h[[j, j]] = r_val;
            h[[j + 1, j]] = c64::zero();
            g[j + 1] = -s_new.conj() * g[j];
            g[j] = g[j] * c_new;
            cs.push(c_new);
            sn.push(s_new);

            k_used = j + 1;
            total_iters += 1;
            let residual: f64 = g[j + 1].norm() / b_norm;
            print_solver_residual(total_iters, residual);

            if residual <= tolerance || w_norm <= f64::EPSILON * b_norm {
                break;
            }
            v.push(w / w_norm);
        }

        // Back substitution for the subspace coefficients. A vanishing
        // pivot is an exact Krylov breakdown: the right-hand side has no
        // preimage in the subspace, so the component is either free or the
        // system is singular.
        let mut y: Array1<c64> = Array1::zeros(k_used);
        for i in (0..k_used).rev() {
            let mut s: c64 = g[i];
            for k in i + 1..k_used {
                s -= h[[i, k]] * y[k];
            }
            let pivot: c64 = h[[i, i]];
            if pivot.norm() <= f64::EPSILON {
                if s.norm() <= f64::EPSILON {
                    y[i] = c64::zero();
                    continue;
                }
                return Err(GfError::SolverNotConverged(total_iters as i32));
            }
            y[i] = s / pivot;
        }

        // Update the iterate, undoing the right preconditioning.
        let mut dz: Array1<c64> = Array1::zeros(n);
        for j in 0..k_used {
            dz.scaled_add(y[j], &v[j]);
        }
        if let Some(m) = &m_inv {
            dz = dz * m;
        }
        x += &dz;
    }

    let r: Array1<c64> = &b - &op.apply(x.view());
    if norm(&r) <= tolerance * b_norm {
        Ok(x)
    } else {
        Err(GfError::SolverNotConverged(total_iters as i32))
    }
}

fn norm(v: &Array1<c64>) -> f64 {
    v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

fn conj_dot(a: &Array1<c64>, b: &Array1<c64>) -> c64 {
    a.iter().zip(b.iter()).map(|(x, y)| x.conj() * y).sum()
}

/// Complex Givens rotation annihilating `h2`: returns `(c, s, r)` with
/// `c*h1 + s*h2 = r` and `-conj(s)*h1 + c*h2 = 0`.
fn givens(h1: c64, h2: c64) -> (f64, c64, c64) {
    let t: f64 = (h1.norm_sqr() + h2.norm_sqr()).sqrt();
    if t == 0.0 {
        return (1.0, c64::zero(), c64::zero());
    }
    let c: f64 = h1.norm() / t;
    let s: c64 = if h1.norm() > 0.0 {
        (h1 / h1.norm()) * h2.conj() / t
    } else {
        h2.conj() / t
    };
    let r: c64 = h1 * c + s * h2;
    (c, s, r)
}

fn rotate(c: f64, s: c64, a: c64, b: c64) -> (c64, c64) {
    (a * c + s * b, -s.conj() * a + b * c)
}
