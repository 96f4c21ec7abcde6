/*!

Time propagation of sector vectors under the time-independent EOM
Hamiltonian.

[`integrate_sampled`] integrates `dy/dt = f(t, y)` with an embedded
Cash-Karp 4(5) Runge-Kutta scheme and returns the solution sampled exactly
at the caller-supplied times. The integrator is generic over the scalar so
that imaginary-time propagation runs in real arithmetic and real-time
propagation in complex arithmetic.

*/

use crate::c64;
use crate::GfError;
use ndarray::prelude::*;
use ndarray::{LinalgScalar, ScalarOperand};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Step-size controller of the embedded scheme.
const SAFETY: f64 = 0.9;
const MIN_SCALE: f64 = 0.2;
const MAX_SCALE: f64 = 5.0;

/// Whether the Green's function is propagated in real or imaginary time.
/// Real time requires complex arithmetic, imaginary time stays real.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeMode {
    #[serde(rename = "re")]
    Real,
    #[serde(rename = "im")]
    Imaginary,
}

impl FromStr for TimeMode {
    type Err = GfError;

    fn from_str(s: &str) -> Result<Self, GfError> {
        match s {
            "re" => Ok(TimeMode::Real),
            "im" => Ok(TimeMode::Imaginary),
            other => Err(GfError::UnknownTimeMode(other.to_string())),
        }
    }
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeMode::Real => write!(f, "re"),
            TimeMode::Imaginary => write!(f, "im"),
        }
    }
}

/// Scalar types a sector vector can be propagated in.
pub trait GfScalar: LinalgScalar + ScalarOperand + Send + Sync + 'static {
    fn from_re(x: f64) -> Self;
    fn modulus(self) -> f64;
}

impl GfScalar for f64 {
    fn from_re(x: f64) -> Self {
        x
    }
    fn modulus(self) -> f64 {
        self.abs()
    }
}

impl GfScalar for c64 {
    fn from_re(x: f64) -> Self {
        c64::new(x, 0.0)
    }
    fn modulus(self) -> f64 {
        self.norm()
    }
}

/// Integrate `dy/dt = rhs(t, y)` from `times[0]` to `times[times.len()-1]`
/// and sample the solution exactly at every entry of `times`. Returns the
/// samples as columns of a `[dim, times.len()]` array.
///
/// `times` must be strictly increasing; the first entry is returned as-is.
/// `rtol`/`atol` control the per-component error of the embedded scheme.
pub fn integrate_sampled<T, F>(
    rhs: F,
    times: &[f64],
    y0: Array1<T>,
    rtol: f64,
    atol: f64,
) -> Result<Array2<T>, GfError>
where
    T: GfScalar,
    F: Fn(f64, ArrayView1<T>) -> Array1<T>,
{
    if times.is_empty() || times.windows(2).any(|w| w[1] <= w[0]) {
        return Err(GfError::TimeGrid);
    }
    let dim = y0.len();
    let mut samples: Array2<T> = Array2::zeros((dim, times.len()));
    samples.column_mut(0).assign(&y0);
    if times.len() == 1 {
        return Ok(samples);
    }

    let span: f64 = times[times.len() - 1] - times[0];
    let min_step: f64 = span * 1.0e-12;
    let mut h: f64 = span / 100.0;
    let mut t: f64 = times[0];
    let mut y: Array1<T> = y0;

    for (col, &t_target) in times.iter().enumerate().skip(1) {
        while t < t_target {
            let h_step: f64 = h.min(t_target - t);
            let (y_new, err) = cash_karp_step(&rhs, t, &y, h_step);

            // Scaled RMS error of the embedded pair.
            let mut acc: f64 = 0.0;
            for ((e, yo), yn) in err.iter().zip(y.iter()).zip(y_new.iter()) {
                let scale: f64 = atol + rtol * yo.modulus().max(yn.modulus());
                let q: f64 = e.modulus() / scale;
                acc += q * q;
            }
            let err_norm: f64 = (acc / dim as f64).sqrt();

            if err_norm <= 1.0 {
                t += h_step;
                y = y_new;
                let scale: f64 = if err_norm == 0.0 {
                    MAX_SCALE
                } else {
                    (SAFETY * err_norm.powf(-0.2)).clamp(MIN_SCALE, MAX_SCALE)
                };
                h = (h_step * scale).max(min_step);
            } else {
                h = h_step * (SAFETY * err_norm.powf(-0.25)).clamp(MIN_SCALE, 1.0);
                if h < min_step {
                    return Err(GfError::StepSizeUnderflow(t));
                }
            }
        }
        samples.column_mut(col).assign(&y);
    }
    Ok(samples)
}

/// One embedded Cash-Karp step: returns the 5th-order solution and the
/// difference to the embedded 4th-order one.
fn cash_karp_step<T, F>(rhs: &F, t: f64, y: &Array1<T>, h: f64) -> (Array1<T>, Array1<T>)
where
    T: GfScalar,
    F: Fn(f64, ArrayView1<T>) -> Array1<T>,
{
    let s = |x: f64| T::from_re(x * h);

    let k1 = rhs(t, y.view());
    let y2 = y + &(&k1 * s(1.0 / 5.0));
    let k2 = rhs(t + h / 5.0, y2.view());
    let y3 = y + &(&k1 * s(3.0 / 40.0)) + &(&k2 * s(9.0 / 40.0));
    let k3 = rhs(t + 3.0 * h / 10.0, y3.view());
    let y4 = y + &(&k1 * s(3.0 / 10.0)) + &(&k2 * s(-9.0 / 10.0)) + &(&k3 * s(6.0 / 5.0));
    let k4 = rhs(t + 3.0 * h / 5.0, y4.view());
    let y5 = y
        + &(&k1 * s(-11.0 / 54.0))
        + &(&k2 * s(5.0 / 2.0))
        + &(&k3 * s(-70.0 / 27.0))
        + &(&k4 * s(35.0 / 27.0));
    let k5 = rhs(t + h, y5.view());
    let y6 = y
        + &(&k1 * s(1631.0 / 55296.0))
        + &(&k2 * s(175.0 / 512.0))
        + &(&k3 * s(575.0 / 13824.0))
        + &(&k4 * s(44275.0 / 110592.0))
        + &(&k5 * s(253.0 / 4096.0));
    let k6 = rhs(t + 7.0 * h / 8.0, y6.view());

    let y_new = y
        + &(&k1 * s(37.0 / 378.0))
        + &(&k3 * s(250.0 / 621.0))
        + &(&k4 * s(125.0 / 594.0))
        + &(&k6 * s(512.0 / 1771.0));
    let err = &k1 * s(37.0 / 378.0 - 2825.0 / 27648.0)
        + &(&k3 * s(250.0 / 621.0 - 18575.0 / 48384.0))
        + &(&k4 * s(125.0 / 594.0 - 13525.0 / 55296.0))
        + &(&k5 * s(-277.0 / 14336.0))
        + &(&k6 * s(512.0 / 1771.0 - 1.0 / 4.0));

    (y_new, err)
}
