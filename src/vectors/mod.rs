/*!

Bra/ket vectors of the single-particle Green's function.

The [`ip`] and [`ea`] submodules build the sector-specific amplitude blocks
from the coupled-cluster tensors; [`pack`] and [`unpack`] map between the
structured `(rank1, rank3)` form and the flat vectors the solvers and the
propagator operate on. Packing is a plain concatenation of the rank-1 block
with the row-major ravel of the rank-3 block, so `unpack(pack(r1, r3))`
reproduces the blocks exactly.

*/

use crate::amplitudes::Sector;
use crate::GfError;
use ndarray::prelude::*;
use ndarray::ErrorKind;

pub mod ea;
pub mod ip;

/// Flatten a `(rank1, rank3)` amplitude pair into one sector vector.
pub fn pack<T: Clone>(r1: ArrayView1<T>, r3: ArrayView3<T>) -> Array1<T> {
    let mut flat: Vec<T> = Vec::with_capacity(r1.len() + r3.len());
    flat.extend(r1.iter().cloned());
    flat.extend(r3.iter().cloned());
    Array1::from(flat)
}

/// Split a flat sector vector back into its `(rank1, rank3)` blocks. The
/// exact inverse of [`pack`] for vectors of the correct sector length.
pub fn unpack<T: Clone>(
    sector: Sector,
    v: ArrayView1<T>,
    nocc: usize,
    nvir: usize,
) -> Result<(Array1<T>, Array3<T>), GfError> {
    if v.len() != sector.len(nocc, nvir) {
        return Err(ndarray::ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
    }
    let n1 = sector.singles_len(nocc, nvir);
    let r1: Array1<T> = v.slice(s![..n1]).to_owned();
    let r3: Array3<T> = v
        .slice(s![n1..])
        .to_owned()
        .into_shape(sector.doubles_dim(nocc, nvir))?;
    Ok((r1, r3))
}
