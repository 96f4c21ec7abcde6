//! Ionization-potential (IP) sector vectors. The ket ("b") side carries no
//! amplitude-linear corrections; the bra ("e") side contracts the
//! de-excitation amplitudes `l1`/`l2` against `t1`/`t2`.

use crate::amplitudes::{CcAmplitudes, Orbital};
use crate::vectors::pack;
use ndarray::prelude::*;

/// Ket amplitudes for orbital `p`: a unit hole for an occupied index, the
/// amplitude columns `(t1[:, a], t2[:, :, :, a])` for a virtual one.
pub fn ket_amplitudes(
    t1: ArrayView2<f64>,
    t2: ArrayView4<f64>,
    orb: Orbital,
) -> (Array1<f64>, Array3<f64>) {
    let (nocc, nvir) = t1.dim();
    match orb {
        Orbital::Occupied(i) => {
            let mut r1: Array1<f64> = Array1::zeros(nocc);
            r1[i] = 1.0;
            (r1, Array3::zeros((nocc, nocc, nvir)))
        }
        Orbital::Virtual(a) => (
            t1.column(a).to_owned(),
            t2.slice(s![.., .., .., a]).to_owned(),
        ),
    }
}

/// Bra amplitudes for orbital `p`, including the `l1`/`l2` corrections.
pub fn bra_amplitudes(
    t1: ArrayView2<f64>,
    t2: ArrayView4<f64>,
    l1: ArrayView2<f64>,
    l2: ArrayView4<f64>,
    orb: Orbital,
) -> (Array1<f64>, Array3<f64>) {
    let (nocc, nvir) = t1.dim();
    match orb {
        Orbital::Occupied(i) => {
            // Rank-1 block: -delta_i + l1 . t1[i, :]
            //               + 2 <l2[i,l,c,d], t2[i,l,c,d]> - <l2[i,l,c,d], t2[i,l,d,c]>
            let mut r1: Array1<f64> = Array1::zeros(nocc);
            r1[i] = -1.0;
            r1 += &l1.dot(&t1.row(i));

            let t2i: ArrayView3<f64> = t2.slice(s![i, .., .., ..]);
            let t2i_lcd: Array1<f64> = t2i.iter().cloned().collect();
            let t2i_ldc: Array1<f64> = t2i.permuted_axes([0, 2, 1]).iter().cloned().collect();
            let l2_mat: Array2<f64> = l2
                .as_standard_layout()
                .into_owned()
                .into_shape((nocc, nocc * nvir * nvir))
                .unwrap();
            r1 += &l2_mat.dot(&(&t2i_lcd * 2.0 - &t2i_ldc));

            // Rank-3 block: -2 l1 broadcast into row i, +l1 into column i,
            // plus the t1-weighted l2 corrections.
            let mut r3: Array3<f64> = Array3::zeros((nocc, nocc, nvir));
            r3.slice_mut(s![i, .., ..]).scaled_add(-2.0, &l1);
            r3.slice_mut(s![.., i, ..]).scaled_add(1.0, &l1);

            // base[j,k,b] = sum_c t1[i,c] l2[j,k,c,b]
            let l2_jkbc: Array2<f64> = l2
                .permuted_axes([0, 1, 3, 2])
                .as_standard_layout()
                .into_owned()
                .into_shape((nocc * nocc * nvir, nvir))
                .unwrap();
            let base: Array3<f64> = l2_jkbc
                .dot(&t1.row(i))
                .into_shape((nocc, nocc, nvir))
                .unwrap();
            let swapped = base.view().permuted_axes([1, 0, 2]);
            r3 += &(&base * 2.0);
            r3 -= &swapped;

            (r1, r3)
        }
        Orbital::Virtual(a) => (
            l1.column(a).mapv(|x| -x),
            l2.slice(s![.., .., a, ..]).mapv(|x| -2.0 * x) + &l2.slice(s![.., .., .., a]),
        ),
    }
}

/// Packed ket vector for a global orbital index.
pub fn ket_vector(cc: &CcAmplitudes, p: usize) -> Array1<f64> {
    let orb = Orbital::classify(p, cc.nocc());
    let (r1, r3) = ket_amplitudes(cc.t1.view(), cc.t2.view(), orb);
    pack(r1.view(), r3.view())
}

/// Packed bra vector for a global orbital index.
pub fn bra_vector(cc: &CcAmplitudes, p: usize) -> Array1<f64> {
    let orb = Orbital::classify(p, cc.nocc());
    let (r1, r3) = bra_amplitudes(cc.t1.view(), cc.t2.view(), cc.l1.view(), cc.l2.view(), orb);
    pack(r1.view(), r3.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eom::testkit::minimal_amplitudes;
    use approx::assert_abs_diff_eq;

    #[test]
    fn ket_of_minimal_system() {
        let cc = minimal_amplitudes();
        // occupied orbital: a bare hole
        let (r1, r3) = ket_amplitudes(cc.t1.view(), cc.t2.view(), Orbital::Occupied(0));
        assert_eq!(r1, array![1.0]);
        assert_eq!(r3.sum(), 0.0);
        // virtual orbital: the amplitude columns
        let (r1, r3) = ket_amplitudes(cc.t1.view(), cc.t2.view(), Orbital::Virtual(0));
        assert_abs_diff_eq!(r1[0], 0.1, epsilon = 1e-14);
        assert_abs_diff_eq!(r3[[0, 0, 0]], 0.05, epsilon = 1e-14);
    }

    #[test]
    fn bra_of_minimal_system() {
        let cc = minimal_amplitudes();
        let (r1, r3) = bra_amplitudes(
            cc.t1.view(),
            cc.t2.view(),
            cc.l1.view(),
            cc.l2.view(),
            Orbital::Occupied(0),
        );
        // -1 + 0.2*0.1 + 2*0.03*0.05 - 0.03*0.05
        assert_abs_diff_eq!(r1[0], -0.9785, epsilon = 1e-14);
        // -2*0.2 + 0.2 + 2*0.1*0.03 - 0.1*0.03
        assert_abs_diff_eq!(r3[[0, 0, 0]], -0.197, epsilon = 1e-14);

        let (r1, r3) = bra_amplitudes(
            cc.t1.view(),
            cc.t2.view(),
            cc.l1.view(),
            cc.l2.view(),
            Orbital::Virtual(0),
        );
        assert_abs_diff_eq!(r1[0], -0.2, epsilon = 1e-14);
        // -2*0.03 + 0.03
        assert_abs_diff_eq!(r3[[0, 0, 0]], -0.03, epsilon = 1e-14);
    }

    #[test]
    fn boundary_index_uses_virtual_branch() {
        let cc = minimal_amplitudes();
        // p == nocc must address virtual orbital 0, not an occupied one
        let v = ket_vector(&cc, cc.nocc());
        assert_abs_diff_eq!(v[0], 0.1, epsilon = 1e-14);
        let e = bra_vector(&cc, cc.nocc());
        assert_abs_diff_eq!(e[0], -0.2, epsilon = 1e-14);
    }
}
