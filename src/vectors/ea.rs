//! Electron-affinity (EA) sector vectors. Index-mirrored analogues of the
//! IP builders: the occupied/virtual roles are swapped and the amplitude
//! contractions run over the occupied instead of the virtual index.

use crate::amplitudes::{CcAmplitudes, Orbital};
use crate::vectors::pack;
use ndarray::prelude::*;

/// Ket amplitudes for orbital `p`: the (negated) amplitude rows for an
/// occupied index, a unit particle for a virtual one.
pub fn ket_amplitudes(
    t1: ArrayView2<f64>,
    t2: ArrayView4<f64>,
    orb: Orbital,
) -> (Array1<f64>, Array3<f64>) {
    let (nocc, nvir) = t1.dim();
    match orb {
        Orbital::Occupied(i) => (
            t1.row(i).mapv(|x| -x),
            t2.slice(s![i, .., .., ..]).mapv(|x| -x),
        ),
        Orbital::Virtual(a) => {
            let mut r1: Array1<f64> = Array1::zeros(nvir);
            r1[a] = 1.0;
            (r1, Array3::zeros((nocc, nvir, nvir)))
        }
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
        Orbital::Occupied(i) => (
            l1.row(i).to_owned(),
            l2.slice(s![i, .., .., ..]).mapv(|x| 2.0 * x) - &l2.slice(s![.., i, .., ..]),
        ),
        Orbital::Virtual(a) => {
            // Rank-1 block: -delta_a + l1^T . t1[:, a]
            //               + 2 <l2[k,l,c,a], t2[k,l,c,a]> - <l2[k,l,c,a], t2[l,k,c,a]>
            let t1a: ArrayView1<f64> = t1.column(a);
            let mut r1: Array1<f64> = Array1::zeros(nvir);
            r1[a] = -1.0;
            r1 += &l1.t().dot(&t1a);

            let t2a: ArrayView3<f64> = t2.slice(s![.., .., .., a]);
            let t2a_klc: Array1<f64> = t2a.iter().cloned().collect();
            let t2a_lkc: Array1<f64> = t2a.permuted_axes([1, 0, 2]).iter().cloned().collect();
            let l2_mat: Array2<f64> = l2
                .as_standard_layout()
                .into_owned()
                .into_shape((nocc * nocc * nvir, nvir))
                .unwrap();
            r1 += &l2_mat.t().dot(&(&t2a_klc * 2.0 - &t2a_lkc));

            // Rank-3 block: -2 l1 into the particle slot a, +l1 into the
            // transposed slot, plus the t1-weighted l2 corrections.
            let mut r3: Array3<f64> = Array3::zeros((nocc, nvir, nvir));
            r3.slice_mut(s![.., a, ..]).scaled_add(-2.0, &l1);
            r3.slice_mut(s![.., .., a]).scaled_add(1.0, &l1);

            // base[j,b,c] = sum_k t1[k,a] l2[j,k,b,c]
            let l2_jbck: Array2<f64> = l2
                .permuted_axes([0, 2, 3, 1])
                .as_standard_layout()
                .into_owned()
                .into_shape((nocc * nvir * nvir, nocc))
                .unwrap();
            let base: Array3<f64> = l2_jbck
                .dot(&t1a)
                .into_shape((nocc, nvir, nvir))
                .unwrap();
            let swapped = base.view().permuted_axes([0, 2, 1]);
            r3 += &(&swapped * 2.0);
            r3 -= &base;

            (r1, r3)
        }
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
        let (r1, r3) = ket_amplitudes(cc.t1.view(), cc.t2.view(), Orbital::Occupied(0));
        assert_abs_diff_eq!(r1[0], -0.1, epsilon = 1e-14);
        assert_abs_diff_eq!(r3[[0, 0, 0]], -0.05, epsilon = 1e-14);
        let (r1, r3) = ket_amplitudes(cc.t1.view(), cc.t2.view(), Orbital::Virtual(0));
        assert_eq!(r1, array![1.0]);
        assert_eq!(r3.sum(), 0.0);
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
        assert_abs_diff_eq!(r1[0], 0.2, epsilon = 1e-14);
        // 2*0.03 - 0.03
        assert_abs_diff_eq!(r3[[0, 0, 0]], 0.03, epsilon = 1e-14);

        let (r1, r3) = bra_amplitudes(
            cc.t1.view(),
            cc.t2.view(),
            cc.l1.view(),
            cc.l2.view(),
            Orbital::Virtual(0),
        );
        // -1 + 0.2*0.1 + 2*0.03*0.05 - 0.03*0.05
        assert_abs_diff_eq!(r1[0], -0.9785, epsilon = 1e-14);
        // -2*0.2 + 0.2 + 2*0.1*0.03 - 0.1*0.03
        assert_abs_diff_eq!(r3[[0, 0, 0]], -0.197, epsilon = 1e-14);
    }

    #[test]
    fn boundary_index_uses_virtual_branch() {
        let cc = minimal_amplitudes();
        let v = ket_vector(&cc, cc.nocc());
        assert_eq!(v[0], 1.0);
        let e = bra_vector(&cc, cc.nocc());
        assert_abs_diff_eq!(e[0], -0.9785, epsilon = 1e-14);
    }
}
