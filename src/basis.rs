//! MO -> AO rotation of bra/ket vector sets. A single contraction with the
//! orbital coefficient matrix per direction; nothing is cached across calls.

use ndarray::prelude::*;

/// The rows of the MO coefficient matrix belonging to the requested
/// orbital subset `ps`.
pub fn coeff_rows(mo_coeff: ArrayView2<f64>, ps: &[usize]) -> Array2<f64> {
    mo_coeff.select(Axis(0), ps)
}

/// Rotate a stack of MO-basis bra vectors (one per row) into the AO basis:
/// `E_ao = C[ps, :] . E_mo`.
pub fn bra_mo_to_ao(coeff_rows: ArrayView2<f64>, e_mo: ArrayView2<f64>) -> Array2<f64> {
    coeff_rows.dot(&e_mo)
}

/// Rotate a stack of MO-basis ket vectors (one per column) into the AO
/// basis: `B_ao = B_mo . C[ps, :]^T`.
pub fn ket_mo_to_ao(b_mo: ArrayView2<f64>, coeff_rows: ArrayView2<f64>) -> Array2<f64> {
    b_mo.dot(&coeff_rows.t())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_coefficients_select_orbitals() {
        let c: Array2<f64> = Array2::eye(3);
        let e_mo = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let rows = coeff_rows(c.view(), &[2, 0]);
        let e_ao = bra_mo_to_ao(rows.view(), e_mo.view());
        assert_eq!(e_ao, array![[5.0, 6.0], [1.0, 2.0]]);
    }

    #[test]
    fn ket_rotation_matches_manual_contraction() {
        let c = array![[0.8, 0.6], [-0.6, 0.8]];
        let b_mo = array![[1.0, 0.0], [0.0, 2.0], [1.0, 1.0]];
        let rows = coeff_rows(c.view(), &[0, 1]);
        let b_ao = ket_mo_to_ao(b_mo.view(), rows.view());
        for x in 0..3 {
            for p in 0..2 {
                let expected: f64 = (0..2).map(|i| b_mo[[x, i]] * c[[p, i]]).sum();
                assert_abs_diff_eq!(b_ao[[x, p]], expected, epsilon = 1e-14);
            }
        }
    }
}
