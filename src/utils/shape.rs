use anyhow::Result;
use ndarray::Array2;

use crate::errors;

/// Ensure that `other` has the same shape as the total read count matrix.
pub(crate) fn ensure_same_shape<A, B>(
    name: &'static str,
    total: &Array2<A>,
    other: &Array2<B>,
) -> Result<()> {
    if total.shape() != other.shape() {
        return Err(errors::shape_mismatch(name, total.shape(), other.shape()).into());
    }
    Ok(())
}

/// Ensure that a per-locus vector has one entry per column of the read count matrix.
pub(crate) fn ensure_locus_len<A>(name: &'static str, total: &Array2<A>, len: usize) -> Result<()> {
    if total.ncols() != len {
        return Err(errors::shape_mismatch(name, &[total.ncols()], &[len]).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn test_shape_mismatch() {
        let total: Array2<u32> = Array2::zeros((2, 3));
        let reference: Array2<u32> = Array2::zeros((3, 2));
        let err = ensure_same_shape("reference reads", &total, &reference).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::ShapeMismatch {
                name: "reference reads",
                expected: vec![2, 3],
                found: vec![3, 2],
            })
        );
        assert!(ensure_same_shape("dosages", &total, &total).is_ok());
        assert!(ensure_locus_len("allele frequencies", &total, 3).is_ok());
        assert!(ensure_locus_len("allele frequencies", &total, 2).is_err());
    }
}
