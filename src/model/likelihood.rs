use anyhow::Result;
use bio::stats::{LogProb, Prob};
use ndarray::{Array2, Zip};

use crate::model::{ln_binomial_pmf, Dosage, Dosages, ModelParameters, ReadCount, ReadCounts};
use crate::utils::shape;

/// Likelihood of observed reference read counts, given dosage, ploidy and sequencing error.
///
/// Reference reads are binomially distributed with the total read count as number of
/// trials and the error blended dosage fraction as success probability.
#[derive(new, Debug, Clone, Copy)]
pub struct ReadLikelihood {
    params: ModelParameters,
}

impl ReadLikelihood {
    /// Log likelihood of a single cell.
    pub fn ln_cell(
        &self,
        total: ReadCount,
        reference: ReadCount,
        dosage: Dosage,
    ) -> Result<LogProb> {
        let theta = self.params.success_prob(dosage)?;
        Ok(ln_binomial_pmf(reference as u64, total as u64, theta))
    }

    /// Likelihood of each cell. Cells without reads are `None`.
    pub fn compute(
        &self,
        total: &ReadCounts,
        reference: &ReadCounts,
        dosages: &Dosages,
    ) -> Result<Array2<Option<Prob>>> {
        shape::ensure_same_shape("reference reads", total, reference)?;
        shape::ensure_same_shape("dosages", total, dosages)?;
        self.params.validate_dosages(total, dosages)?;

        debug!(
            "computing read likelihoods for {} individuals at {} loci",
            total.nrows(),
            total.ncols()
        );

        let thetas = self.params.success_probs();
        Ok(Zip::from(total)
            .and(reference)
            .and(dosages)
            .par_map_collect(|&t, &r, &g| {
                if t == 0 {
                    None
                } else {
                    Some(Prob::from(ln_binomial_pmf(
                        r as u64,
                        t as u64,
                        thetas[g as usize],
                    )))
                }
            }))
    }

    /// Sum of the log likelihoods over all observed cells.
    pub fn total_ln_likelihood(
        &self,
        total: &ReadCounts,
        reference: &ReadCounts,
        dosages: &Dosages,
    ) -> Result<LogProb> {
        shape::ensure_same_shape("reference reads", total, reference)?;
        shape::ensure_same_shape("dosages", total, dosages)?;
        self.params.validate_dosages(total, dosages)?;

        let thetas = self.params.success_probs();
        let mut ln_likelihood = LogProb::ln_one();
        Zip::from(total)
            .and(reference)
            .and(dosages)
            .for_each(|&t, &r, &g| {
                if t > 0 {
                    ln_likelihood =
                        ln_likelihood + ln_binomial_pmf(r as u64, t as u64, thetas[g as usize]);
                }
            });
        Ok(ln_likelihood)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use ndarray::array;

    fn binomial_pmf(k: u64, n: u64, p: f64) -> f64 {
        let coeff = statrs::function::factorial::binomial(n, k);
        coeff * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32)
    }

    #[test]
    fn test_homozygous_cells() {
        let params = ModelParameters::new(4, 0.02).unwrap();
        let likelihood = ReadLikelihood::new(params);
        for t in 1..12 {
            for r in 0..=t {
                let lh = likelihood.ln_cell(t, r, 0).unwrap();
                assert_relative_eq!(
                    lh.exp(),
                    binomial_pmf(r as u64, t as u64, 0.02),
                    epsilon = 1e-12
                );
                let lh = likelihood.ln_cell(t, r, 4).unwrap();
                assert_relative_eq!(
                    lh.exp(),
                    binomial_pmf(r as u64, t as u64, 0.98),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_intermediate_dosage() {
        let params = ModelParameters::new(4, 0.01).unwrap();
        let likelihood = ReadLikelihood::new(params);
        let theta = 0.75 * 0.99 + 0.25 * 0.01;
        let lh = likelihood.ln_cell(8, 6, 3).unwrap();
        assert_relative_eq!(lh.exp(), binomial_pmf(6, 8, theta), epsilon = 1e-12);
    }

    #[test]
    fn test_compute_missing_cells() {
        let params = ModelParameters::new(2, 0.01).unwrap();
        let likelihood = ReadLikelihood::new(params);
        let total = array![[10, 0, 4], [0, 7, 3]];
        let reference = array![[9, 0, 2], [0, 0, 3]];
        let dosages = array![[2, 1, 1], [0, 0, 2]];

        let lh = likelihood.compute(&total, &reference, &dosages).unwrap();
        assert_eq!(lh.dim(), (2, 3));
        assert!(lh[[0, 1]].is_none());
        assert!(lh[[1, 0]].is_none());
        for ((i, j), cell) in lh.indexed_iter() {
            if total[[i, j]] > 0 {
                let expected = likelihood
                    .ln_cell(total[[i, j]], reference[[i, j]], dosages[[i, j]])
                    .unwrap();
                assert_relative_eq!(*cell.unwrap(), expected.exp(), epsilon = 1e-12);
                assert!(*cell.unwrap() >= 0.0 && *cell.unwrap() <= 1.0);
            }
        }
        assert_relative_eq!(*lh[[0, 0]].unwrap(), binomial_pmf(9, 10, 0.99), epsilon = 1e-12);

        let total_lh = likelihood
            .total_ln_likelihood(&total, &reference, &dosages)
            .unwrap();
        let expected: f64 = lh.iter().flatten().map(|p| p.ln()).sum();
        assert_relative_eq!(*total_lh, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_compute_shape_mismatch() {
        let params = ModelParameters::new(2, 0.01).unwrap();
        let likelihood = ReadLikelihood::new(params);
        let total = array![[10, 3]];
        let reference = array![[9], [1]];
        let err = likelihood
            .compute(&total, &reference, &array![[0, 1]])
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_compute_invalid_dosage() {
        let params = ModelParameters::new(2, 0.01).unwrap();
        let likelihood = ReadLikelihood::new(params);
        let total = array![[10, 3]];
        let reference = array![[9, 1]];
        let err = likelihood
            .compute(&total, &reference, &array![[3, 1]])
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::InvalidDosage {
                dosage: 3,
                ploidy: 2
            })
        );
    }
}
