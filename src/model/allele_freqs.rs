use anyhow::Result;
use ndarray::Array1;
use rand::Rng;
use rand_distr::{Beta, Distribution};

use crate::errors::Error;
use crate::model::{AlleleFreqs, Dosages, ModelParameters, ReadCounts};
use crate::utils::interrupt::{self, Interrupt};
use crate::utils::shape;

/// Beta posterior of the reference allele frequency at one locus.
#[derive(new, Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct BetaPosterior {
    alpha: f64,
    beta: f64,
}

impl BetaPosterior {
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }
}

/// Conjugate update of the allele frequencies given the current dosages.
///
/// Each observed individual contributes `ploidy` allele copies, `dosage` of which carry
/// the reference allele. With a uniform Beta(1, 1) prior, the frequency at a locus has
/// the posterior Beta(1 + ref copies, 1 + alt copies).
#[derive(new, Debug, Clone, Copy)]
pub struct AlleleFrequencySampler {
    params: ModelParameters,
}

impl AlleleFrequencySampler {
    /// Posterior of every locus. Loci without observed cells keep the uniform prior.
    pub fn posteriors(&self, total: &ReadCounts, dosages: &Dosages) -> Result<Vec<BetaPosterior>> {
        shape::ensure_same_shape("dosages", total, dosages)?;
        self.params.validate_dosages(total, dosages)?;

        let ploidy = self.params.ploidy() as u64;
        Ok(total
            .columns()
            .into_iter()
            .zip(dosages.columns())
            .map(|(total_locus, dosages_locus)| {
                let (ref_copies, alt_copies) = total_locus
                    .iter()
                    .zip(dosages_locus.iter())
                    .filter(|&(&t, _)| t > 0)
                    .fold((0u64, 0u64), |(ref_copies, alt_copies), (_, &g)| {
                        (ref_copies + g as u64, alt_copies + ploidy - g as u64)
                    });
                BetaPosterior::new(ref_copies as f64 + 1.0, alt_copies as f64 + 1.0)
            })
            .collect())
    }

    /// Draw a new allele frequency for every locus.
    ///
    /// All posteriors are aggregated before the first draw. The interrupt is checked
    /// once per locus.
    pub fn sample<R, I>(
        &self,
        total: &ReadCounts,
        dosages: &Dosages,
        rng: &mut R,
        interrupt: &I,
    ) -> Result<AlleleFreqs>
    where
        R: Rng + ?Sized,
        I: Interrupt + ?Sized,
    {
        let posteriors = self.posteriors(total, dosages)?;

        let mut allele_freqs = Array1::zeros(posteriors.len());
        for (j, posterior) in posteriors.iter().enumerate() {
            interrupt::check(interrupt)?;
            let beta = Beta::new(posterior.alpha(), posterior.beta()).map_err(|_| {
                Error::DegenerateDistribution {
                    sum: posterior.alpha() + posterior.beta(),
                }
            })?;
            allele_freqs[j] = beta.sample(rng);
            trace!(
                "sampled allele frequency {} at locus {} from Beta({}, {})",
                allele_freqs[j],
                j,
                posterior.alpha(),
                posterior.beta()
            );
        }
        debug!("sampled allele frequencies at {} loci", posteriors.len());

        Ok(allele_freqs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::interrupt::NoInterrupt;
    use ndarray::{array, Array2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::AtomicBool;

    fn sampler(ploidy: u32) -> AlleleFrequencySampler {
        AlleleFrequencySampler::new(ModelParameters::new(ploidy, 0.01).unwrap())
    }

    #[test]
    fn test_posteriors() {
        let sampler = sampler(4);
        let total = array![[10, 0, 0], [5, 3, 0], [0, 8, 0]];
        // dosages of missing cells must not count
        let dosages = array![[4, 2, 1], [1, 0, 3], [3, 2, 4]];
        let posteriors = sampler.posteriors(&total, &dosages).unwrap();
        assert_eq!(
            posteriors,
            vec![
                BetaPosterior::new(6.0, 4.0),
                BetaPosterior::new(3.0, 7.0),
                BetaPosterior::new(1.0, 1.0),
            ]
        );
        assert_relative_eq!(posteriors[2].mean(), 0.5);
    }

    #[test]
    fn test_sample_unit_interval() {
        let sampler = sampler(2);
        let total = array![[10, 20], [4, 0]];
        let dosages = array![[2, 0], [2, 1]];
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let allele_freqs = sampler
                .sample(&total, &dosages, &mut rng, &NoInterrupt)
                .unwrap();
            assert_eq!(allele_freqs.len(), 2);
            assert!(allele_freqs.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn test_sample_without_data_is_uniform() {
        let sampler = sampler(2);
        let total: ReadCounts = Array2::zeros((3, 1));
        let dosages: Dosages = Array2::zeros((3, 1));
        let mut rng = StdRng::seed_from_u64(11);
        let n = 10000;
        let mean = (0..n)
            .map(|_| {
                sampler
                    .sample(&total, &dosages, &mut rng, &NoInterrupt)
                    .unwrap()[0]
            })
            .sum::<f64>()
            / n as f64;
        assert_relative_eq!(mean, 0.5, epsilon = 0.02);
    }

    #[test]
    fn test_sample_concentrates() {
        let sampler = sampler(2);
        let total = Array2::from_elem((500, 1), 10);
        let dosages = Array2::from_shape_fn((500, 1), |(i, _)| if i % 10 < 8 { 2 } else { 0 });
        let mut rng = StdRng::seed_from_u64(2);
        let allele_freqs = sampler
            .sample(&total, &dosages, &mut rng, &NoInterrupt)
            .unwrap();
        assert_relative_eq!(allele_freqs[0], 0.8, epsilon = 0.05);
    }

    #[test]
    fn test_sample_errors() {
        let sampler = sampler(2);
        let total = array![[10, 20]];
        let mut rng = StdRng::seed_from_u64(5);

        let err = sampler
            .sample(&total, &array![[2, 0]], &mut rng, &AtomicBool::new(true))
            .unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::Interrupted));

        let err = sampler
            .sample(&total, &array![[2, 3]], &mut rng, &NoInterrupt)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::InvalidDosage {
                dosage: 3,
                ploidy: 2
            })
        );

        let err = sampler
            .sample(&total, &array![[2], [0]], &mut rng, &NoInterrupt)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::ShapeMismatch { .. })
        ));
    }
}
