//! Forward simulation of dosages and reference read counts, e.g. for synthetic data sets
//! and posterior predictive checks.

use anyhow::{Context, Result};
use bio::stats::Prob;
use ndarray::Array2;
use rand::Rng;
use rand_distr::{Binomial, Distribution};

use crate::model::{
    validate_allele_freqs, AlleleFreqs, Dosage, Dosages, ModelParameters, ReadCount, ReadCounts,
};
use crate::utils::shape;

fn binomial(n: u64, p: Prob) -> Result<Binomial> {
    Binomial::new(n, *p)
        .map_err(|e| anyhow::anyhow!("invalid binomial distribution B({}, {}): {}", n, *p, e))
}

#[derive(new, Debug, Clone, Copy)]
pub struct ReadSimulator {
    params: ModelParameters,
}

impl ReadSimulator {
    /// Simulate reference read counts for the given total read counts and dosages.
    ///
    /// Cells without reads keep a reference count of zero.
    pub fn simulate<R>(&self, total: &ReadCounts, dosages: &Dosages, rng: &mut R) -> Result<ReadCounts>
    where
        R: Rng + ?Sized,
    {
        shape::ensure_same_shape("dosages", total, dosages)?;
        self.params.validate_dosages(total, dosages)?;

        let thetas = self.params.success_probs();

        let mut reference = Array2::zeros(total.raw_dim());
        for ((i, j), &t) in total.indexed_iter() {
            if t == 0 {
                continue;
            }
            let dist = binomial(t as u64, thetas[dosages[[i, j]] as usize])
                .with_context(|| format!("individual {} at locus {}", i, j))?;
            reference[[i, j]] = dist.sample(rng) as ReadCount;
        }
        debug!(
            "simulated reference reads for {} individuals at {} loci",
            total.nrows(),
            total.ncols()
        );

        Ok(reference)
    }

    /// Simulate dosages of `individuals` individuals under Hardy-Weinberg equilibrium,
    /// i.e. each dosage is drawn from Binomial(ploidy, p) of its locus.
    pub fn simulate_dosages<R>(
        &self,
        allele_freqs: &AlleleFreqs,
        individuals: usize,
        rng: &mut R,
    ) -> Result<Dosages>
    where
        R: Rng + ?Sized,
    {
        validate_allele_freqs(allele_freqs)?;

        let ploidy = self.params.ploidy() as u64;
        let dists = allele_freqs
            .iter()
            .map(|&p| binomial(ploidy, Prob(p)))
            .collect::<Result<Vec<_>>>()?;

        let mut dosages = Array2::zeros((individuals, allele_freqs.len()));
        for ((_, j), dosage) in dosages.indexed_iter_mut() {
            *dosage = dists[j].sample(rng) as Dosage;
        }
        Ok(dosages)
    }
}
