// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Full conditional sampling of genotype dosages.
//!
//! Given the allele frequency `p` of a locus, the dosage `k` of an individual has the
//! Hardy-Weinberg prior `Binomial(k; ploidy, p)`. Multiplied with the read likelihood
//! `Binomial(r; t, θ(k))` and normalized over `k = 0..=ploidy`, this yields the
//! distribution each observed cell is redrawn from.

use anyhow::{Context, Result};
use bio::stats::{LogProb, Prob};
use itertools::Itertools;
use rand::Rng;

use crate::errors::Error;
use crate::model::{
    ln_binomial_pmf, validate_allele_freqs, AlleleFreqs, Dosage, Dosages, ModelParameters,
    ReadCount, ReadCounts,
};
use crate::utils::interrupt::{self, Interrupt};
use crate::utils::{categorical, shape};

#[derive(new, Debug, Clone, Copy)]
pub struct GenotypeSampler {
    params: ModelParameters,
}

impl GenotypeSampler {
    /// Hardy-Weinberg prior of each dosage, in log space.
    fn ln_priors(&self, allele_freq: f64) -> Vec<LogProb> {
        let ploidy = self.params.ploidy() as u64;
        self.params
            .dosages()
            .map(|k| ln_binomial_pmf(k as u64, ploidy, Prob(allele_freq)))
            .collect()
    }

    fn normalized(
        thetas: &[Prob],
        ln_priors: &[LogProb],
        total: ReadCount,
        reference: ReadCount,
    ) -> Result<Vec<Prob>> {
        let ln_weights = thetas
            .iter()
            .zip(ln_priors)
            .map(|(theta, ln_prior)| {
                ln_binomial_pmf(reference as u64, total as u64, *theta) + *ln_prior
            })
            .collect_vec();

        let marginal = LogProb::ln_sum_exp(&ln_weights);
        if !marginal.is_finite() {
            return Err(Error::DegenerateDistribution {
                sum: marginal.exp(),
            }
            .into());
        }

        Ok(ln_weights
            .into_iter()
            .map(|ln_weight| Prob::from(ln_weight - marginal))
            .collect())
    }

    /// Full conditional distribution over dosages `0..=ploidy` for a single cell.
    pub fn conditional(
        &self,
        total: ReadCount,
        reference: ReadCount,
        allele_freq: f64,
    ) -> Result<Vec<Prob>> {
        Self::normalized(
            &self.params.success_probs(),
            &self.ln_priors(allele_freq),
            total,
            reference,
        )
    }

    /// Draw new dosages for all observed cells.
    ///
    /// The result is a copy of `dosages` in which each cell with reads is replaced by a
    /// draw from its full conditional, cells without reads are passed through untouched.
    /// Draws depend only on the given read counts and allele frequencies, never on
    /// dosages redrawn earlier in the same call. The interrupt is checked once per locus.
    pub fn sample<R, I>(
        &self,
        total: &ReadCounts,
        reference: &ReadCounts,
        dosages: &Dosages,
        allele_freqs: &AlleleFreqs,
        rng: &mut R,
        interrupt: &I,
    ) -> Result<Dosages>
    where
        R: Rng + ?Sized,
        I: Interrupt + ?Sized,
    {
        shape::ensure_same_shape("reference reads", total, reference)?;
        shape::ensure_same_shape("dosages", total, dosages)?;
        shape::ensure_locus_len("allele frequencies", total, allele_freqs.len())?;
        validate_allele_freqs(allele_freqs)?;

        let values: Vec<Dosage> = self.params.dosages().collect();
        let thetas = self.params.success_probs();
        let mut sampled = dosages.clone();
        let mut observed = 0;

        for (j, (total_locus, reference_locus)) in total
            .columns()
            .into_iter()
            .zip(reference.columns())
            .enumerate()
        {
            interrupt::check(interrupt)?;

            let ln_priors = self.ln_priors(allele_freqs[j]);
            for (i, (&t, &r)) in total_locus.iter().zip(reference_locus.iter()).enumerate() {
                if t == 0 {
                    continue;
                }
                let probs = Self::normalized(&thetas, &ln_priors, t, r)
                    .with_context(|| format!("individual {} at locus {}", i, j))?;
                let weights = probs.iter().map(|p| **p).collect_vec();
                sampled[[i, j]] = categorical::draw(&values, &weights, rng)
                    .with_context(|| format!("individual {} at locus {}", i, j))?;
                observed += 1;
            }
            trace!("sampled dosages at locus {}", j);
        }

        debug!(
            "sampled dosages for {} observed cells ({} individuals, {} loci)",
            observed,
            total.nrows(),
            total.ncols()
        );

        Ok(sampled)
    }
}
