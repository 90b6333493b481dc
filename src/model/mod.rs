use std::convert::TryFrom;
use std::fs::File;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use bio::stats::{LogProb, Prob};
use ndarray::{Array1, Array2};
use statrs::function::factorial::ln_binomial;

use crate::errors::Error;

pub mod allele_freqs;
pub mod genotypes;
pub mod likelihood;
pub mod simulation;

/// Number of reference allele copies carried by an individual at a locus.
pub type Dosage = u32;
pub type ReadCount = u32;

/// Read counts, rows are individuals and columns are loci.
/// A total read count of zero marks a missing cell.
pub type ReadCounts = Array2<ReadCount>;
/// Dosages, rows are individuals and columns are loci.
pub type Dosages = Array2<Dosage>;
/// Reference allele frequency per locus.
pub type AlleleFreqs = Array1<f64>;

/// Run-wide parameters of the read model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, CopyGetters)]
#[serde(try_from = "RawModelParameters")]
#[getset(get_copy = "pub")]
pub struct ModelParameters {
    /// Number of chromosome copies per individual.
    ploidy: u32,
    /// Per read sequencing error probability.
    error: f64,
}

#[derive(Deserialize)]
struct RawModelParameters {
    ploidy: u32,
    error: f64,
}

impl TryFrom<RawModelParameters> for ModelParameters {
    type Error = anyhow::Error;

    fn try_from(raw: RawModelParameters) -> Result<Self> {
        ModelParameters::new(raw.ploidy, raw.error)
    }
}

impl ModelParameters {
    pub fn new(ploidy: u32, error: f64) -> Result<Self> {
        if ploidy == 0 {
            return Err(Error::InvalidPloidy { ploidy }.into());
        }
        if !error.is_finite() || !(0.0..1.0).contains(&error) {
            return Err(Error::InvalidErrorRate { error }.into());
        }
        Ok(ModelParameters { ploidy, error })
    }

    /// Load parameters from a JSON (`.json`) or YAML (any other extension) file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = File::open(path)
            .with_context(|| format!("unable to open model parameters {}", path.display()))?;
        let params = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_reader(reader)
                .with_context(|| format!("invalid model parameters in {}", path.display()))?,
            _ => serde_yaml::from_reader(reader)
                .with_context(|| format!("invalid model parameters in {}", path.display()))?,
        };
        Ok(params)
    }

    /// All possible dosages, i.e. 0 up to the ploidy.
    pub fn dosages(&self) -> RangeInclusive<Dosage> {
        0..=self.ploidy
    }

    /// Probability that a single read shows the reference allele given the dosage.
    ///
    /// Homozygous dosages are only perturbed by the sequencing error, intermediate
    /// dosages interpolate linearly between the error floor and ceiling.
    pub fn success_prob(&self, dosage: Dosage) -> Result<Prob> {
        let theta = match dosage {
            0 => self.error,
            d if d == self.ploidy => 1.0 - self.error,
            d if d < self.ploidy => {
                let ratio = d as f64 / self.ploidy as f64;
                ratio * (1.0 - self.error) + (1.0 - ratio) * self.error
            }
            d => {
                return Err(Error::InvalidDosage {
                    dosage: d,
                    ploidy: self.ploidy,
                }
                .into())
            }
        };
        Ok(Prob(theta))
    }

    /// Success probabilities for all dosages, indexed by dosage.
    pub(crate) fn success_probs(&self) -> Vec<Prob> {
        self.dosages()
            .map(|dosage| {
                let ratio = dosage as f64 / self.ploidy as f64;
                Prob(ratio * (1.0 - self.error) + (1.0 - ratio) * self.error)
            })
            .collect()
    }

    /// Check that every observed cell carries a dosage within 0..=ploidy.
    pub(crate) fn validate_dosages(&self, total: &ReadCounts, dosages: &Dosages) -> Result<()> {
        for ((i, j), &t) in total.indexed_iter() {
            let dosage = dosages[[i, j]];
            if t > 0 && dosage > self.ploidy {
                return Err(Error::InvalidDosage {
                    dosage,
                    ploidy: self.ploidy,
                })
                .with_context(|| format!("individual {} at locus {}", i, j));
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_allele_freqs(allele_freqs: &AlleleFreqs) -> Result<()> {
    for (locus, &value) in allele_freqs.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::InvalidAlleleFreq { locus, value }.into());
        }
    }
    Ok(())
}

/// Binomial probability mass of `k` successes in `n` trials, in log space.
pub(crate) fn ln_binomial_pmf(k: u64, n: u64, p: Prob) -> LogProb {
    if k > n {
        return LogProb::ln_zero();
    }
    let ln_pow = |prob: f64, exponent: u64| {
        if exponent == 0 {
            0.0
        } else {
            prob.ln() * exponent as f64
        }
    };
    LogProb(ln_binomial(n, k) + ln_pow(*p, k) + ln_pow(1.0 - *p, n - k))
}
