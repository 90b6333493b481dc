use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("shape mismatch: {name} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        name: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("values and weights must have the same length ({values} values vs. {weights} weights)")]
    LengthMismatch { values: usize, weights: usize },
    #[error("degenerate distribution: weights sum to {sum}, expected a positive and finite sum")]
    DegenerateDistribution { sum: f64 },
    #[error("categorical sampling did not select any value for u={u}")]
    InvariantViolation { u: f64 },
    #[error("sampling was interrupted")]
    Interrupted,
    #[error("invalid ploidy {ploidy}, must be at least 1")]
    InvalidPloidy { ploidy: u32 },
    #[error("invalid sequencing error rate {error}, must be in [0, 1)")]
    InvalidErrorRate { error: f64 },
    #[error("invalid dosage {dosage}, must not exceed the ploidy ({ploidy})")]
    InvalidDosage { dosage: u32, ploidy: u32 },
    #[error("invalid allele frequency {value} at locus {locus}, must be in [0, 1]")]
    InvalidAlleleFreq { locus: usize, value: f64 },
}

pub(crate) fn shape_mismatch(name: &'static str, expected: &[usize], found: &[usize]) -> Error {
    Error::ShapeMismatch {
        name,
        expected: expected.to_vec(),
        found: found.to_vec(),
    }
}
