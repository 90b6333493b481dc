//! Gibbs sampling of allelic dosages and allele frequencies in polyploid
//! organisms from sequencing read counts.
//!
//! The crate provides the per-iteration updates of a two-block Gibbs sampler:
//! the read likelihood, the full conditionals for genotype dosages and allele
//! frequencies, and a forward simulator for reference read counts. The outer
//! chain (iteration count, burn-in, thinning, storage) is left to the caller.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate getset;
#[macro_use]
extern crate derive_new;
#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod cli;
pub mod errors;
pub mod model;
pub mod utils;

pub use crate::errors::Error;
pub use crate::model::allele_freqs::{AlleleFrequencySampler, BetaPosterior};
pub use crate::model::genotypes::GenotypeSampler;
pub use crate::model::likelihood::ReadLikelihood;
pub use crate::model::simulation::ReadSimulator;
pub use crate::model::{
    AlleleFreqs, Dosage, Dosages, ModelParameters, ReadCount, ReadCounts,
};
pub use crate::utils::categorical;
pub use crate::utils::interrupt::{Interrupt, NoInterrupt};
