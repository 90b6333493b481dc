// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;

use crate::model::likelihood::ReadLikelihood;
use crate::model::simulation::ReadSimulator;
use crate::model::ModelParameters;
use crate::utils::matrix_io::{read_matrix, write_matrix};

#[derive(Debug, StructOpt, Clone)]
#[structopt(
    name = "polyfreqs",
    about = "Read count likelihoods and simulation for genotyping polyploids."
)]
#[structopt(setting = structopt::clap::AppSettings::ColoredHelp)]
pub struct Polyfreqs {
    #[structopt(long, short, help = "Provide debug output on STDERR.")]
    pub verbose: bool,
    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt, Clone)]
pub struct ModelArgs {
    #[structopt(
        long,
        parse(from_os_str),
        help = "YAML or JSON file with model parameters (keys 'ploidy' and 'error'). \
                Overrides --ploidy and --error."
    )]
    params: Option<PathBuf>,
    #[structopt(long, default_value = "2", help = "Ploidy of the organism.")]
    ploidy: u32,
    #[structopt(
        long,
        default_value = "0.01",
        help = "Per read sequencing error probability."
    )]
    error: f64,
}

impl ModelArgs {
    fn model_parameters(&self) -> Result<ModelParameters> {
        match &self.params {
            Some(path) => ModelParameters::from_path(path),
            None => ModelParameters::new(self.ploidy, self.error),
        }
    }
}

#[derive(Debug, StructOpt, Clone)]
pub enum Command {
    #[structopt(
        name = "simulate-reads",
        about = "Simulate reference read counts given total read counts and dosages. \
                 Matrices are tab separated without header, with individuals as rows \
                 and loci as columns. A total read count of 0 marks missing data."
    )]
    SimulateReads {
        #[structopt(long, parse(from_os_str), help = "Matrix of total read counts.")]
        total: PathBuf,
        #[structopt(long, parse(from_os_str), help = "Matrix of dosages.")]
        dosages: PathBuf,
        #[structopt(flatten)]
        model: ModelArgs,
        #[structopt(long, help = "Seed for the random number generator.")]
        seed: Option<u64>,
    },
    #[structopt(
        name = "likelihood",
        about = "Compute the likelihood of observed reference read counts given dosages. \
                 Missing cells are reported as NA."
    )]
    Likelihood {
        #[structopt(long, parse(from_os_str), help = "Matrix of total read counts.")]
        total: PathBuf,
        #[structopt(long, parse(from_os_str), help = "Matrix of reference read counts.")]
        reference: PathBuf,
        #[structopt(long, parse(from_os_str), help = "Matrix of dosages.")]
        dosages: PathBuf,
        #[structopt(flatten)]
        model: ModelArgs,
    },
}

impl Command {
    pub fn execute<W: io::Write>(&self, out: W) -> Result<()> {
        match self {
            Command::SimulateReads {
                total,
                dosages,
                model,
                seed,
            } => {
                let params = model.model_parameters()?;
                let total = read_matrix(total)?;
                let dosages = read_matrix(dosages)?;
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_entropy(),
                };
                info!(
                    "simulating reference reads (ploidy={}, error={})",
                    params.ploidy(),
                    params.error()
                );
                let reference = ReadSimulator::new(params).simulate(&total, &dosages, &mut rng)?;
                write_matrix(out, &reference)
            }
            Command::Likelihood {
                total,
                reference,
                dosages,
                model,
            } => {
                let params = model.model_parameters()?;
                let total = read_matrix(total)?;
                let reference = read_matrix(reference)?;
                let dosages = read_matrix(dosages)?;
                info!(
                    "computing read likelihoods (ploidy={}, error={})",
                    params.ploidy(),
                    params.error()
                );
                let likelihoods =
                    ReadLikelihood::new(params).compute(&total, &reference, &dosages)?;
                let formatted =
                    likelihoods.map(|prob| prob.map_or_else(|| "NA".to_owned(), |p| (*p).to_string()));
                write_matrix(out, &formatted)
            }
        }
    }
}

pub fn run(opt: Polyfreqs) -> Result<()> {
    opt.command.execute(io::stdout())
}
