use anyhow::Result;
use log::LevelFilter;
use structopt::StructOpt;

use polyfreqs::cli::{run, Polyfreqs};

pub fn main() -> Result<()> {
    let opt = Polyfreqs::from_args();

    fern::Dispatch::new()
        .format(|out, message, _| out.finish(format_args!("{}", message)))
        .level(if opt.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .chain(std::io::stderr())
        .apply()?;

    run(opt)
}
