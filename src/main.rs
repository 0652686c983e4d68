extern crate pretty_env_logger;

#[macro_use]
extern crate log;

use clap::Parser;
use lloyd::{cluster_main, compare_main, generate_main, Cli, Commands, LloydParams};

fn setup_logging(args: &dyn LloydParams) {
    let level = if args.debug() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_level(level)
        .init();

    info!("starting");
    info!("params: {:#?}", args);
    if !args.validate() {
        error!("please fix arguments");
        std::process::exit(1);
    }
}

fn main() {
    let args = Cli::parse();

    let ret = match &args.command {
        Commands::Cluster(m_args) => {
            setup_logging(m_args);
            cluster_main(m_args)
        }
        Commands::Compare(m_args) => {
            setup_logging(m_args);
            compare_main(m_args).map(|score| info!("jaccard {:.6}", score))
        }
        Commands::Generate(m_args) => {
            setup_logging(m_args);
            generate_main(m_args)
        }
    };

    if let Err(e) = ret {
        error!("{}", e);
        std::process::exit(1);
    }
    info!("finished");
}
