//! typeforge CLI - generate IDE project files from a typeforge.toml manifest

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("typeforge=debug")
    } else {
        EnvFilter::new("typeforge=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Ninja(args) => commands::ninja::execute(args),
        Commands::Xcode(args) => commands::xcode::execute(args),
        Commands::Vcxproj(args) => commands::vcxproj::execute(args),
        Commands::Sln(args) => commands::sln::execute(args),
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Id(args) => commands::id::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
