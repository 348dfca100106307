mod commands;
mod logging;

use clap::{Parser, Subcommand, ValueEnum};
use commands::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kernel")]
#[command(about = "Assemble and inspect the kernel service container")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "kernel=info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the container and dump it
    Assemble {
        /// Install directory containing eZ/Publish/Core/settings
        #[arg(long)]
        install_dir: PathBuf,

        /// Run compiler passes and freeze the container before dumping
        #[arg(long)]
        compile: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },

    /// List the compiler passes in registration order
    Passes,

    /// List the configuration documents in load order
    Documents,

    /// Show the bootstrap configuration resolved from the environment
    Config,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Yaml,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log)?;

    match cli.command {
        Commands::Assemble {
            install_dir,
            compile,
            format,
        } => {
            let output = assemble::run(&install_dir, compile, format)?;
            println!("{}", output);
        }
        Commands::Passes => passes::run(),
        Commands::Documents => documents::run(),
        Commands::Config => config::run()?,
    }

    Ok(())
}
