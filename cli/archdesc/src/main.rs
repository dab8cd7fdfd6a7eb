//! archdesc CLI: inspect instruction set profiles and resolve device support.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::OutputFormat;

#[derive(Parser)]
#[command(name = "archdesc", version, about = "Instruction set architecture descriptions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every known instruction set
    List,
    /// Show the profile of one instruction set
    Describe {
        /// Canonical name (e.g., arm64, x86_64, loong64), or "thumb2"
        name: String,
        /// Output format (text, json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show the instruction set this binary was compiled for
    Runtime {
        /// Output format (text, json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Resolve the instruction sets a device supports, primary first
    Supported {
        /// Property file (.toml with a [properties] table, or build.prop-style .prop)
        #[arg(long)]
        props: Option<PathBuf>,
        /// Property override, e.g. --set ro.zygote=zygote64_32 (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
        /// Resolve as if running on this instruction set instead of the compiled one
        #[arg(long)]
        runtime: Option<String>,
        /// Query the device through getprop instead of a property file
        #[arg(long, conflicts_with = "props")]
        system: bool,
        /// Output format (text, json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::List => commands::isa::list(),
        Commands::Describe { name, format } => commands::isa::describe(&name, format),
        Commands::Runtime { format } => commands::isa::runtime(format),
        Commands::Supported {
            props,
            overrides,
            runtime,
            system,
            format,
        } => commands::supported::run(
            props.as_deref(),
            &overrides,
            runtime.as_deref(),
            system,
            format,
        ),
    }
}
