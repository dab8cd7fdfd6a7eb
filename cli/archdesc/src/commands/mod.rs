//! CLI command implementations.

pub mod isa;
pub mod supported;

/// How a command renders its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
