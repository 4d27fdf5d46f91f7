// Command-line definition
// Argument types for the partiture binary

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Compile cognitive algebra into training objectives
#[derive(Debug, Parser)]
#[command(name = "partiture", version, about = "Cognitive algebra to training objective compiler")]
pub struct Cli {
    /// Pipeline configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Reject relations that have no resolution-table entry
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log filter, used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every stage and report whether the input is valid
    Check(InputArgs),

    /// Compile to a Mathematical Partiture (JSON)
    Compile {
        #[command(flatten)]
        input: InputArgs,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        /// Write the partiture here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the Markdown/LaTeX schedule report
    Report(InputArgs),

    /// List the hyperparameters of the generated objective
    Hyperparams {
        #[command(flatten)]
        input: InputArgs,

        /// Print as a JSON object
        #[arg(long)]
        json: bool,
    },

    /// Train the generated objective on a batch
    Eval {
        #[command(flatten)]
        input: InputArgs,

        /// JSON array of samples
        #[arg(short, long)]
        batch: PathBuf,

        /// Number of training steps
        #[arg(long, default_value_t = 1)]
        steps: u64,

        /// Override a hyperparameter before training, as NAME=VALUE
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        overrides: Vec<(String, f64)>,
    },
}

/// Where the input comes from; exactly one must be given
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Algebra expression, e.g. "Se ~ Si"
    pub expression: Option<String>,

    /// File holding the algebra expression
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Previously compiled partiture (JSON)
    #[arg(short, long)]
    pub partiture: Option<PathBuf>,
}

fn parse_assignment(text: &str) -> Result<(String, f64), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", text))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid value for '{}': {}", name, err))?;
    Ok((name.trim().to_string(), value))
}
