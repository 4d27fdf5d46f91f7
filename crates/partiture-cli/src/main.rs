//! Partiture CLI entry point

use std::process;

use clap::Parser;
use colored::Colorize;
use partiture_cli::{error_json, init_tracing, render_error, run, Cli};

fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(&cli.log_level, cli.json_logs) {
        eprintln!("{}: logging disabled: {:#}", "warning".yellow().bold(), err);
    }

    match run(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(err) => {
            if cli.json_logs {
                eprintln!("{}", error_json(&err));
            } else {
                eprintln!("{}", render_error(&err));
            }
            process::exit(1);
        }
    }
}
