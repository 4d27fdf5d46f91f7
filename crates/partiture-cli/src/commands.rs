// Command implementations
// Each command returns the text it prints on stdout

use std::fs;

use anyhow::{Context, Result};
use colored::Colorize;
use partiture::{
    batch_from_json, render_report, AgentSkeleton, Partiture, Pipeline, PipelineConfig,
    TrainingObjective,
};
use tracing::info;

use crate::cli::{Cli, Command, InputArgs};

/// Build the pipeline from the global flags
pub fn pipeline(cli: &Cli) -> Result<Pipeline> {
    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let strict = cli.strict || config.resolver.strict;
    Ok(Pipeline::new(config.with_strict(strict)))
}

impl InputArgs {
    /// Compile or decode the input into a partiture
    pub fn load(&self, pipeline: &Pipeline) -> Result<Partiture> {
        if let Some(path) = &self.partiture {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading partiture {}", path.display()))?;
            return Ok(Partiture::from_json(&json)?);
        }

        let text = match (&self.expression, &self.file) {
            (Some(expression), _) => expression.clone(),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("reading algebra {}", path.display()))?,
            (None, None) => anyhow::bail!("no input given"),
        };
        Ok(pipeline.compile_partiture(text.trim())?)
    }
}

/// Run the selected command
pub fn run(cli: &Cli) -> Result<String> {
    let pipeline = pipeline(cli)?;
    match &cli.command {
        Command::Check(input) => check(&pipeline, input),
        Command::Compile {
            input,
            pretty,
            output,
        } => {
            let partiture = input.load(&pipeline)?;
            let json = if *pretty {
                partiture.to_json_pretty()?
            } else {
                partiture.to_json()?
            };
            match output {
                Some(path) => {
                    fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), "wrote partiture");
                    Ok(format!("{} {}", "wrote".green().bold(), path.display()))
                }
                None => Ok(json),
            }
        }
        Command::Report(input) => Ok(render_report(&input.load(&pipeline)?)?),
        Command::Hyperparams { input, json } => hyperparams(&pipeline, input, *json),
        Command::Eval {
            input,
            batch,
            steps,
            overrides,
        } => {
            let batch = fs::read_to_string(batch).with_context(|| format!("reading batch {}", batch.display()))?;
            eval(&pipeline, input, &batch, *steps, overrides)
        }
    }
}

fn check(pipeline: &Pipeline, input: &InputArgs) -> Result<String> {
    let partiture = input.load(pipeline)?;
    let objective = pipeline.generate(&partiture)?;
    Ok(format!(
        "{} {}: {} terms, {} schedule edges, {} hyperparameters\n  hash {}",
        "ok".green().bold(),
        partiture.source.trim(),
        objective.term_count(),
        objective.edge_count(),
        objective.hyperparameters().len(),
        objective.content_hash()
    ))
}

fn hyperparams(pipeline: &Pipeline, input: &InputArgs, json: bool) -> Result<String> {
    let objective = pipeline.generate(&input.load(pipeline)?)?;
    let surface = objective.hyperparameters();
    if json {
        return Ok(serde_json::to_string_pretty(&surface)?);
    }

    let width = surface.keys().map(String::len).max().unwrap_or_default();
    let lines: Vec<String> = surface
        .iter()
        .map(|(name, value)| format!("{}  {}", format!("{:width$}", name, width = width).cyan(), value))
        .collect();
    Ok(lines.join("\n"))
}

/// Train for `steps` steps, one JSON step report per line
pub fn eval(
    pipeline: &Pipeline,
    input: &InputArgs,
    batch: &str,
    steps: u64,
    overrides: &[(String, f64)],
) -> Result<String> {
    let batch = batch_from_json(batch).context("decoding batch")?;
    let mut objective = pipeline.generate(&input.load(pipeline)?)?;
    for (name, value) in overrides {
        objective.set_hyperparameter(name, *value)?;
    }

    let mut skeleton = AgentSkeleton::new(Box::new(objective))?;
    let mut lines = Vec::new();
    for _ in 0..steps {
        let report = skeleton.train_step(&batch)?;
        lines.push(serde_json::to_string(&report)?);
    }
    Ok(lines.join("\n"))
}
