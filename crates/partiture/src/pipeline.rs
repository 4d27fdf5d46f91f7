// Compile pipeline
// Runs parse, schedule resolution, compilation and generation with one configuration

use partiture_algebra::{parse, AlgebraTree, ScheduleResolver, ScheduledTree};
use partiture_error::Result;
use partiture_ir::{Partiture, PartitureCompiler};
use partiture_mechanic::{Mechanic, PartitureObjective};
use partiture_types::PipelineConfig;
use tracing::debug;

/// The configured end-to-end pipeline
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    resolver: ScheduleResolver,
    compiler: PartitureCompiler,
    mechanic: Mechanic,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            resolver: ScheduleResolver::from_config(&config.resolver),
            compiler: PartitureCompiler::new(config.compiler.clone()),
            mechanic: Mechanic::new(),
            config,
        }
    }

    /// Same pipeline with a different code generator
    pub fn with_mechanic(mut self, mechanic: Mechanic) -> Self {
        self.mechanic = mechanic;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn parse(&self, text: &str) -> Result<AlgebraTree> {
        let tree = parse(text)?;
        debug!(nodes = tree.node_count(), "parsed algebra");
        Ok(tree)
    }

    pub fn schedule(&self, text: &str) -> Result<ScheduledTree> {
        let scheduled = self.resolver.resolve(self.parse(text)?)?;
        debug!(relations = scheduled.resolutions().len(), mode = ?self.resolver.mode(), "scheduled algebra");
        Ok(scheduled)
    }

    /// Compile text into a Mathematical Partiture
    pub fn compile_partiture(&self, text: &str) -> Result<Partiture> {
        let span = tracing::debug_span!("compile", source = text);
        let _enter = span.enter();

        let partiture = self.compiler.compile(&self.schedule(text)?)?;
        debug!(
            terms = partiture.terms.len(),
            edges = partiture.schedule_graph.len(),
            "compiled partiture"
        );
        Ok(partiture)
    }

    /// Compile text all the way to a training objective
    pub fn compile(&self, text: &str) -> Result<PartitureObjective> {
        let partiture = self.compile_partiture(text)?;
        self.generate(&partiture)
    }

    /// Generate a training objective from an existing partiture
    pub fn generate(&self, partiture: &Partiture) -> Result<PartitureObjective> {
        let span = tracing::debug_span!("generate", source = partiture.source.as_str());
        let _enter = span.enter();
        self.mechanic.generate(partiture)
    }
}

/// Compile text to a training objective with the default configuration
pub fn compile(text: &str) -> Result<PartitureObjective> {
    Pipeline::default().compile(text)
}
