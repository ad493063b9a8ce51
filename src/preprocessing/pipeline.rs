//! Ordered fit/transform pipeline

use crate::error::{PrepError, Result};
use crate::feature_engineering::InteractionExpander;
use super::{
    config::PipelineConfig,
    encoder::{BinaryEncoder, OneHotEncoder},
    ensure_columns,
    imputer::MissingValueHandler,
    scaler::Standardizer,
    selector::ColumnSelector,
    TableTransformer,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// One stage of a [`PreprocessingPipeline`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineStep {
    Select(ColumnSelector),
    Impute(MissingValueHandler),
    BinaryEncode(BinaryEncoder),
    OneHotEncode(OneHotEncoder),
    Interactions(InteractionExpander),
    Standardize(Standardizer),
}

impl PipelineStep {
    pub fn transformer(&self) -> &dyn TableTransformer {
        match self {
            PipelineStep::Select(t) => t,
            PipelineStep::Impute(t) => t,
            PipelineStep::BinaryEncode(t) => t,
            PipelineStep::OneHotEncode(t) => t,
            PipelineStep::Interactions(t) => t,
            PipelineStep::Standardize(t) => t,
        }
    }

    fn transformer_mut(&mut self) -> &mut dyn TableTransformer {
        match self {
            PipelineStep::Select(t) => t,
            PipelineStep::Impute(t) => t,
            PipelineStep::BinaryEncode(t) => t,
            PipelineStep::OneHotEncode(t) => t,
            PipelineStep::Interactions(t) => t,
            PipelineStep::Standardize(t) => t,
        }
    }
}

/// Chain of transformers fit once on training data, in order, then replayed
/// on any later table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreprocessingPipeline {
    steps: Vec<PipelineStep>,
    /// Output column layout learned at fit time
    feature_names: Vec<String>,
    is_fitted: bool,
    /// Seconds spent per step during fit
    step_times: Vec<(String, f64)>,
    fit_time: Option<f64>,
    samples_fitted: usize,
}

impl PreprocessingPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step
    pub fn with_step(mut self, step: PipelineStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Build the walkthrough order from a configuration: select, fill
    /// not-applicable labels, impute, binary encode, one-hot encode, expand
    /// interactions, standardize.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;

        let mut pipeline =
            Self::new().with_step(PipelineStep::Select(ColumnSelector::new(config.feature_columns())));

        if !config.not_applicable.is_empty() {
            pipeline = pipeline.with_step(PipelineStep::Impute(MissingValueHandler::not_applicable(
                config.not_applicable.clone(),
                config.not_applicable_label.clone(),
            )));
        }
        if !config.impute_median.is_empty() {
            pipeline = pipeline.with_step(PipelineStep::Impute(MissingValueHandler::median(
                config.impute_median.clone(),
            )));
        }
        if !config.binary.is_empty() {
            pipeline = pipeline.with_step(PipelineStep::BinaryEncode(BinaryEncoder::new(
                config.binary.clone(),
            )));
        }
        if !config.one_hot.is_empty() {
            pipeline = pipeline.with_step(PipelineStep::OneHotEncode(OneHotEncoder::new(
                config.one_hot.clone(),
            )));
        }

        let mut scaled = config.numeric.clone();
        if config.interactions.len() >= 2 {
            scaled.extend(InteractionExpander::product_names(&config.interactions));
            pipeline = pipeline.with_step(PipelineStep::Interactions(InteractionExpander::new(
                config.interactions.clone(),
            )));
        }
        if !scaled.is_empty() {
            pipeline = pipeline.with_step(PipelineStep::Standardize(Standardizer::new(scaled)));
        }

        Ok(pipeline)
    }

    /// Fit every step on the training table, feeding each step the previous
    /// step's output.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.fit_inner(df)?;
        Ok(self)
    }

    /// Fit and return the transformed training table
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit_inner(df)
    }

    fn fit_inner(&mut self, df: &DataFrame) -> Result<DataFrame> {
        if self.is_fitted {
            return Err(PrepError::AlreadyFitted);
        }
        let start = Instant::now();

        let mut current = df.clone();
        let mut step_times = Vec::with_capacity(self.steps.len());
        for step in &mut self.steps {
            let step_start = Instant::now();
            let transformer = step.transformer_mut();
            current = transformer.fit_transform(&current)?;
            let elapsed = step_start.elapsed().as_secs_f64();
            debug!(
                step = transformer.name(),
                rows = current.height(),
                cols = current.width(),
                "step fitted"
            );
            step_times.push((transformer.name().to_string(), elapsed));
        }

        self.feature_names = current
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        self.step_times = step_times;
        self.samples_fitted = df.height();
        self.is_fitted = true;

        let elapsed = start.elapsed().as_secs_f64();
        self.fit_time = Some(elapsed);
        info!(
            steps = self.steps.len(),
            rows = df.height(),
            features = self.feature_names.len(),
            elapsed_secs = elapsed,
            "pipeline fitted"
        );
        Ok(current)
    }

    /// Replay the fitted steps on any table. The output always has the
    /// fit-time column layout.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted);
        }
        let start = Instant::now();

        let mut current = df.clone();
        for step in &self.steps {
            current = step.transformer().transform(&current)?;
        }

        ensure_columns(&current, &self.feature_names)?;
        let result = current.select(self.feature_names.iter().map(|s| s.as_str()))?;

        debug!(
            rows = result.height(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "pipeline applied"
        );
        Ok(result)
    }

    /// Output column names learned at fit time
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Return timing metrics: total fit time, per-step fit time and fitted
    /// sample count.
    pub fn performance_metrics(&self) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();
        if let Some(ft) = self.fit_time {
            metrics.insert("fit_time".to_string(), ft);
        }
        for (i, (name, secs)) in self.step_times.iter().enumerate() {
            metrics.insert(format!("step_{}_{}_time", i, name), *secs);
        }
        metrics.insert("samples_fitted".to_string(), self.samples_fitted as f64);
        metrics
    }
}
