//! Pipeline observer: hooks for logging, profiling, and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. Every hook has an empty default body, so an observer only
//! implements what it cares about.

use std::time::{Duration, Instant};

use crate::frequency::{FrequencyRows, FrequencyTable};
use crate::pipeline::artifacts::{CleanedText, TokenStream, Transcript};

pub const STAGE_LOAD: &str = "load";
pub const STAGE_CLEAN: &str = "clean";
pub const STAGE_STOPWORDS: &str = "stopwords";
pub const STAGE_NORMALIZE: &str = "normalize";
pub const STAGE_COUNT: &str = "count";
pub const STAGE_WRITE: &str = "write";

/// Measures one stage.
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    started: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What a stage reports when it finishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    elapsed: Duration,
    tokens: Option<usize>,
    rows: Option<usize>,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Tokens in the stage's output stream, if it produces one.
    pub fn tokens(&self) -> Option<usize> {
        self.tokens
    }

    /// Distinct keys or written rows, for the count and write stages.
    pub fn rows(&self) -> Option<usize> {
        self.rows
    }
}

/// Builder for reports that carry counts.
#[derive(Debug, Clone)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: StageReport::new(elapsed),
        }
    }

    pub fn tokens(mut self, tokens: usize) -> Self {
        self.report.tokens = Some(tokens);
        self
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.report.rows = Some(rows);
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

/// Stage-boundary callbacks.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}
    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    fn on_transcript(&mut self, _transcript: &Transcript) {}
    fn on_cleaned(&mut self, _cleaned: &CleanedText) {}
    /// Called after the stopword and normalize stages with their output.
    fn on_tokens(&mut self, _stage: &'static str, _tokens: &TokenStream) {}
    fn on_table(&mut self, _table: &FrequencyTable) {}
    fn on_rows(&mut self, _rows: &FrequencyRows) {}
}

/// Ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Collects the report of every finished stage, in order.
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    /// Report for `stage`, if it ran.
    pub fn report(&self, stage: &str) -> Option<&StageReport> {
        self.reports
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, report)| report)
    }

    pub fn total_elapsed(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}

/// Emits one `debug` event per finished stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        tracing::debug!(
            stage,
            elapsed_us = report.elapsed().as_micros() as u64,
            tokens = ?report.tokens(),
            rows = ?report.rows(),
            "stage finished"
        );
    }

    fn on_transcript(&mut self, transcript: &Transcript) {
        tracing::debug!(bytes = transcript.text().len(), "transcript loaded");
    }

    fn on_cleaned(&mut self, cleaned: &CleanedText) {
        tracing::debug!(lines = cleaned.num_lines(), "transcript cleaned");
    }
}
