//! Pipeline runner: orchestrates stage execution and artifact flow.
//!
//! The [`Pipeline`] struct holds a composed set of stages. Calling
//! [`Pipeline::run`] executes them strictly in order, each stage consuming
//! the full output of the previous one, and notifies a
//! [`PipelineObserver`] at every boundary.
//!
//! # Static and dynamic dispatch
//!
//! `Pipeline` is generic over all stage types. [`DefaultPipeline`] spells out
//! the built-in stages; [`DynPipeline`] boxes every stage so that
//! [`DynPipeline::from_spec`] can choose implementations at runtime.

use std::path::Path;

use crate::errors::{FreqError, Result};
use crate::frequency::{FrequencyRows, FrequencyTable, NgramCounter, WordCounter};
use crate::nlp::cleaner::MetadataCleaner;
use crate::nlp::equivalence::EquivalenceTable;
use crate::nlp::stopwords::StopwordFilter;
use crate::output::CsvFrequencyWriter;
use crate::pipeline::artifacts::Transcript;
use crate::pipeline::observer::{
    PipelineObserver, StageClock, StageReport, StageReportBuilder, STAGE_CLEAN, STAGE_COUNT,
    STAGE_LOAD, STAGE_NORMALIZE, STAGE_STOPWORDS, STAGE_WRITE,
};
use crate::pipeline::spec::AnalysisSpec;
use crate::pipeline::traits::{Cleaner, FrequencyCounter, FrequencyWriter, Normalizer, TokenFilter};
use crate::pipeline::validation::ValidationEngine;

/// Enter a tracing span for a pipeline stage.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

// ============================================================================
// RowLimits — filters applied to sorted rows
// ============================================================================

/// Optional filters applied after sorting, before writing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowLimits {
    /// Drop rows counted fewer times than this.
    pub min_count: Option<u64>,
    /// Keep at most this many rows.
    pub top: Option<usize>,
}

impl RowLimits {
    pub fn apply(&self, rows: &mut FrequencyRows) {
        if let Some(min_count) = self.min_count {
            rows.retain_min_count(min_count);
        }
        if let Some(top) = self.top {
            rows.truncate(top);
        }
    }
}

// ============================================================================
// Pipeline — stage container
// ============================================================================

/// A pipeline composed of concrete stage implementations.
///
/// # Type parameters
///
/// | Param | Trait | Default impl |
/// |-------|-------|--------------|
/// | `Cl` | [`Cleaner`] | [`MetadataCleaner`] |
/// | `TF` | [`TokenFilter`] | [`StopwordFilter`] |
/// | `Nm` | [`Normalizer`] | [`EquivalenceTable`] |
/// | `Ct` | [`FrequencyCounter`] | [`WordCounter`] |
/// | `Wr` | [`FrequencyWriter`] | [`CsvFrequencyWriter`] |
#[derive(Debug, Clone)]
pub struct Pipeline<Cl, TF, Nm, Ct, Wr> {
    pub cleaner: Cl,
    pub token_filter: TF,
    pub normalizer: Nm,
    pub counter: Ct,
    pub writer: Wr,
    pub limits: RowLimits,
}

/// Type alias for the built-in stages.
pub type DefaultPipeline =
    Pipeline<MetadataCleaner, StopwordFilter, EquivalenceTable, WordCounter, CsvFrequencyWriter>;

/// Type alias for a pipeline assembled at runtime.
pub type DynPipeline = Pipeline<
    Box<dyn Cleaner>,
    Box<dyn TokenFilter>,
    Box<dyn Normalizer>,
    Box<dyn FrequencyCounter>,
    Box<dyn FrequencyWriter>,
>;

impl DefaultPipeline {
    /// Build a pipeline with the default stages:
    /// - Every known chat header layout stripped
    /// - No stopwords
    /// - No equivalences
    /// - Word counts
    /// - `freq.csv` in the working directory
    pub fn chat_defaults() -> Self {
        PipelineBuilder::new().build()
    }
}

impl DynPipeline {
    /// Validate `spec`, load its sources and assemble the matching stages.
    ///
    /// Validation warnings are logged; any validation error aborts with
    /// [`FreqError::InvalidSpec`] before a source file is touched.
    pub fn from_spec(spec: &AnalysisSpec) -> Result<Self> {
        let report = ValidationEngine::with_defaults().validate(spec);
        for warning in report.warnings() {
            tracing::warn!(%warning, "analysis spec warning");
        }
        if report.has_errors() {
            return Err(FreqError::InvalidSpec(report));
        }

        let stopwords = spec.sources.stopwords.load()?;
        let equivalences = spec.sources.equivalence.load()?;
        tracing::info!(
            format = spec.format.as_str(),
            stopwords = stopwords.len(),
            equivalences = equivalences.len(),
            mode = spec.frequency.mode.as_str(),
            "pipeline assembled"
        );

        let counter: Box<dyn FrequencyCounter> = match spec.frequency.ngram_size() {
            Some(n) => Box::new(NgramCounter::new(n)),
            None => Box::new(WordCounter),
        };

        Ok(Pipeline {
            cleaner: Box::new(MetadataCleaner::new(spec.format)),
            token_filter: Box::new(stopwords),
            normalizer: Box::new(equivalences),
            counter,
            writer: Box::new(CsvFrequencyWriter::new(&spec.output.path)),
            limits: RowLimits {
                min_count: spec.frequency.min_count,
                top: spec.frequency.top,
            },
        })
    }
}

// ============================================================================
// Pipeline::run — execute stages in order
// ============================================================================

impl<Cl, TF, Nm, Ct, Wr> Pipeline<Cl, TF, Nm, Ct, Wr>
where
    Cl: Cleaner,
    TF: TokenFilter,
    Nm: Normalizer,
    Ct: FrequencyCounter,
    Wr: FrequencyWriter,
{
    /// Run the clean → stopwords → normalize → count stages.
    pub fn count(
        &self,
        transcript: Transcript,
        observer: &mut impl PipelineObserver,
    ) -> Result<FrequencyTable> {
        observer.on_transcript(&transcript);

        // Stage 1: Clean
        let cleaned = {
            trace_stage!(STAGE_CLEAN);
            observer.on_stage_start(STAGE_CLEAN);
            let clock = StageClock::start();
            let cleaned = self.cleaner.clean_transcript(&transcript);
            let report = StageReport::new(clock.elapsed());
            observer.on_stage_end(STAGE_CLEAN, &report);
            cleaned
        };
        observer.on_cleaned(&cleaned);

        // Stage 2: Drop stopwords
        let filtered = {
            trace_stage!(STAGE_STOPWORDS);
            observer.on_stage_start(STAGE_STOPWORDS);
            let clock = StageClock::start();
            let filtered = self.token_filter.filter_tokens(&cleaned);
            let report = StageReportBuilder::new(clock.elapsed())
                .tokens(filtered.len())
                .build();
            observer.on_stage_end(STAGE_STOPWORDS, &report);
            filtered
        };
        observer.on_tokens(STAGE_STOPWORDS, &filtered);

        // Stage 3: Normalize
        let normalized = {
            trace_stage!(STAGE_NORMALIZE);
            observer.on_stage_start(STAGE_NORMALIZE);
            let clock = StageClock::start();
            let normalized = self.normalizer.normalize(filtered)?;
            let report = StageReportBuilder::new(clock.elapsed())
                .tokens(normalized.len())
                .build();
            observer.on_stage_end(STAGE_NORMALIZE, &report);
            normalized
        };
        observer.on_tokens(STAGE_NORMALIZE, &normalized);

        // Stage 4: Count
        let table = {
            trace_stage!(STAGE_COUNT);
            observer.on_stage_start(STAGE_COUNT);
            let clock = StageClock::start();
            let table = self.counter.count_tokens(&normalized)?;
            let report = StageReportBuilder::new(clock.elapsed())
                .tokens(normalized.len())
                .rows(table.len())
                .build();
            observer.on_stage_end(STAGE_COUNT, &report);
            table
        };
        observer.on_table(&table);

        Ok(table)
    }

    /// Run every stage except the writer and return the sorted, limited rows.
    pub fn analyze(
        &self,
        transcript: Transcript,
        observer: &mut impl PipelineObserver,
    ) -> Result<FrequencyRows> {
        let table = self.count(transcript, observer)?;
        let mut rows = table.into_rows();
        self.limits.apply(&mut rows);
        observer.on_rows(&rows);
        Ok(rows)
    }

    /// Run every stage, including the writer.
    ///
    /// Nothing is written when an earlier stage fails.
    pub fn run(
        &self,
        transcript: Transcript,
        observer: &mut impl PipelineObserver,
    ) -> Result<FrequencyRows> {
        let rows = self.analyze(transcript, observer)?;

        // Stage 5: Write
        trace_stage!(STAGE_WRITE);
        observer.on_stage_start(STAGE_WRITE);
        let clock = StageClock::start();
        self.writer.write_rows(&rows)?;
        let report = StageReportBuilder::new(clock.elapsed())
            .rows(rows.len())
            .build();
        observer.on_stage_end(STAGE_WRITE, &report);

        Ok(rows)
    }

    /// Load the transcript at `path`, then [`run`](Self::run).
    pub fn run_file(
        &self,
        path: impl AsRef<Path>,
        observer: &mut impl PipelineObserver,
    ) -> Result<FrequencyRows> {
        let transcript = {
            trace_stage!(STAGE_LOAD);
            observer.on_stage_start(STAGE_LOAD);
            let clock = StageClock::start();
            let transcript = Transcript::from_path(path)?;
            let report = StageReport::new(clock.elapsed());
            observer.on_stage_end(STAGE_LOAD, &report);
            transcript
        };
        self.run(transcript, observer)
    }
}

// ============================================================================
// PipelineBuilder — fluent construction with custom stages
// ============================================================================

/// Fluent builder for constructing a [`Pipeline`] with custom stages.
///
/// Starts from [`DefaultPipeline`]'s stages and allows overriding individual
/// ones.
///
/// ```
/// # use transcript_freq::pipeline::runner::PipelineBuilder;
/// # use transcript_freq::nlp::stopwords::StopwordFilter;
/// let pipeline = PipelineBuilder::new()
///     .token_filter(StopwordFilter::from_list(&["the", "a"]))
///     .build();
/// ```
pub struct PipelineBuilder<
    Cl = MetadataCleaner,
    TF = StopwordFilter,
    Nm = EquivalenceTable,
    Ct = WordCounter,
    Wr = CsvFrequencyWriter,
> {
    cleaner: Cl,
    token_filter: TF,
    normalizer: Nm,
    counter: Ct,
    writer: Wr,
    limits: RowLimits,
}

impl PipelineBuilder {
    /// Start building from the default stages.
    pub fn new() -> Self {
        PipelineBuilder {
            cleaner: MetadataCleaner::default(),
            token_filter: StopwordFilter::empty(),
            normalizer: EquivalenceTable::empty(),
            counter: WordCounter,
            writer: CsvFrequencyWriter::default(),
            limits: RowLimits::default(),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cl, TF, Nm, Ct, Wr> PipelineBuilder<Cl, TF, Nm, Ct, Wr> {
    /// Override the cleaner stage.
    pub fn cleaner<C: Cleaner>(self, c: C) -> PipelineBuilder<C, TF, Nm, Ct, Wr> {
        PipelineBuilder {
            cleaner: c,
            token_filter: self.token_filter,
            normalizer: self.normalizer,
            counter: self.counter,
            writer: self.writer,
            limits: self.limits,
        }
    }

    /// Override the stopword stage.
    pub fn token_filter<T: TokenFilter>(self, t: T) -> PipelineBuilder<Cl, T, Nm, Ct, Wr> {
        PipelineBuilder {
            cleaner: self.cleaner,
            token_filter: t,
            normalizer: self.normalizer,
            counter: self.counter,
            writer: self.writer,
            limits: self.limits,
        }
    }

    /// Override the normalize stage.
    pub fn normalizer<N: Normalizer>(self, n: N) -> PipelineBuilder<Cl, TF, N, Ct, Wr> {
        PipelineBuilder {
            cleaner: self.cleaner,
            token_filter: self.token_filter,
            normalizer: n,
            counter: self.counter,
            writer: self.writer,
            limits: self.limits,
        }
    }

    /// Override the count stage.
    pub fn counter<C: FrequencyCounter>(self, c: C) -> PipelineBuilder<Cl, TF, Nm, C, Wr> {
        PipelineBuilder {
            cleaner: self.cleaner,
            token_filter: self.token_filter,
            normalizer: self.normalizer,
            counter: c,
            writer: self.writer,
            limits: self.limits,
        }
    }

    /// Override the write stage.
    pub fn writer<W: FrequencyWriter>(self, w: W) -> PipelineBuilder<Cl, TF, Nm, Ct, W> {
        PipelineBuilder {
            cleaner: self.cleaner,
            token_filter: self.token_filter,
            normalizer: self.normalizer,
            counter: self.counter,
            writer: w,
            limits: self.limits,
        }
    }

    /// Set the row filters.
    pub fn limits(mut self, limits: RowLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Consume the builder and produce a [`Pipeline`].
    pub fn build(self) -> Pipeline<Cl, TF, Nm, Ct, Wr> {
        Pipeline {
            cleaner: self.cleaner,
            token_filter: self.token_filter,
            normalizer: self.normalizer,
            counter: self.counter,
            writer: self.writer,
            limits: self.limits,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
