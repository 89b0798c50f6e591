//! # transcript-freq
//!
//! Word-frequency tables from exported chat transcripts.
//!
//! A run is one strictly sequential pipeline:
//!
//! 1. **Load** the transcript from disk
//! 2. **Clean** it: drop blank lines, lowercase, strip timestamp/sender headers
//! 3. **Filter** stopwords
//! 4. **Normalize** vocabulary through an equivalence (synonym) table
//! 5. **Count** token occurrences
//! 6. **Write** the table as `token,count` CSV rows, most frequent first
//!
//! Each stage is a small trait in [`pipeline::traits`]; the
//! [`pipeline::runner::Pipeline`] composes concrete implementations and runs
//! them in order.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use transcript_freq::pipeline::artifacts::Transcript;
//! use transcript_freq::pipeline::observer::NoopObserver;
//! use transcript_freq::pipeline::runner::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new().build();
//! let transcript = Transcript::new("[10:15, 1/1/21] Alice: hello hello world");
//! let rows = pipeline.analyze(transcript, &mut NoopObserver)?;
//!
//! assert_eq!(rows.rows()[0].token, "hello");
//! assert_eq!(rows.rows()[0].count, 2);
//! ```

pub mod errors;
pub mod frequency;
pub mod nlp;
pub mod output;
pub mod pipeline;
pub mod sources;

pub use errors::{FreqError, Result};
pub use frequency::{FrequencyRow, FrequencyRows, FrequencyTable};
pub use pipeline::artifacts::{CleanedText, TokenStream, Transcript};
pub use pipeline::runner::{DynPipeline, Pipeline, PipelineBuilder};
pub use pipeline::spec::AnalysisSpec;
