use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use transcript_freq::nlp::cleaner::ChatFormat;
use transcript_freq::pipeline::observer::TracingObserver;
use transcript_freq::pipeline::spec::{FrequencyMode, SpecOverrides};
use transcript_freq::sources::{EquivalenceSource, StopwordSource};
use transcript_freq::{AnalysisSpec, DynPipeline};

/// Word-frequency tables from exported chat transcripts
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean a transcript and write its frequency table as CSV
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Transcript to analyze
    textfile: PathBuf,

    /// Count single words or n-grams ("words" | "ngrams")
    #[arg(long, value_name = "MODE")]
    freq_analysis: Option<FrequencyMode>,

    /// N-gram size for --freq-analysis ngrams
    #[arg(long, value_name = "N")]
    ngram_size: Option<usize>,

    /// Stopwords: "none", "lang:<code>", "file:<path>", a language code or a path
    #[arg(long, value_name = "SOURCE")]
    stopwords: Option<StopwordSource>,

    /// Equivalences: "none", "file:<path>" or a path (.json or dictionary)
    #[arg(long, value_name = "SOURCE")]
    equivalence: Option<EquivalenceSource>,

    /// JSON analysis spec; other flags override its values
    #[arg(short, long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Output CSV (default: freq.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Drop rows counted fewer times than this
    #[arg(long)]
    min_count: Option<u64>,

    /// Keep only the N most frequent rows
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Chat header layout: auto, legacy, bracketed, dashed
    #[arg(long, value_name = "FORMAT")]
    format: Option<ChatFormat>,

    /// Treat unknown fields in --config as errors
    #[arg(long)]
    strict: bool,
}

impl RunArgs {
    fn overrides(&self) -> SpecOverrides {
        SpecOverrides {
            format: self.format,
            mode: self.freq_analysis,
            n: self.ngram_size,
            stopwords: self.stopwords.clone(),
            equivalence: self.equivalence.clone(),
            output: self.output.clone(),
            min_count: self.min_count,
            top: self.top,
            strict: self.strict,
        }
    }

    /// Load `--config` (or the defaults) and apply flag overrides.
    fn analysis_spec(&self) -> Result<AnalysisSpec> {
        let mut spec = match &self.config {
            Some(path) => AnalysisSpec::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => AnalysisSpec::default(),
        };
        spec.apply_overrides(self.overrides());
        Ok(spec)
    }
}

fn run(args: RunArgs) -> Result<()> {
    let spec = args.analysis_spec()?;
    debug!(?spec, "analysis spec");

    let pipeline = DynPipeline::from_spec(&spec)?;
    let rows = pipeline
        .run_file(&args.textfile, &mut TracingObserver)
        .with_context(|| format!("failed to analyze {}", args.textfile.display()))?;

    info!(
        input = %args.textfile.display(),
        output = %spec.output.path.display(),
        rows = rows.len(),
        top = rows.rows().first().map(|r| r.token.as_str()).unwrap_or(""),
        "frequency table written"
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_line_number(true)
        .init();

    match Cli::parse().command {
        Command::Run(args) => run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Run(args) => args,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("spec.json");
        std::fs::write(
            &config,
            r#"{ "v": 1, "frequency": { "top": 10, "min_count": 2 }, "format": "dashed" }"#,
        )
        .unwrap();
        let config = config.to_str().unwrap();

        let args = run_args(&[
            "transcript-freq", "run", "chat.txt", "--config", config, "--top", "5",
            "--stopwords", "none", "--freq-analysis", "ngrams",
        ]);
        let spec = args.analysis_spec().unwrap();

        assert_eq!(spec.frequency.top, Some(5));
        assert_eq!(spec.frequency.min_count, Some(2));
        assert_eq!(spec.frequency.mode, FrequencyMode::Ngrams);
        assert_eq!(spec.format, ChatFormat::Dashed);
        assert_eq!(spec.sources.stopwords, StopwordSource::None);
    }

    #[test]
    fn test_strict_flag_rejects_unknown_config_fields() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("spec.json");
        std::fs::write(&config, r#"{ "v": 1, "colour": "red" }"#).unwrap();
        let config = config.to_str().unwrap();

        let lenient = run_args(&["transcript-freq", "run", "chat.txt", "-c", config]);
        assert!(DynPipeline::from_spec(&lenient.analysis_spec().unwrap()).is_ok());

        let strict = run_args(&["transcript-freq", "run", "chat.txt", "-c", config, "--strict"]);
        let spec = strict.analysis_spec().unwrap();
        assert!(spec.strict);
        assert!(DynPipeline::from_spec(&spec).is_err());
    }

    #[test]
    fn test_bad_flag_value_is_a_parse_error() {
        let parsed = Cli::try_parse_from(["transcript-freq", "run", "chat.txt", "--format", "fax"]);
        assert!(parsed.is_err());
    }
}
