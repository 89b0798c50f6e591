//! Validation engine for analysis specifications.
//!
//! The engine runs all registered [`ValidationRule`]s against an
//! [`AnalysisSpec`](super::spec::AnalysisSpec) and collects every diagnostic
//! into a [`ValidationReport`]; it never short-circuits on the first error,
//! so users see all problems at once.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use transcript_freq::pipeline::validation::ValidationEngine;
//!
//! let engine = ValidationEngine::with_defaults();
//! let report = engine.validate(&spec);
//! if report.has_errors() {
//!     for err in report.errors() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use super::error_code::ErrorCode;
use super::errors::AnalysisSpecError;
use super::spec::*;
use crate::nlp::stopwords::{StopwordFilter, SUPPORTED_LANGUAGES};
use crate::sources::StopwordSource;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding: an [`AnalysisSpecError`] tagged with its
/// severity.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: AnalysisSpecError,
}

impl ValidationDiagnostic {
    pub fn error(err: AnalysisSpecError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: AnalysisSpecError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &AnalysisSpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &AnalysisSpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no diagnostics at all.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// All errors on one line, separated by `; `.
    pub fn summary(&self) -> String {
        self.errors()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects an [`AnalysisSpec`] and returns
/// zero or more diagnostics.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"ngram_size"`).
    fn name(&self) -> &str;

    /// Inspect `spec` and return any findings.
    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against an [`AnalysisSpec`] and collects
/// all diagnostics into a [`ValidationReport`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(NgramSizeRule));
        engine.add_rule(Box::new(RowLimitsRule));
        engine.add_rule(Box::new(StopwordLanguageRule));
        engine.add_rule(Box::new(SourcePathsRule));
        engine.add_rule(Box::new(OutputPathRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    /// Register an additional rule.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Run all rules against `spec` and return the collected report.
    pub fn validate(&self, spec: &AnalysisSpec) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            let findings = rule.validate(spec);
            if !findings.is_empty() {
                tracing::debug!(rule = rule.name(), findings = findings.len(), "spec rule fired");
            }
            report.diagnostics.extend(findings);
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Only version 1 is understood ────────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            AnalysisSpecError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("unsupported spec version {}", spec.v),
            )
            .with_hint(format!("Set \"v\": {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. n-gram size ─────────────────────────────────────────────────────────

struct NgramSizeRule;

impl ValidationRule for NgramSizeRule {
    fn name(&self) -> &str {
        "ngram_size"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        match (spec.frequency.mode, spec.frequency.n) {
            (FrequencyMode::Ngrams, Some(0)) => vec![ValidationDiagnostic::error(
                AnalysisSpecError::new(
                    ErrorCode::InvalidValue,
                    "/frequency/n",
                    "n must be at least 1",
                )
                .with_hint("Use n: 2 for bigrams, or mode: words for single tokens"),
            )],
            (FrequencyMode::Words, Some(_)) => vec![ValidationDiagnostic::warning(
                AnalysisSpecError::new(
                    ErrorCode::InvalidValue,
                    "/frequency/n",
                    "n is ignored in words mode",
                )
                .with_hint("Set mode to \"ngrams\" or remove n"),
            )],
            _ => vec![],
        }
    }
}

// ─── 3. Row limits must be positive when set ────────────────────────────────

struct RowLimitsRule;

impl ValidationRule for RowLimitsRule {
    fn name(&self) -> &str {
        "row_limits"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();

        let checks: &[(&str, bool)] = &[
            ("min_count", spec.frequency.min_count == Some(0)),
            ("top", spec.frequency.top == Some(0)),
        ];

        for &(field, is_zero) in checks {
            if is_zero {
                out.push(ValidationDiagnostic::error(
                    AnalysisSpecError::new(
                        ErrorCode::InvalidValue,
                        format!("/frequency/{field}"),
                        format!("{field} must be greater than 0"),
                    )
                    .with_hint(format!(
                        "Remove {field} to disable the limit, or set it to a positive value"
                    )),
                ));
            }
        }

        out
    }
}

// ─── 4. Built-in stopword language must exist ───────────────────────────────

struct StopwordLanguageRule;

impl ValidationRule for StopwordLanguageRule {
    fn name(&self) -> &str {
        "stopword_language"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        match &spec.sources.stopwords {
            StopwordSource::Language(lang) if !StopwordFilter::is_supported_language(lang) => {
                vec![ValidationDiagnostic::error(
                    AnalysisSpecError::new(
                        ErrorCode::InvalidValue,
                        "/sources/stopwords",
                        format!("no built-in stopword list for \"{lang}\""),
                    )
                    .with_hint(format!(
                        "Use one of: {}, or file:<path>",
                        SUPPORTED_LANGUAGES.join(", ")
                    )),
                )]
            }
            _ => vec![],
        }
    }
}

// ─── 5. file: sources must exist ────────────────────────────────────────────

struct SourcePathsRule;

impl SourcePathsRule {
    fn check(pointer: &str, path: Option<&Path>) -> Option<ValidationDiagnostic> {
        let path = path?;
        if path.is_file() {
            return None;
        }
        Some(ValidationDiagnostic::error(
            AnalysisSpecError::new(
                ErrorCode::MissingSource,
                pointer,
                format!("{} does not exist or is not a file", path.display()),
            )
            .with_hint("Check the path, or use \"none\" to skip this table"),
        ))
    }
}

impl ValidationRule for SourcePathsRule {
    fn name(&self) -> &str {
        "source_paths"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        [
            Self::check("/sources/stopwords", spec.sources.stopwords.path()),
            Self::check("/sources/equivalence", spec.sources.equivalence.path()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

// ─── 6. Output path must be set ─────────────────────────────────────────────

struct OutputPathRule;

impl ValidationRule for OutputPathRule {
    fn name(&self) -> &str {
        "output_path"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        if !spec.output.path.as_os_str().is_empty() {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            AnalysisSpecError::new(ErrorCode::InvalidValue, "/output/path", "output path is empty")
                .with_hint("Remove the field to write freq.csv in the working directory"),
        )]
    }
}

// ─── 7. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

type ExtraFields = HashMap<String, serde_json::Value>;

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        let severity = if spec.strict {
            ValidationDiagnostic::error
        } else {
            ValidationDiagnostic::warning
        };
        let sections: [(&str, &ExtraFields); 4] = [
            ("", &spec.unknown_fields),
            ("/sources", &spec.sources.unknown_fields),
            ("/frequency", &spec.frequency.unknown_fields),
            ("/output", &spec.output.unknown_fields),
        ];

        let mut out = Vec::new();
        for (section, extra) in sections {
            let mut keys: Vec<&String> = extra.keys().collect();
            keys.sort();
            out.extend(keys.into_iter().map(|key| {
                severity(
                    AnalysisSpecError::new(
                        ErrorCode::UnknownField,
                        format!("{section}/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            }));
        }
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: build an AnalysisSpec from JSON.
    fn spec(json: &str) -> AnalysisSpec {
        serde_json::from_str(json).unwrap()
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::with_defaults()
    }

    // ─── Valid specs ────────────────────────────────────────────────────

    #[test]
    fn test_minimal_spec_is_valid() {
        let report = engine().validate(&spec(r#"{ "v": 1 }"#));
        assert!(!report.has_errors());
        assert!(report.is_empty());
    }

    #[test]
    fn test_default_spec_is_valid() {
        assert!(engine().validate(&AnalysisSpec::default()).is_empty());
    }

    #[test]
    fn test_ngrams_with_size_is_valid() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "frequency": { "mode": "ngrams", "n": 3 } }"#,
        ));
        assert!(report.is_empty());
    }

    #[test]
    fn test_existing_source_files_are_valid() {
        let dir = tempfile::tempdir().unwrap();
        let stop = dir.path().join("stop.txt");
        let dict = dir.path().join("dict.txt");
        std::fs::write(&stop, "a\n").unwrap();
        std::fs::write(&dict, "a\tb\n").unwrap();

        let json = format!(
            r#"{{ "v": 1, "sources": {{ "stopwords": "file:{}", "equivalence": "file:{}" }} }}"#,
            stop.display(),
            dict.display()
        );
        assert!(engine().validate(&spec(&json)).is_empty());
    }

    // ─── Rule: version ──────────────────────────────────────────────────

    #[test]
    fn test_unsupported_version_fails() {
        let report = engine().validate(&spec(r#"{ "v": 2 }"#));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::UnsupportedVersion);
        assert_eq!(errs[0].path, "/v");
    }

    // ─── Rule: ngram_size ───────────────────────────────────────────────

    #[test]
    fn test_zero_ngram_size_fails() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "frequency": { "mode": "ngrams", "n": 0 } }"#,
        ));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::InvalidValue);
        assert_eq!(errs[0].path, "/frequency/n");
    }

    #[test]
    fn test_ngram_size_in_words_mode_warns() {
        let report = engine().validate(&spec(r#"{ "v": 1, "frequency": { "n": 2 } }"#));
        assert!(!report.has_errors());
        assert_eq!(report.warnings().count(), 1);
    }

    // ─── Rule: row_limits ───────────────────────────────────────────────

    #[test]
    fn test_zero_top_fails() {
        let report = engine().validate(&spec(r#"{ "v": 1, "frequency": { "top": 0 } }"#));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].path.contains("top"));
    }

    #[test]
    fn test_zero_min_count_and_top_reports_two_errors() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "frequency": { "min_count": 0, "top": 0 } }"#,
        ));
        assert_eq!(report.errors().count(), 2);
    }

    // ─── Rule: stopword_language ────────────────────────────────────────

    #[test]
    fn test_unknown_language_fails() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "sources": { "stopwords": "lang:tlh" } }"#,
        ));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].path, "/sources/stopwords");
        assert!(errs[0].hint.as_deref().unwrap_or("").contains("pt"));
    }

    #[test]
    fn test_known_language_is_valid() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "sources": { "stopwords": "lang:pt" } }"#,
        ));
        assert!(report.is_empty());
    }

    // ─── Rule: source_paths ─────────────────────────────────────────────

    #[test]
    fn test_missing_source_files_fail() {
        let report = engine().validate(&spec(
            r#"{
                "v": 1,
                "sources": {
                    "stopwords": "file:/definitely/not/here.txt",
                    "equivalence": "file:/definitely/not/here.json"
                }
            }"#,
        ));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.code == ErrorCode::MissingSource));
    }

    // ─── Rule: output_path ──────────────────────────────────────────────

    #[test]
    fn test_empty_output_path_fails() {
        let report = engine().validate(&spec(r#"{ "v": 1, "output": { "path": "" } }"#));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].path, "/output/path");
    }

    // ─── Rule: unknown_fields (strict mode) ─────────────────────────────

    #[test]
    fn test_unknown_fields_non_strict_are_warnings() {
        let report = engine().validate(&spec(r#"{ "v": 1, "strict": false, "bogus": 42 }"#));
        assert!(!report.has_errors());
        let warns: Vec<_> = report.warnings().collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].code, ErrorCode::UnknownField);
        assert!(warns[0].path.contains("bogus"));
    }

    #[test]
    fn test_unknown_fields_strict_are_errors() {
        let report = engine().validate(&spec(r#"{ "v": 1, "strict": true, "bogus": 42 }"#));
        assert!(report.has_errors());
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn test_unknown_nested_fields_strict() {
        let report = engine().validate(&spec(
            r#"{
                "v": 1,
                "strict": true,
                "sources": { "synonyms": "x" },
                "frequency": { "buckets": 3 },
                "output": { "header": true }
            }"#,
        ));
        let paths: Vec<_> = report.errors().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/sources/synonyms", "/frequency/buckets", "/output/header"]);
    }

    // ─── Report helpers ─────────────────────────────────────────────────

    #[test]
    fn test_multiple_rules_fire_independently() {
        let report = engine().validate(&spec(
            r#"{
                "v": 3,
                "strict": true,
                "bogus": true,
                "frequency": { "top": 0 }
            }"#,
        ));
        assert_eq!(report.errors().count(), 3);
        assert_eq!(report.summary().matches("; ").count(), 2);
    }

    #[test]
    fn test_custom_rule() {
        struct AlwaysWarnRule;
        impl ValidationRule for AlwaysWarnRule {
            fn name(&self) -> &str {
                "always_warn"
            }
            fn validate(&self, _spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
                vec![ValidationDiagnostic::warning(AnalysisSpecError::new(
                    ErrorCode::ValidationFailed,
                    "",
                    "custom warning",
                ))]
            }
        }

        let mut eng = ValidationEngine::new();
        eng.add_rule(Box::new(AlwaysWarnRule));
        let report = eng.validate(&spec(r#"{ "v": 1 }"#));
        assert!(!report.has_errors());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = engine().validate(&spec(r#"{ "v": 1, "frequency": { "top": 0 } }"#));
        let json = serde_json::to_value(&report).unwrap();
        let diags = json["diagnostics"].as_array().unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0]["severity"], "error");
        assert_eq!(diags[0]["code"], "invalid_value");
    }
}
