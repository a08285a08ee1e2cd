//! Labwise command-line front end.
//!
//! Usage:
//!   labwise analyze --input request.json
//!   labwise analyze --input - --compact < request.json
//!   labwise prompt --input request.json
//!   labwise prompt --input request.json --analysis detailed.txt
//!   labwise ranges --catalog site.toml
//!   labwise demo

mod samples;

use std::{
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use labwise_catalog::{builtin, TomlCatalog};
use labwise_contracts::{
    error::{LabError, LabResult},
    patient::AnalyzeRequest,
};
use labwise_core::{analyzer::validate_request, traits::ReferenceCatalog, Analyzer};
use labwise_patterns::RuleRegistry;
use labwise_report::{
    prompt::{analysis_prompt, summary_prompt},
    AnalysisReport, FallbackNarrator, ReportPipeline, ResultSchemaVerifier,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Labwise: deterministic lab result interpretation.
#[derive(Parser)]
#[command(
    name = "labwise",
    about = "Classify lab values, compute derived metrics and detect cross-test patterns",
    long_about = "Classifies each lab value against a reference catalog, computes eGFR and\n\
                  lipid ratios, recognizes cross-test patterns, and emits a verified JSON report."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze an AnalyzeRequest JSON document and print the report.
    Analyze {
        /// Request file, or `-` for stdin.
        #[arg(short, long)]
        input: String,
        /// Reference catalog TOML to use instead of the built-in one.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Emit single-line JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Print the narrative prompt context for a request.
    Prompt {
        #[arg(short, long)]
        input: String,
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Detailed analysis text from a generator. When given, the physician
        /// summary prompt is printed instead of the analysis prompt.
        #[arg(long)]
        analysis: Option<PathBuf>,
    },
    /// Print the reference catalog as JSON, grouped by panel.
    Ranges {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Run the built-in sample patients and print a summary of each.
    Demo,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Analyze { input, catalog, compact } => run_analyze(&input, catalog.as_deref(), compact),
        Command::Prompt { input, catalog, analysis } => {
            run_prompt(&input, catalog.as_deref(), analysis.as_deref())
        }
        Command::Ranges { catalog } => run_ranges(catalog.as_deref()),
        Command::Demo => run_demo(),
    };

    if let Err(e) = result {
        eprintln!("labwise: {}", e);
        std::process::exit(1);
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn load_catalog(path: Option<&Path>) -> LabResult<Arc<TomlCatalog>> {
    match path {
        Some(p) => {
            info!(path = %p.display(), "loading reference catalog");
            Ok(Arc::new(TomlCatalog::from_file(p)?))
        }
        None => builtin(),
    }
}

fn analyzer_for(catalog: Arc<TomlCatalog>) -> Analyzer {
    let registry = RuleRegistry::with_default_rules(catalog.medication_effects());
    Analyzer::new(catalog, Box::new(registry))
}

/// Analyzer over `catalog_path` (or the built-in catalog), schema verifier,
/// and the fallback narrator.
pub(crate) fn build_pipeline(catalog_path: Option<&Path>) -> LabResult<ReportPipeline> {
    let catalog = load_catalog(catalog_path)?;
    Ok(ReportPipeline::new(
        analyzer_for(catalog),
        Box::new(ResultSchemaVerifier::new()),
        Box::new(FallbackNarrator),
    ))
}

fn parse_request(text: &str) -> LabResult<AnalyzeRequest> {
    serde_json::from_str(text).map_err(|e| LabError::MalformedRequest {
        reason: e.to_string(),
    })
}

fn read_request(input: &str) -> LabResult<AnalyzeRequest> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| LabError::MalformedRequest {
                reason: format!("failed to read stdin: {e}"),
            })?;
        buf
    } else {
        std::fs::read_to_string(input).map_err(|e| LabError::MalformedRequest {
            reason: format!("failed to read '{input}': {e}"),
        })?
    };
    parse_request(&text)
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> LabResult<String> {
    let encoded = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    encoded.map_err(|e| LabError::VerificationFailed {
        reason: format!("output could not be serialized: {e}"),
    })
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run_analyze(input: &str, catalog: Option<&Path>, compact: bool) -> LabResult<()> {
    let request = read_request(input)?;
    let report = build_pipeline(catalog)?.run(&request)?;
    println!("{}", to_json(&report, compact)?);
    Ok(())
}

fn prompt_text(request: &AnalyzeRequest, catalog: Option<&Path>, detailed: Option<&str>) -> LabResult<String> {
    let patient = validate_request(request)?;
    match detailed {
        Some(text) => Ok(summary_prompt(&patient, text.trim_end())),
        None => {
            let result = analyzer_for(load_catalog(catalog)?).analyze_validated(request, &patient);
            Ok(analysis_prompt(&result, &patient))
        }
    }
}

fn run_prompt(input: &str, catalog: Option<&Path>, analysis: Option<&Path>) -> LabResult<()> {
    let request = read_request(input)?;
    let detailed = analysis
        .map(|p| {
            std::fs::read_to_string(p).map_err(|e| LabError::MalformedRequest {
                reason: format!("failed to read '{}': {e}", p.display()),
            })
        })
        .transpose()?;
    println!("{}", prompt_text(&request, catalog, detailed.as_deref())?);
    Ok(())
}

fn run_ranges(catalog: Option<&Path>) -> LabResult<()> {
    let catalog = load_catalog(catalog)?;
    let panels: serde_json::Map<String, serde_json::Value> = catalog
        .by_panel()
        .into_iter()
        .map(|(panel, entries)| (panel.as_str().to_string(), json!(entries)))
        .collect();

    let doc = json!({
        "severity": catalog.severity_cutoffs(),
        "panels": panels,
        "medication_effects": catalog.medication_effects(),
    });
    println!("{}", to_json(&doc, false)?);
    Ok(())
}

fn run_demo() -> LabResult<()> {
    let pipeline = build_pipeline(None)?;

    println!();
    println!("Labwise: Lab Interpretation Demo");
    println!("================================");

    for sample in samples::all() {
        let request: AnalyzeRequest =
            serde_json::from_value(sample.request).map_err(|e| LabError::MalformedRequest {
                reason: format!("sample '{}': {e}", sample.title),
            })?;
        let report = pipeline.run(&request)?;
        print_summary(sample.title, &report);
    }

    println!();
    Ok(())
}

fn print_summary(title: &str, report: &AnalysisReport) {
    let r = &report.result;
    let s = &r.results_summary;

    println!();
    println!("── {} ──", title);
    println!(
        "  Patient   : {} y/o {}",
        report.patient_info.age, report.patient_info.gender
    );
    println!(
        "  Tests     : {} classified ({} normal, {} abnormal, {} critical)",
        s.total_tests, s.normal_count, s.abnormal_count, s.critical_count
    );
    for c in &r.critical_values {
        println!("  CRITICAL  : {} {} {} (ref {})", c.test, c.value, c.unit, c.reference_range);
    }
    for a in &r.abnormalities {
        println!("  [{:<6}]  : {} {} {} ({})", a.color.as_str(), a.test, a.value, a.unit, a.label);
    }
    if let (Some(egfr), Some(interp)) = (r.calculated_metrics.egfr, &r.calculated_metrics.egfr_interpretation) {
        println!("  eGFR      : {} ({}, {})", egfr, interp.stage, interp.description);
    }
    if let Some(risk) = &r.calculated_metrics.cardiac_risk {
        println!("  Cardiac   : {:?} risk from {} {}", risk.risk, risk.basis, risk.value);
    }
    for f in &r.pattern_findings {
        println!("  Pattern   : {} [{:?}]", f.name, f.qualifier);
    }
    for u in &r.unrecognized_values {
        println!("  Unknown   : {}", u.test);
    }
    println!("  Digest    : {}", report.result_digest);
    println!("  Summary   : {}", report.physician_summary);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
