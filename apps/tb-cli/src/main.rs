use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tb_app::{
    AppResult, FCircConfig, FCircRequest, RunSummary, fcirc_service, query, study_service,
};
use tb_results::FCircRow;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tracebase-fcirc")]
#[command(about = "TraceBase FCirc - circulatory flux from isotope-tracing serum data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate study file syntax and structure
    Validate {
        /// Path to the study YAML or JSON file
        study_path: PathBuf,
    },
    /// List serum samples in a study
    Samples {
        /// Path to the study YAML or JSON file
        study_path: PathBuf,
    },
    /// Compute FCirc for every serum sample, tracer and labeled element
    Fcirc {
        /// Path to the study YAML or JSON file
        study_path: PathBuf,
        /// Run configuration YAML
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Output TSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List cached runs for a study
    Runs {
        /// Path to the study YAML or JSON file
        study_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the study YAML or JSON file
        study_path: PathBuf,
        /// Run ID to display
        run_id: String,
        /// Output TSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { study_path } => cmd_validate(&study_path),
        Commands::Samples { study_path } => cmd_samples(&study_path),
        Commands::Fcirc {
            study_path,
            config,
            no_cache,
            output,
        } => cmd_fcirc(&study_path, config.as_deref(), no_cache, output.as_deref()),
        Commands::Runs { study_path } => cmd_runs(&study_path),
        Commands::ShowRun {
            study_path,
            run_id,
            output,
        } => cmd_show_run(&study_path, &run_id, output.as_deref()),
    }
}

fn cmd_validate(study_path: &Path) -> AppResult<()> {
    eprintln!("Validating study: {}", study_path.display());
    let study = study_service::load_study(study_path)?;
    study_service::validate_study(&study)?;
    eprintln!("✓ Study is valid");
    Ok(())
}

fn cmd_samples(study_path: &Path) -> AppResult<()> {
    let study = study_service::load_study(study_path)?;
    let samples = study_service::list_samples(&study);

    if samples.is_empty() {
        println!("No serum samples found in study");
    } else {
        println!("Serum samples in '{}':", study.name);
        for sample in samples {
            let time = sample
                .time_collected_min
                .map(|t| format!("{t} min"))
                .unwrap_or_else(|| "time unknown".to_string());
            println!(
                "  {} - animal {} ({}, {} tracers, {} measurements)",
                sample.id, sample.animal_id, time, sample.tracer_count, sample.measurement_count
            );
        }
    }
    Ok(())
}

fn cmd_fcirc(
    study_path: &Path,
    config_path: Option<&Path>,
    no_cache: bool,
    output: Option<&Path>,
) -> AppResult<()> {
    let mut config = match config_path {
        Some(path) => FCircConfig::load(path)?,
        None => FCircConfig::default(),
    };
    if no_cache {
        config.use_cache = false;
    }

    let response = fcirc_service::ensure_fcirc_run(&FCircRequest { study_path, config })?;

    if response.loaded_from_cache {
        eprintln!("✓ Loaded from cache: {}", response.run_id);
    } else {
        eprintln!("✓ FCirc computed: {}", response.run_id);
    }
    print_summary(&query::summarize_rows(&response.rows));
    eprintln!("  Elapsed: {:.3}s", response.elapsed_s);

    write_table(&response.rows, output)
}

fn cmd_runs(study_path: &Path) -> AppResult<()> {
    let runs = fcirc_service::list_runs(study_path)?;

    if runs.is_empty() {
        println!("No cached runs found for study: {}", study_path.display());
    } else {
        println!("Cached runs:");
        for manifest in runs {
            println!(
                "  {} ({}, calculator {}, {} records, {} not computable)",
                manifest.run_id,
                manifest.timestamp,
                manifest.calculator_version,
                manifest.record_count,
                manifest.failed_count
            );
        }
    }
    Ok(())
}

fn cmd_show_run(study_path: &Path, run_id: &str, output: Option<&Path>) -> AppResult<()> {
    show_run(study_path, run_id, output, &mut std::io::stdout().lock())
}

/// Summary to stderr; the table to `output`, or to `stdout` without one.
fn show_run<W: Write>(
    study_path: &Path,
    run_id: &str,
    output: Option<&Path>,
    stdout: &mut W,
) -> AppResult<()> {
    eprintln!("Loading run: {}", run_id);

    let (manifest, rows) = fcirc_service::load_run(study_path, run_id)?;

    eprintln!("\nRun Summary:");
    eprintln!("  Study: {}", manifest.study_name);
    eprintln!("  Computed: {}", manifest.timestamp);
    eprintln!("  Calculator: {}", manifest.calculator_version);
    print_summary(&query::summarize_rows(&rows));

    let failed: Vec<&FCircRow> = rows.iter().filter(|r| !r.is_ok()).collect();
    if !failed.is_empty() {
        eprintln!("\nNot computable:");
        for row in failed {
            eprintln!(
                "  {} {} {}: {}",
                row.serum_sample, row.tracer, row.element, row.status
            );
        }
    }

    write_table_to(&rows, output, stdout)
}

fn print_summary(summary: &RunSummary) {
    eprintln!("  Records: {}", summary.record_count);
    eprintln!("  Computed: {}", summary.ok_count);
    eprintln!("  Not computable: {}", summary.failed_count);
    eprintln!("  Flagged by serum validity: {}", summary.flagged_count);
    eprintln!(
        "  Samples: {}  Tracers: {}",
        summary.sample_count, summary.tracer_count
    );
}

fn write_table(rows: &[FCircRow], output: Option<&Path>) -> AppResult<()> {
    write_table_to(rows, output, &mut std::io::stdout().lock())
}

fn write_table_to<W: Write>(
    rows: &[FCircRow],
    output: Option<&Path>,
    stdout: &mut W,
) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, tb_results::to_tsv_string(rows)?)?;
        eprintln!("✓ Exported {} rows to {}", rows.len(), path.display());
    } else {
        tb_results::write_tsv(rows, &mut *stdout)?;
    }
    Ok(())
}
