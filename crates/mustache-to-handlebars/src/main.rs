use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mustache_to_handlebars::batch::{
    self, FileOutcome, FileReport, RunSummary, delete_converted_inputs, discover,
};
use mustache_to_handlebars::{ClassificationSets, ConverterConfig, WhitespacePolicy};

#[derive(Parser)]
#[command(name = "mustache-to-handlebars")]
#[command(about = "Convert Mustache templates to Handlebars")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every .mustache file in a directory to .handlebars
    Convert {
        /// Directory containing .mustache templates
        in_dir: PathBuf,

        /// Output directory (defaults to the input directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Only convert templates directly inside the input directory
        #[arg(long)]
        no_recursive: bool,

        /// Remove each .mustache file once its conversion has been written
        #[arg(long)]
        delete_inputs: bool,

        /// Check mode: report what would happen without writing files
        #[arg(short, long)]
        check: bool,

        /// Output results as JSONL
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        classification: ClassificationArgs,
    },

    /// Report ambiguous tags without writing anything
    Check {
        /// Directory containing .mustache templates
        in_dir: PathBuf,

        /// Only check templates directly inside the input directory
        #[arg(long)]
        no_recursive: bool,

        /// Output results as JSONL
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        classification: ClassificationArgs,
    },
}

#[derive(Args)]
struct ClassificationArgs {
    /// TOML file with `if`, `each`, `with` name lists and a `[whitespace]` table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Names of boolean sections (comma-separated)
    #[arg(long = "if", value_name = "NAMES", value_delimiter = ',')]
    if_names: Vec<String>,

    /// Names of list sections (comma-separated)
    #[arg(long = "each", value_name = "NAMES", value_delimiter = ',')]
    each_names: Vec<String>,

    /// Names of context sections (comma-separated)
    #[arg(long = "with", value_name = "NAMES", value_delimiter = ',')]
    with_names: Vec<String>,

    /// Add `~` before standalone opening tags: {{~#if x}}
    #[arg(long)]
    trim_before_open: bool,

    /// Add `~` after standalone opening tags: {{#if x~}}
    #[arg(long)]
    trim_after_open: bool,

    /// Add `~` before standalone closing tags: {{~/if}}
    #[arg(long)]
    trim_before_close: bool,

    /// Add `~` after standalone closing tags: {{/if~}}
    #[arg(long)]
    trim_after_close: bool,
}

impl ClassificationArgs {
    /// Load the config file, if any, and add the command-line names and flags.
    fn into_config(self) -> Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::load_from_path(path)?,
            None => ConverterConfig::default(),
        };

        config.classification.extend(ClassificationSets::new(
            self.if_names,
            self.each_names,
            self.with_names,
        ));
        config.enable_whitespace(WhitespacePolicy {
            before_open: self.trim_before_open,
            after_open: self.trim_after_open,
            before_close: self.trim_before_close,
            after_close: self.trim_after_close,
        });

        for name in config.classification.duplicates() {
            warn!(name, "Name is in more than one set; using the first of if, each, with");
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "mustache_to_handlebars=debug"
    } else {
        "mustache_to_handlebars=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Convert {
            in_dir,
            out_dir,
            no_recursive,
            delete_inputs,
            check: check_mode,
            json,
            classification,
        } => {
            let config = classification.into_config()?;
            let out_dir = out_dir.unwrap_or_else(|| in_dir.clone());
            let jobs = discover(&in_dir, &out_dir, !no_recursive)?;

            let reports = batch::run(&jobs, &config, !check_mode);
            print_reports(&reports, json, check_mode)?;

            let summary = RunSummary::from_reports(&reports);
            if !json {
                print_summary(&summary, check_mode)?;
            }

            if delete_inputs && !check_mode {
                let removed = delete_converted_inputs(&reports)?;
                if !json {
                    println!("Removed {} original template(s)", removed);
                }
            } else if !json && !check_mode {
                println!("Original templates have not been deleted");
            }

            if summary.failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Check {
            in_dir,
            no_recursive,
            json,
            classification,
        } => {
            let config = classification.into_config()?;
            let jobs = discover(&in_dir, &in_dir, !no_recursive)?;

            let reports = batch::run(&jobs, &config, false);
            print_reports(&reports, json, true)?;

            let summary = RunSummary::from_reports(&reports);
            if !json {
                print_summary(&summary, true)?;
            }

            if summary.failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn print_reports(reports: &[FileReport], json: bool, check_mode: bool) -> Result<()> {
    for report in reports {
        if json {
            println!("{}", serde_json::to_string(report)?);
            continue;
        }

        let input = report.job.input.display();
        match &report.outcome {
            FileOutcome::Converted => {
                if check_mode {
                    println!("  {} {}", "✓".green(), input);
                } else {
                    println!(
                        "  {} {} -> {}",
                        "✓".green(),
                        input,
                        report.job.output.display()
                    );
                }
            }
            FileOutcome::SkippedAmbiguous { names } => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                println!(
                    "  {} {} (ambiguous: {})",
                    "?".yellow(),
                    input,
                    names.join(", ")
                );
            }
            FileOutcome::Failed { error } => {
                eprintln!("  {} {}: {}", "✗".red(), input, error);
            }
        }
    }
    Ok(())
}

fn print_summary(summary: &RunSummary, check_mode: bool) -> Result<()> {
    println!("\n{}", "=== Summary ===".bold());
    println!("Total files:         {}", summary.total());
    println!(
        "{:<21}{} {}",
        if check_mode { "Convertible:" } else { "Converted:" },
        summary.converted,
        "✓".green()
    );
    println!(
        "Skipped (ambiguous): {} {}",
        summary.skipped,
        if summary.skipped > 0 {
            "?".yellow()
        } else {
            "✓".green()
        }
    );
    println!(
        "Failed:              {} {}",
        summary.failed,
        if summary.failed > 0 {
            "✗".red()
        } else {
            "✓".green()
        }
    );

    if summary.ambiguous.is_empty() {
        return Ok(());
    }

    println!("\n{}", "Ambiguous tags:".bold());
    for name in &summary.ambiguous {
        println!("  {}", name.cyan());
    }

    println!(
        "\n{}",
        "Suggested classification (a guess; review before use with --config):".bold()
    );
    print!("{}", summary.suggestions().to_toml()?);
    Ok(())
}
