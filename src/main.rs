use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rulepatch::rules::{scaler_migration, DEFAULT_TARGET};
use rulepatch::{check_file, ApplyStatus, MatchSpec, Occurrences, SessionOutcome};
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rulepatch")]
#[command(about = "Ordered, idempotent search-and-replace patching", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the bundled rule set to a file
    Apply {
        /// Target file
        #[arg(default_value = DEFAULT_TARGET)]
        file: PathBuf,

        /// Report outcomes without writing the file back
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Check rule status without modifying the file
    Status {
        /// Target file
        #[arg(default_value = DEFAULT_TARGET)]
        file: PathBuf,
    },

    /// List the bundled rules
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            file,
            dry_run,
            diff,
        } => cmd_apply(&file, dry_run, diff),

        Commands::Status { file } => cmd_status(&file),

        Commands::List => cmd_list(),
    }
}

/// Helper: Show unified diff between original and patched content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

/// Helper: Print one glyphed line per rule result
fn display_results(outcome: &SessionOutcome, dry_run: bool) {
    for result in outcome.report.results() {
        let line = match &result.detail {
            Some(detail) => format!("{} ({detail})", result.rule_id),
            None => result.rule_id.clone(),
        };
        match result.status {
            ApplyStatus::Applied => {
                if dry_run {
                    println!("{} would apply: {}", "✓".green(), line);
                } else {
                    println!("{} applied: {}", "✓".green(), line);
                }
            }
            ApplyStatus::AlreadyApplied => {
                println!("{} already applied: {}", "⊙".yellow(), line);
            }
            ApplyStatus::NotFound => {
                println!("{} not found: {}", "⊘".cyan(), line);
            }
        }
    }
}

fn display_summary(outcome: &SessionOutcome) {
    let summary = outcome.report.summary();
    println!();
    println!("{}", "Summary:".bold());
    println!("  {} applied", format!("{}", summary.applied).green());
    println!(
        "  {} already applied",
        format!("{}", summary.already_applied).yellow()
    );
    println!("  {} not found", format!("{}", summary.not_found).cyan());
}

fn cmd_apply(file: &Path, dry_run: bool, diff: bool) -> Result<()> {
    let rules = scaler_migration();

    println!("Target: {}", file.display());
    println!();

    // Capture the original text up front for diff output; the apply path
    // rewrites the file in place.
    let before = if diff {
        fs::read_to_string(file).ok()
    } else {
        None
    };

    let outcome = if dry_run {
        println!("{}", "[DRY RUN - showing what would be applied]".cyan());
        check_file(file, &rules)?
    } else {
        rulepatch::apply_to_file(file, &rules)?
    };

    display_results(&outcome, dry_run);

    if diff && outcome.modified {
        if let Some(before) = &before {
            display_diff(file, before, &outcome.text);
        }
    }

    display_summary(&outcome);

    if !outcome.modified {
        println!("{}", "File unchanged; nothing written.".dimmed());
    }

    Ok(())
}

fn cmd_status(file: &Path) -> Result<()> {
    let rules = scaler_migration();

    println!("{}", "Rule Status Report".bold());
    println!("Target: {}", file.display());
    println!();

    let outcome = check_file(file, &rules)?;

    for result in outcome.report.results() {
        match result.status {
            ApplyStatus::Applied => {
                println!(
                    "{} {}: target found, not yet applied",
                    "⊙".yellow(),
                    result.rule_id
                );
            }
            ApplyStatus::AlreadyApplied => {
                println!("{} {}: already applied", "✓".green(), result.rule_id);
            }
            ApplyStatus::NotFound => {
                println!("{} {}: pattern not found", "⊘".cyan(), result.rule_id);
            }
        }
    }

    Ok(())
}

fn cmd_list() -> Result<()> {
    let rules = scaler_migration();

    println!("{} ({} rules)", "Bundled rules".bold(), rules.len());
    for rule in &rules {
        let kind = match &rule.match_spec {
            MatchSpec::Literal(_) => "literal",
            MatchSpec::Pattern(_) => "pattern",
        };
        let occurrences = match rule.occurrences {
            Occurrences::AtMost(n) => format!("at most {n}"),
            Occurrences::All => "all".to_string(),
        };
        println!("  - {} [{kind}, {occurrences}]", rule.id);
    }

    Ok(())
}
