//! PBooster - browsing-history anonymization
//! Command-line interface for running lambda and population sweeps
//!
//! ## Environment Variables
//! - `PBOOSTER_CONFIG`: settings file (default: ./pbooster.toml when present)
//! - `RUST_LOG`: log filter (default: `pbooster=info,pbooster_core=info`)

mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use pbooster_core::{
    Dataset, OptimizerConfig, SweepPoint, SweepReport, TopicSelector, UserProfile,
    lambda_sweep, population_sweep, privacy,
};
use settings::Settings;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "pbooster=info,pbooster_core=info";

#[derive(Parser)]
#[command(name = "pbooster")]
#[command(author = "PBooster Contributors")]
#[command(version = "2026.1.17")]
#[command(about = "PBooster - browsing-history anonymization by local search", long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, global = true, value_name = "FILE", env = "PBOOSTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep every lambda of the dataset on one user
    Sweep {
        /// Dataset file
        #[arg(value_name = "DATASET")]
        dataset: PathBuf,

        /// Target user name (default: experiment.target_user)
        #[arg(short, long)]
        user: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run every user of a group at a single lambda
    Population {
        /// Dataset file
        #[arg(value_name = "DATASET")]
        dataset: PathBuf,

        /// User group name (default: experiment.population_user)
        #[arg(short, long)]
        user: Option<String>,

        /// Lambda value (default: experiment.population_lambda)
        #[arg(short, long)]
        lambda: Option<f64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Optimize one user at one lambda and show the perturbation
    Optimize {
        /// Dataset file
        #[arg(value_name = "DATASET")]
        dataset: PathBuf,

        /// User name
        #[arg(short, long)]
        user: String,

        /// Lambda value
        #[arg(short, long)]
        lambda: f64,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a dataset without optimizing
    Check {
        /// Dataset file
        #[arg(value_name = "DATASET")]
        dataset: PathBuf,
    },

    /// Print the effective settings as TOML
    Config,

    /// Show information about PBooster
    Info,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = load_settings(cli.config.as_deref()).and_then(|settings| match cli.command {
        Commands::Sweep { dataset, user, json } => {
            sweep_command(&settings, &dataset, user.as_deref(), json)
        }
        Commands::Population { dataset, user, lambda, json } => {
            population_command(&settings, &dataset, user.as_deref(), lambda, json)
        }
        Commands::Optimize { dataset, user, lambda, json } => {
            optimize_command(&settings, &dataset, &user, lambda, json)
        }
        Commands::Check { dataset } => check_command(&dataset),
        Commands::Config => config_command(&settings),
        Commands::Info => {
            print_info();
            Ok(())
        }
    });

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;
    Settings::load(explicit, &cwd)
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    let dataset = Dataset::from_path(path)
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;
    tracing::info!(
        "Loaded {} users and {} lambda values from {}",
        dataset.users.len(),
        dataset.lambdas.len(),
        path.display()
    );
    Ok(dataset)
}

fn find_target<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a UserProfile> {
    dataset
        .target(name)
        .with_context(|| format!("No user named '{}' in dataset", name))
}

// ============================================================================
// Sweep commands
// ============================================================================

fn sweep_command(settings: &Settings, path: &Path, user: Option<&str>, json: bool) -> Result<()> {
    let dataset = load_dataset(path)?;
    let name = user.unwrap_or(&settings.experiment.target_user);
    let target = find_target(&dataset, name)?;
    let epsilon = settings.epsilon_or(dataset.epsilon);

    let report = lambda_sweep(target, &dataset.lambdas, epsilon, settings.search.max_iterations)
        .with_context(|| format!("Lambda sweep failed for '{}'", name))?;

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!(
        "{} '{}' ({}) over {} lambda values, ε = {}",
        "Sweeping".green().bold(),
        name.cyan(),
        target.history(),
        report.len(),
        epsilon
    );
    print_report(&report, "Lambda", |p| format!("{}", p.lambda));

    let violations = report.tradeoff_violations();
    if violations > 0 {
        println!(
            "{} {} lambda step(s) lowered privacy or utility loss",
            "note:".yellow().bold(),
            violations
        );
    }

    Ok(())
}

fn population_command(
    settings: &Settings,
    path: &Path,
    user: Option<&str>,
    lambda: Option<f64>,
    json: bool,
) -> Result<()> {
    let dataset = load_dataset(path)?;
    let name = user.unwrap_or(&settings.experiment.population_user);
    let lambda = lambda.unwrap_or(settings.experiment.population_lambda);
    let epsilon = settings.epsilon_or(dataset.epsilon);

    if !dataset.contains_lambda(lambda) {
        tracing::warn!("Lambda {} is not listed in the dataset", lambda);
    }

    let group: Vec<&UserProfile> = dataset.users_named(name).collect();
    if group.is_empty() {
        anyhow::bail!("No user named '{}' in dataset", name);
    }

    let report = population_sweep(group, lambda, epsilon, settings.search.max_iterations)
        .with_context(|| format!("Population sweep failed for '{}'", name))?;

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!(
        "{} {} user(s) named '{}' at λ = {}, ε = {}",
        "Running".green().bold(),
        report.len(),
        name.cyan(),
        lambda,
        epsilon
    );
    let mut index = 0;
    print_report(&report, "#", |_| {
        index += 1;
        index.to_string()
    });

    Ok(())
}

fn print_report(report: &SweepReport, label: &str, mut key: impl FnMut(&SweepPoint) -> String) {
    println!(
        "{:>8}  {:>10}  {:>10}  {}",
        label.bold(),
        "Privacy".bold(),
        "Utility".bold(),
        "Perturbation".bold()
    );
    for point in &report.points {
        println!(
            "{:>8}  {:>10.6}  {:>10.6}  {}",
            key(point),
            point.privacy,
            point.utility,
            point.perturbation
        );
    }
}

// ============================================================================
// Single-run commands
// ============================================================================

fn optimize_command(settings: &Settings, path: &Path, user: &str, lambda: f64, json: bool) -> Result<()> {
    let dataset = load_dataset(path)?;
    let target = find_target(&dataset, user)?;
    let config = OptimizerConfig::new(lambda, settings.epsilon_or(dataset.epsilon))?
        .with_max_iterations(settings.search.max_iterations);

    let outcome = TopicSelector::new(config)
        .select(target)
        .with_context(|| format!("Optimization failed for '{}'", user))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let perturbed = outcome.perturbed_history(target.history())?;
    let original_privacy = privacy(target.history())?;

    println!("{} '{}' at λ = {}, ε = {}", "Optimized".green().bold(), user.cyan(), lambda, config.epsilon);
    println!("  {:<14} {}", "Original:".bold(), target.history());
    println!("  {:<14} {}", "Perturbation:".bold(), outcome.perturbation);
    println!("  {:<14} {}", "Anonymized:".bold(), perturbed);
    println!("  {:<14} {:.6} -> {:.6}", "Privacy:".bold(), original_privacy, outcome.privacy);
    println!("  {:<14} {:.6}", "Utility:".bold(), outcome.utility());
    println!(
        "  {:<14} {} moves, {} passes, {} evaluations",
        "Search:".bold(),
        outcome.moves.len(),
        outcome.iterations,
        outcome.evaluations
    );

    Ok(())
}

fn check_command(path: &Path) -> Result<()> {
    let dataset = load_dataset(path)?;

    println!("{} {}", "Checking".green().bold(), path.display().to_string().cyan());
    println!("  {:<10} {}", "Epsilon:".bold(), dataset.epsilon);
    println!(
        "  {:<10} {}",
        "Lambdas:".bold(),
        dataset.lambdas.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(", ")
    );

    let mut invalid = 0;
    for name in dataset.user_names() {
        let group: Vec<&UserProfile> = dataset.users_named(name).collect();
        println!("  {:<10} {} profile(s)", format!("{}:", name).bold(), group.len());

        for profile in group {
            if let Err(e) = privacy(profile.history()) {
                invalid += 1;
                println!("    {} {} ({}): {}", "invalid".red().bold(), name, profile.history(), e);
            }
        }
    }

    if invalid > 0 {
        anyhow::bail!("{} profile(s) cannot be optimized", invalid);
    }

    println!("{} {} profiles", "    Valid".green().bold(), dataset.users.len());
    Ok(())
}

fn config_command(settings: &Settings) -> Result<()> {
    print!("{}", settings.to_toml()?);
    Ok(())
}

fn print_info() {
    println!("{}", "PBooster - browsing-history anonymization".bold());
    println!();
    println!("  Objective:  G = λ · privacy − utility_loss");
    println!("  Privacy:    base-10 Shannon entropy of the topic distribution");
    println!("  Utility:    1 − ½ (1 − cos(p_original, p_anonymized))");
    println!("  Search:     first-improvement local search, accept if G > (1 + ε/n²) · best");
    println!();
    println!("Dataset format:");
    println!("  Lambda: 0, 0.5, 1, 10");
    println!("  Epsilon: 0.1");
    println!("  User50: sports 40, news 10");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_covers_core() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        let targets: Vec<&str> = DEFAULT_LOG_FILTER
            .split(',')
            .filter_map(|directive| directive.split('=').next())
            .collect();
        assert!(targets.contains(&"pbooster"));
        assert!(targets.contains(&"pbooster_core"));
    }
}
