use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use chartcheck::config::TestConfig;
use chartcheck::printer::Printer;
use chartcheck::runner::TestRunner;
use chartcheck::walker;

#[derive(Parser)]
#[command(name = "chartcheck")]
#[command(about = "Snapshot-testing harness for Helm charts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run test suites against one or more charts
    Run {
        /// Chart directories to test
        #[arg(required = true)]
        charts: Vec<PathBuf>,

        /// Test file glob pattern, relative to each chart (repeatable;
        /// overrides config)
        #[arg(short = 'f', long = "file")]
        files: Vec<String>,

        /// Also run test suites found in charts/ subcharts
        #[arg(long)]
        with_subchart: bool,

        /// Values override file handed to the renderer (repeatable)
        #[arg(long)]
        values: Vec<PathBuf>,

        /// Path to config file (default: discover .chartcheck.yaml upward)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// List matched test files without running them
        #[arg(long)]
        list_tests: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            charts,
            files,
            with_subchart,
            values,
            config: config_path,
            list_tests,
            no_color,
        } => {
            let config = load_or_discover_config(&charts, config_path.as_deref())
                .with_overrides(files, with_subchart, values);

            if list_tests {
                list_discovered_tests(&charts, &config)?;
                return Ok(());
            }

            let colors = !no_color && std::io::stdout().is_terminal();
            let printer = Printer::new(std::io::stdout()).with_colors(colors);
            let mut runner = TestRunner::new(printer, config);

            if !runner.run(&charts) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Load config from explicit path or discover upward from the first chart.
fn load_or_discover_config(charts: &[PathBuf], explicit_path: Option<&Path>) -> TestConfig {
    match explicit_path {
        Some(path) => TestConfig::load(path).unwrap_or_default(),
        None => charts
            .first()
            .and_then(|chart| TestConfig::discover(chart))
            .unwrap_or_default(),
    }
}

/// List discovered test files per chart without running them.
fn list_discovered_tests(charts: &[PathBuf], config: &TestConfig) -> Result<()> {
    let plans = walker::walk(charts, config)?;

    println!();
    for plan in &plans {
        println!("{} ({})", plan.chart.name(), plan.chart.path.display());
        for file in &plan.test_files {
            println!("  {}", file.display());
        }
    }
    println!();
    Ok(())
}
