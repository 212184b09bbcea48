// src/bin/jslice.rs
use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use jslice::clipboard;
use jslice::config::Config;
use jslice::pipeline;

#[derive(Parser)]
#[command(name = "jslice")]
#[command(version)]
#[command(about = "Slices a Java codebase down to what one entry class actually uses")]
struct Cli {
    /// Fully qualified entry class (overrides jslice.toml)
    entry_class: Option<String>,

    /// Project root to analyze
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Maximum dependency depth (negative = unbounded)
    #[arg(long)]
    max_depth: Option<i32>,

    /// Depth past which method bodies are stubbed (negative = never)
    #[arg(long)]
    body_depth: Option<i32>,

    /// Keep trivial getters and setters
    #[arg(long)]
    keep_accessors: bool,

    /// Keep methods unreachable from the entry class
    #[arg(long)]
    keep_unreachable: bool,

    /// Do not list removed method signatures in the report
    #[arg(long)]
    no_show_removed: bool,

    /// Report output path
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Copy the report to the system clipboard
    #[arg(long)]
    copy: bool,

    /// Print the full report to stdout regardless of size
    #[arg(long)]
    stdout: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", "error:".red().bold());
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(&cli.root).context("loading configuration")?;
    apply_overrides(&mut config, &cli);
    config.validate().context("invalid configuration")?;

    println!(
        "🔍 Slicing {} from {}",
        config.entry_class.cyan(),
        config.project_root.display()
    );

    let report = pipeline::run(&config).context("analysis failed")?;
    let text = report.render();

    fs::write(&config.output, &text)
        .with_context(|| format!("writing {}", config.output.display()))?;
    println!(
        "{} {} classes -> {}",
        "✅".green(),
        report.sections.len(),
        config.output.display()
    );

    if cli.stdout || text.len() < config.echo_threshold {
        println!("\n{text}");
        if config.copy {
            match clipboard::copy_to_clipboard(&text) {
                Ok(()) => println!("{}", "📋 Copied to clipboard".green()),
                Err(e) => eprintln!("{} clipboard copy failed: {e}", "warning:".yellow()),
            }
        }
    } else {
        println!("\n{}", report.render_summary());
        println!(
            "Report is {} bytes; see {}",
            text.len(),
            config.output.display()
        );
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(entry) = &cli.entry_class {
        config.entry_class = entry.clone();
    }
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }
    if let Some(depth) = cli.body_depth {
        config.body_depth = depth;
    }
    if cli.keep_accessors {
        config.omit_accessors = false;
    }
    if cli.keep_unreachable {
        config.remove_unreachable = false;
    }
    if cli.no_show_removed {
        config.show_removed = false;
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if cli.copy {
        config.copy = true;
    }
}
