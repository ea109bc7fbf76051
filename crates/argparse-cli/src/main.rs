mod manifest;
mod report;

use anyhow::{Context, Result};
use argparse::Usage;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::manifest::{ArgSpec, resolve_spec_path, write_default_spec};
use crate::report::BindReport;

#[derive(Parser)]
#[command(name = "argparse")]
#[command(version, about = "Declare, bind and inspect command-line arguments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter argparse.json
    Init(InitArgs),

    /// Print the usage line for an argument spec
    Usage(UsageArgs),

    /// Bind tokens against an argument spec and print the result
    Bind(BindArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing argparse.json
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct UsageArgs {
    /// Path to the argument spec (default: ./argparse.json)
    #[arg(short, long, value_name = "FILE")]
    spec: Option<PathBuf>,

    /// Program name to show (overrides the spec)
    #[arg(long)]
    program: Option<String>,

    /// Wrap column
    #[arg(long, default_value_t = argparse::usage::DEFAULT_WIDTH)]
    width: usize,
}

#[derive(Parser)]
struct BindArgs {
    /// Path to the argument spec (default: ./argparse.json)
    #[arg(short, long, value_name = "FILE")]
    spec: Option<PathBuf>,

    /// Print the bound values as JSON
    #[arg(long)]
    json: bool,

    /// Tokens to bind, after `--`
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Usage(args) => usage(args),
        Commands::Bind(args) => bind(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let path = write_default_spec(&dir, args.force)?;
    eprintln!("Created: {}", path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit argparse.json to declare your arguments");
    eprintln!("  2. Run: argparse usage");
    eprintln!("  3. Run: argparse bind -- <TOKENS>");

    Ok(())
}

fn load_spec(spec: Option<PathBuf>) -> Result<ArgSpec> {
    let path = resolve_spec_path(spec.as_deref())?;
    tracing::debug!(path = %path.display(), "loading argument spec");
    ArgSpec::from_file(&path)
}

fn usage(args: UsageArgs) -> Result<()> {
    tracing::debug!("executing usage command");

    let spec = load_spec(args.spec)?;
    let mut parser = spec.build_parser()?;
    if let Some(program) = args.program {
        parser.app_name(program);
    }

    println!("{}", Usage::new(&parser).with_width(args.width));
    Ok(())
}

fn bind(args: BindArgs) -> Result<()> {
    tracing::debug!("executing bind command");

    let spec = load_spec(args.spec)?;
    let mut parser = spec.build_parser()?;

    if let Err(err) = parser.bind(&args.tokens) {
        eprintln!("{}", parser.usage());
        return Err(err).context("failed to bind arguments");
    }

    let report = BindReport::from_parser(&parser)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
