use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use optline_core::{OptionRegistry, SchemaDocument};
use tracing_subscriber::EnvFilter;

mod output;

use output::{ListingFormat, ParseReport, ReportFormat, format_listing, format_report};

#[derive(Debug, Parser)]
#[command(name = "optline")]
#[command(about = "Schema-driven command-line token parsing")]
#[command(version)]
struct Cli {
    /// Log parse steps to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens against a schema document and print the result.
    Parse(ParseArgs),
    /// Check a schema document for structural problems.
    Validate(ValidateArgs),
    /// List the options a schema document declares.
    Describe(DescribeArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema document (JSON if the extension is .json, YAML otherwise).
    #[arg(long)]
    schema: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: ReportFormat,
    /// Tokens to parse, given after `--`.
    #[arg(last = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema document to check.
    #[arg(long)]
    schema: PathBuf,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    /// Schema document to describe.
    #[arg(long)]
    schema: PathBuf,
    /// Listing format.
    #[arg(long, default_value = "table")]
    format: ListingFormat,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Validate(args) => run_validate(args),
        Command::Describe(args) => run_describe(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "optline=debug,optline_core=debug"
    } else {
        "optline=warn,optline_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_registry(path: &Path) -> Result<OptionRegistry, String> {
    let doc = SchemaDocument::load(path)
        .map_err(|err| format!("Failed to load schema '{}': {err}", path.display()))?;
    doc.into_registry()
        .map_err(|err| format!("Schema '{}' is not usable: {err}", path.display()))
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let mut registry = load_registry(&args.schema)?;
    tracing::debug!(tokens = args.tokens.len(), "parsing tokens");

    let summary = registry.parse(args.tokens).map_err(|err| err.to_string())?;
    let report = ParseReport::new(&registry, summary);
    println!("{}", format_report(&report, args.format)?);
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let registry = load_registry(&args.schema)?;
    println!(
        "Schema '{}' is valid ({} option(s)).",
        args.schema.display(),
        registry.len()
    );
    Ok(())
}

fn run_describe(args: DescribeArgs) -> Result<(), String> {
    let registry = load_registry(&args.schema)?;
    print!("{}", format_listing(&registry, args.format));
    Ok(())
}
