use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use optstream_core::{
    CommandLineStyle, OptionRegistry, ParseResult, PositionalDescription, validate_registry,
};
use optstream_parsers::output::{OutputFormat, format_result};
use optstream_parsers::{
    CommandLineParser, EnvironmentSnapshot, parse_config_file, parse_config_str,
    parse_environment_with_prefix,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "optstream")]
#[command(about = "Show how raw input is recognized against an option registry")]
struct Cli {
    /// Emit debug logs on stderr (overridden by RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a command line given after `--`.
    Args(ArgsArgs),
    /// Parse a config file (or stdin when no input is given).
    Config(ConfigArgs),
    /// Parse the current process environment.
    Env(EnvArgs),
    /// Validate a registry file.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ArgsArgs {
    /// Registry YAML/JSON file; without it every token is positional.
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Command-line style YAML file.
    #[arg(long)]
    style: Option<PathBuf>,
    /// Positional slot as NAME or NAME:COUNT (repeatable, in order).
    #[arg(long = "positional")]
    positional: Vec<String>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Arguments to parse.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    /// Registry YAML/JSON file.
    #[arg(long)]
    registry: PathBuf,
    /// Config file to parse.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct EnvArgs {
    /// Registry YAML/JSON file.
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Variable prefix to keep and strip (e.g. APP_).
    #[arg(long)]
    prefix: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Registry YAML/JSON file.
    registry: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Args(args) => run_args(args),
        Command::Config(args) => run_config(args),
        Command::Env(args) => run_env(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run_args(args: ArgsArgs) -> Result<(), String> {
    let registry = args.registry.as_deref().map(load_registry).transpose()?;
    let style = match &args.style {
        Some(path) => CommandLineStyle::load(path)
            .map_err(|err| format!("Failed to load style '{}': {err}", path.display()))?,
        None => CommandLineStyle::default(),
    };
    let positional = parse_positional_slots(&args.positional)?;

    let mut parser = CommandLineParser::new(args.args).style(style);
    if let Some(registry) = &registry {
        parser = parser.options(registry);
    }
    if let Some(positional) = &positional {
        parser = parser.positional(positional);
    }
    let result = parser.run().map_err(|err| err.to_string())?;
    print_result(&result, args.format)
}

fn run_config(args: ConfigArgs) -> Result<(), String> {
    let registry = load_registry(&args.registry)?;
    let result = match &args.input {
        Some(path) => {
            let file = fs::File::open(path)
                .map_err(|err| format!("Failed to open '{}': {err}", path.display()))?;
            parse_config_file(BufReader::new(file), &registry)
        }
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            parse_config_str(&text, &registry)
        }
    }
    .map_err(|err| err.to_string())?;
    print_result(&result, args.format)
}

fn run_env(args: EnvArgs) -> Result<(), String> {
    let registry = match &args.registry {
        Some(path) => load_registry(path)?,
        None => OptionRegistry::new(),
    };
    let env = EnvironmentSnapshot::from_process();
    debug!(entries = env.len(), prefix = %args.prefix, "Captured environment");
    let result = parse_environment_with_prefix(&registry, &env, &args.prefix);
    print_result(&result, args.format)
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let registry = load_registry(&args.registry)?;
    let errors = validate_registry(&registry);
    if errors.is_empty() {
        println!(
            "Registry '{}' declares {} valid option(s).",
            args.registry.display(),
            registry.len()
        );
        return Ok(());
    }
    for error in &errors {
        eprintln!("{}: {error}", args.registry.display());
    }
    Err(format!("{} validation error(s)", errors.len()))
}

fn load_registry(path: &Path) -> Result<OptionRegistry, String> {
    let registry = OptionRegistry::load(path)
        .map_err(|err| format!("Failed to load registry '{}': {err}", path.display()))?;
    let errors = validate_registry(&registry);
    if let Some(first) = errors.first() {
        return Err(format!("Invalid registry '{}': {first}", path.display()));
    }
    debug!(options = registry.len(), path = %path.display(), "Loaded registry");
    Ok(registry)
}

/// Parses `NAME` / `NAME:COUNT` slot arguments; none means unbounded.
fn parse_positional_slots(slots: &[String]) -> Result<Option<PositionalDescription>, String> {
    if slots.is_empty() {
        return Ok(None);
    }
    let mut positional = PositionalDescription::new();
    for slot in slots {
        match slot.split_once(':') {
            Some((name, count)) => {
                let count = count
                    .parse::<usize>()
                    .map_err(|err| format!("Invalid positional count in '{slot}': {err}"))?;
                positional.add(name, Some(count));
            }
            None => {
                positional.add(slot, None);
            }
        }
    }
    Ok(Some(positional))
}

fn print_result(result: &ParseResult<'_>, format: OutputFormat) -> Result<(), String> {
    let raw = format_result(result, format)?;
    print!("{raw}");
    if !raw.ends_with('\n') {
        println!();
    }
    Ok(())
}
