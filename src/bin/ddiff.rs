//! ddiff - Detailed diff CLI tool
//!
//! Translates the detailed diff of a resource step into a nested object
//! diff, and inspects property paths.

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::{info, Level};

use detailed_diff::{parse_diff_path, translate_detailed_diff, PathElement, StepEventMetadata};

#[derive(Debug, Parser)]
#[command(name = "ddiff", version, about = "Detailed diff CLI tool")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Translate a step's detailed diff into a nested object diff
    Translate {
        /// Step document (JSON or YAML). Use '-' for stdin
        step: String,

        /// Output location. Use '-' for stdout
        #[arg(short, long, default_value = "-")]
        output: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Parse property paths and print their elements
    ParsePath {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Translate {
            step,
            output,
            format,
        } => {
            let mut out = open_output(&output)?;
            translate(&step, format, &mut out)
        }
        Command::ParsePath { paths } => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            parse_paths(&paths, &mut out)
        }
    }
}

fn open_output(output: &str) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
    if output == "-" {
        return Ok(Box::new(io::stdout()));
    }
    let file = fs::File::create(output)
        .map_err(|e| format!("Failed to create output file {:?}: {}", output, e))?;
    Ok(Box::new(file))
}

fn read_input(source: &str) -> Result<String, Box<dyn std::error::Error>> {
    if source == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        return Ok(content);
    }
    let content = fs::read_to_string(source)
        .map_err(|e| format!("Failed to read step file {:?}: {}", source, e))?;
    Ok(content)
}

fn translate(
    source: &str,
    format: Format,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = read_input(source)?;

    // YAML is a superset of JSON, so one parser reads both.
    let step: StepEventMetadata = serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse step: {}", e))?;

    let records = step.detailed_diff.as_ref().map_or(0, |dd| dd.len());
    info!(source, records, "translating detailed diff");

    let diff = translate_detailed_diff(&step)?;

    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&diff)
                .map_err(|e| format!("Failed to serialize result: {}", e))?;
            writeln!(output, "{}", json)?;
        }
        Format::Yaml => {
            let yaml = serde_yaml::to_string(&diff)
                .map_err(|e| format!("Failed to serialize result: {}", e))?;
            write!(output, "{}", yaml)?;
        }
    }

    Ok(())
}

fn parse_paths(paths: &[String], output: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    for raw in paths {
        let path = parse_diff_path(raw)
            .map_err(|e| format!("Failed to parse path {:?}: {}", raw, e))?;

        writeln!(output, "{}", path)?;
        for element in &path {
            match element {
                PathElement::Index(i) => writeln!(output, "  index {}", i)?,
                PathElement::Key(k) => writeln!(output, "  key   {:?}", k)?,
            }
        }
    }
    Ok(())
}
