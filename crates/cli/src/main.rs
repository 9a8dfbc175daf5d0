//! PVE OpenAPI Generator CLI
//!
//! Command-line interface for generating an OpenAPI document from the
//! Proxmox VE API schema tree.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use pve_openapi_generator_common::{ApiNode, EnvelopeMode, GeneratorConfig, OverrideTable};
use pve_openapi_generator_generator::{
    derive_operation_id, DocumentBuilder, DocumentWriter, OutputFormat,
};
use pve_openapi_generator_parser::SourceParser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pve-openapi-generator")]
#[command(version, about = "Generate an OpenAPI 3.0 document from the Proxmox VE API schema tree", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the OpenAPI document
    #[command(after_help = "EXAMPLES:\n  \
        # Flat responses, YAML output\n  \
        pve-openapi-generator generate --source apidata.json --output openapi.yaml\n\n  \
        # Enveloped responses with operation-id overrides\n  \
        pve-openapi-generator generate \\\n    \
        --source apidata.json \\\n    \
        --overrides operation-ids.yaml \\\n    \
        --envelope enveloped \\\n    \
        --output openapi.json\n\n  \
        # Start from a config file and point at a different cluster\n  \
        pve-openapi-generator generate \\\n    \
        --source apidata.json \\\n    \
        --config generator.yaml \\\n    \
        --server-url https://pve.example.com:8006/api2/json")]
    Generate {
        /// Path to the schema tree export (JSON or YAML)
        #[arg(short, long)]
        source: PathBuf,

        /// Operation-id override table (JSON or YAML)
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Generator config file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file
        #[arg(short, long, default_value = "openapi.yaml")]
        output: PathBuf,

        /// Output format (inferred from the output extension if not specified)
        #[arg(short, long)]
        format: Option<Format>,

        /// Response emission mode (overrides the config file)
        #[arg(long)]
        envelope: Option<Envelope>,

        /// Number of numbered siblings an indexed property expands to
        #[arg(long)]
        bound: Option<u32>,

        /// Emit residual parameters of GET and DELETE as query parameters
        #[arg(long)]
        include_query_params: bool,

        /// Server URL written into the document
        #[arg(long)]
        server_url: Option<String>,
    },

    /// Parse the schema tree and print a summary without generating
    #[command(after_help = "EXAMPLES:\n  \
        pve-openapi-generator inspect --source apidata.json\n  \
        pve-openapi-generator inspect --source apidata.yaml --verbose")]
    Inspect {
        /// Path to the schema tree export (JSON or YAML)
        #[arg(short, long)]
        source: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => OutputFormat::Yaml,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Envelope {
    /// Response schema is the translated payload
    Flat,
    /// Payload under `data` next to an `errors` list
    Enveloped,
}

impl From<Envelope> for EnvelopeMode {
    fn from(envelope: Envelope) -> Self {
        match envelope {
            Envelope::Flat => EnvelopeMode::Flat,
            Envelope::Enveloped => EnvelopeMode::Enveloped,
        }
    }
}

/// Options of the `generate` subcommand
struct GenerateArgs {
    source: PathBuf,
    overrides: Option<PathBuf>,
    config: Option<PathBuf>,
    output: PathBuf,
    format: Option<Format>,
    envelope: Option<Envelope>,
    bound: Option<u32>,
    include_query_params: bool,
    server_url: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        println!("{} Verbose mode enabled", "→".cyan());
    }

    match cli.command {
        Commands::Generate {
            source,
            overrides,
            config,
            output,
            format,
            envelope,
            bound,
            include_query_params,
            server_url,
        } => {
            generate_command(
                GenerateArgs {
                    source,
                    overrides,
                    config,
                    output,
                    format,
                    envelope,
                    bound,
                    include_query_params,
                    server_url,
                },
                cli.verbose,
            )?;
        }
        Commands::Inspect { source } => {
            inspect_command(&source, cli.verbose)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_tree(source: &Path) -> Result<Vec<ApiNode>> {
    println!("{} Parsing schema tree: {}", "→".cyan(), source.display());

    let parser = SourceParser::from_file(source).context("Failed to load schema tree")?;
    let nodes = parser.parse().context("Failed to parse schema tree")?;

    println!("{} Parsed {} top-level nodes", "✓".green(), nodes.len());
    Ok(nodes)
}

fn build_config(args: &GenerateArgs) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            println!("{} Loading config: {}", "→".cyan(), path.display());
            GeneratorConfig::load(path).context("Failed to load generator config")?
        }
        None => GeneratorConfig::default(),
    };

    if let Some(envelope) = args.envelope {
        config.envelope_mode = envelope.into();
    }
    if let Some(bound) = args.bound {
        config.indexed_array_bound = bound;
    }
    if args.include_query_params {
        config.include_query_params = true;
    }
    if let Some(url) = &args.server_url {
        config.server.url = url.clone();
    }

    Ok(config)
}

fn generate_command(args: GenerateArgs, verbose: bool) -> Result<()> {
    let config = build_config(&args)?;
    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or_else(|| OutputFormat::from_path(&args.output));

    if verbose {
        println!("  Envelope: {:?}", config.envelope_mode);
        println!("  Indexed bound: {}", config.indexed_array_bound);
        println!("  Query params: {}", config.include_query_params);
        println!("  Server: {}", config.server.url);
        println!("  Output: {} ({:?})", args.output.display(), format);
    }

    let nodes = load_tree(&args.source)?;

    let mut builder = DocumentBuilder::new(config);
    if let Some(path) = &args.overrides {
        let table = OverrideTable::from_file(path).context("Failed to load override table")?;
        println!(
            "{} Loaded {} operation-id overrides",
            "✓".green(),
            table.len()
        );
        builder = builder.with_overrides(table);
    }

    println!("{} Generating document...", "→".cyan());
    let document = builder.build(&nodes);
    DocumentWriter::write(&document, &args.output, format)
        .context("Failed to write OpenAPI document")?;

    let stats = document.stats();
    if stats.operations == 0 {
        println!(
            "{} No operations found in {}",
            "⚠".yellow(),
            args.source.display()
        );
    }

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("\n{}", "Document:".bold());
    println!("  Paths: {}", stats.paths);
    println!("  Operations: {}", stats.operations);
    println!("  Tags: {}", stats.tags);
    println!("  Request schemas: {}", stats.request_schemas);
    println!("  Responses: {}", stats.responses);
    println!("\n  📄 {}", args.output.display());

    Ok(())
}

fn inspect_command(source: &Path, verbose: bool) -> Result<()> {
    let nodes = load_tree(source)?;

    let mut operations = Vec::new();
    collect_operations(&nodes, &mut operations);

    let mut routes: Vec<&str> = operations.iter().map(|(_, route)| route.as_str()).collect();
    routes.dedup();

    println!("\n{}", "Schema tree:".bold());
    println!("  Routes with methods: {}", routes.len());
    println!("  Operations: {}", operations.len());

    if verbose {
        println!("\n{}", "Operations:".bold());
        for (method, route) in &operations {
            println!(
                "  • {} {} {}",
                method.to_uppercase().yellow(),
                route,
                derive_operation_id(method, route).cyan()
            );
        }
    }

    Ok(())
}

/// Pre-order list of (lower-case method, route) pairs
fn collect_operations(nodes: &[ApiNode], operations: &mut Vec<(String, String)>) {
    for node in nodes {
        for method in node.methods.keys() {
            operations.push((method.to_lowercase(), node.path.clone()));
        }
        collect_operations(&node.children, operations);
    }
}
