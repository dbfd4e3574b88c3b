//! restbridge CLI
//!
//! Command-line interface for turning a Swagger description into provider
//! artifacts and SDKs, and for driving single lifecycle requests against the
//! live API.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use restbridge_common::GeneratorConfig;
use restbridge_generator::ProviderGenerator;
use restbridge_parser::{build_schema, AssembledSchema};
use restbridge_provider::{
    map_from_json, map_to_redacted_json, PropertyMap, ReqwestTransport, ResourceProvider,
    RestProvider, TransportConfig,
};
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "restbridge")]
#[command(version, about = "Generate CRUD resource providers from Swagger descriptions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a Swagger description and display the discovered resources
    #[command(after_help = "EXAMPLES:\n  \
        # Use restbridge.yaml from the current directory\n  \
        restbridge parse\n\n  \
        # Override the description source\n  \
        restbridge parse --spec https://todo-backend.example.com/swagger.json")]
    Parse {
        /// Configuration file (defaults to ./restbridge.yaml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Swagger description file or http(s) URL
        #[arg(short, long)]
        spec: Option<String>,
    },

    /// Generate schema artifacts and SDK sources
    #[command(after_help = "EXAMPLES:\n  \
        # Generate version 0.1.0 into ./out\n  \
        restbridge generate ./out 0.1.0\n\n  \
        # Use a specific config and description\n  \
        restbridge generate ./out 0.1.0 \\\n    \
        --config ./restbridge.yaml \\\n    \
        --spec ./open-api-spec/todo-backend.json")]
    Generate {
        /// Output directory
        output: PathBuf,

        /// Version stamped into the schema and SDKs
        version: String,

        /// Configuration file (defaults to ./restbridge.yaml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Swagger description file or http(s) URL
        #[arg(short, long)]
        spec: Option<String>,
    },

    /// Run a single lifecycle operation against the live API
    #[command(after_help = "EXAMPLES:\n  \
        # Create a todo\n  \
        restbridge invoke create \\\n    \
        --artifacts ./out/provider \\\n    \
        --urn urn:pulumi:dev::todo::xyz:index:Todo::milk \\\n    \
        --properties '{\"title\":\"buy milk\"}'\n\n  \
        # Read it back\n  \
        restbridge invoke read \\\n    \
        --artifacts ./out/provider \\\n    \
        --urn urn:pulumi:dev::todo::xyz:index:Todo::milk \\\n    \
        --id /todos/1")]
    Invoke {
        /// Lifecycle operation
        operation: Operation,

        /// Directory containing schema.json and metadata.json
        #[arg(short, long, default_value = "./output/provider")]
        artifacts: PathBuf,

        /// Resource URN
        #[arg(short, long)]
        urn: String,

        /// Resource identity returned by create (read, update, delete)
        #[arg(long)]
        id: Option<String>,

        /// New properties as a JSON object (check, create, update)
        #[arg(short, long)]
        properties: Option<String>,

        /// Prior properties as a JSON object (read, update, delete)
        #[arg(long)]
        olds: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        /// Retries for idempotent requests
        #[arg(long, default_value_t = 3)]
        retries: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Operation {
    Check,
    Create,
    Read,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Check => write!(f, "check"),
            Operation::Create => write!(f, "create"),
            Operation::Read => write!(f, "read"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        restbridge_provider::init_logging_with_default("debug");
        eprintln!("{} Verbose mode enabled", "→".cyan());
    } else {
        restbridge_provider::init_logging();
    }

    match cli.command {
        Commands::Parse { config, spec } => {
            parse_command(config.as_deref(), spec, cli.verbose)?;
        }

        Commands::Generate {
            output,
            version,
            config,
            spec,
        } => {
            generate_command(
                output.as_path(),
                &version,
                config.as_deref(),
                spec,
                cli.verbose,
            )?;
        }

        Commands::Invoke {
            operation,
            artifacts,
            urn,
            id,
            properties,
            olds,
            timeout,
            retries,
        } => {
            let transport = TransportConfig {
                timeout_secs: timeout,
                max_retries: retries,
                ..TransportConfig::default()
            };
            invoke_command(InvokeArgs {
                operation,
                artifacts: artifacts.as_path(),
                urn: &urn,
                id: id.as_deref(),
                properties: properties.as_deref(),
                olds: olds.as_deref(),
                transport: &transport,
            })?;
        }
    }

    Ok(())
}

/// Load configuration, letting `--spec` override the configured source
fn load_config(config: Option<&Path>, spec: Option<String>) -> Result<GeneratorConfig> {
    let mut config = GeneratorConfig::load_or_default(config).context("Failed to load config")?;
    if let Some(spec) = spec {
        config.spec = spec;
    }
    Ok(config)
}

fn assemble(config: &GeneratorConfig, version: &str) -> Result<AssembledSchema> {
    println!("{} Loading description: {}", "→".cyan(), config.spec);
    build_schema(config, version)
        .with_context(|| format!("Failed to build schema from {}", config.spec))
}

fn print_diagnostics(assembled: &AssembledSchema) {
    if assembled.diagnostics.is_empty() {
        return;
    }
    println!("\n{}", "Skipped:".bold());
    for diagnostic in &assembled.diagnostics {
        println!("  {} {}", "!".yellow(), diagnostic);
    }
}

fn parse_command(config: Option<&Path>, spec: Option<String>, verbose: bool) -> Result<()> {
    let config = load_config(config, spec)?;
    let assembled = assemble(&config, "")?;

    if verbose {
        println!("  Package: {}", config.package);
        println!("  Separator: {:?}", config.operation_id_separator);
    }

    println!("\n{}", "✓ Parse successful!".green().bold());
    println!("  Base URL: {}", assembled.metadata.base_url.yellow());
    println!("  Resources: {}", assembled.schema.resources.len());

    for (token, resource) in &assembled.schema.resources {
        let path = assembled.metadata.creation_path(token).unwrap_or("?");
        println!("  • {} ({})", token.cyan(), path);
        if verbose {
            println!(
                "    Inputs: {}",
                resource
                    .input_properties
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!("    Required: {}", resource.required_inputs.join(", "));
            println!("    Outputs: {}", resource.properties.len());
        }
    }

    print_diagnostics(&assembled);
    Ok(())
}

fn generate_command(
    output: &Path,
    version: &str,
    config: Option<&Path>,
    spec: Option<String>,
    verbose: bool,
) -> Result<()> {
    let config = load_config(config, spec)?;

    if verbose {
        println!("  Package: {}", config.package);
        println!("  Version: {}", version);
        println!("  Languages: {}", config.languages.join(", "));
        println!("  Output: {}", output.display());
    }

    let assembled = assemble(&config, version)?;
    println!(
        "{} Inferred {} resources",
        "✓".green(),
        assembled.schema.resources.len()
    );
    print_diagnostics(&assembled);

    println!("{} Generating provider files...", "→".cyan());
    let written = ProviderGenerator::new(assembled.schema, assembled.metadata)
        .context("Failed to create generator")?
        .with_languages(config.languages.iter().cloned())
        .generate_to_directory(output)
        .context("Failed to generate provider")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("\n{}", "Generated files:".bold());
    for path in &written {
        println!("  📄 {}", path.display());
    }
    println!("\n{}", "Next steps:".bold());
    println!(
        "  1. Embed {}/provider/schema.rs and metadata.rs in your provider build",
        output.display()
    );
    println!("  2. Publish the SDKs under {}/sdk", output.display());

    Ok(())
}

struct InvokeArgs<'a> {
    operation: Operation,
    artifacts: &'a Path,
    urn: &'a str,
    id: Option<&'a str>,
    properties: Option<&'a str>,
    olds: Option<&'a str>,
    transport: &'a TransportConfig,
}

fn invoke_command(args: InvokeArgs) -> Result<()> {
    eprintln!(
        "{} {} {} using {}",
        "→".cyan(),
        args.operation.to_string().yellow(),
        args.urn,
        args.artifacts.display()
    );

    let transport = ReqwestTransport::new(args.transport).context("Failed to build HTTP client")?;
    let provider = RestProvider::from_artifact_dir(args.artifacts, transport)
        .context("Failed to load provider artifacts")?;

    let news = parse_properties(args.properties).context("Invalid --properties")?;
    let olds = parse_properties(args.olds).context("Invalid --olds")?;
    let require_id = || {
        args.id
            .with_context(|| format!("--id is required for {}", args.operation))
    };

    let result = match args.operation {
        Operation::Check => {
            let checked = provider.check(args.urn, olds, news)?;
            json!({
                "inputs": map_to_redacted_json(&checked.inputs),
                "failures": checked
                    .failures
                    .iter()
                    .map(|f| json!({"property": f.property, "reason": f.reason}))
                    .collect::<Vec<_>>(),
            })
        }
        Operation::Create => {
            let created = provider.create(args.urn, news)?;
            json!({"id": created.id, "properties": map_to_redacted_json(&created.properties)})
        }
        Operation::Read => {
            let id = require_id()?;
            let state = provider.read(id, args.urn, olds)?;
            json!({"id": state.id, "properties": map_to_redacted_json(&state.properties)})
        }
        Operation::Update => {
            let id = require_id()?;
            let updated = provider.update(id, args.urn, olds, news)?;
            json!({"id": id, "properties": map_to_redacted_json(&updated.properties)})
        }
        Operation::Delete => {
            let id = require_id()?;
            provider.delete(id, args.urn, olds)?;
            json!({"id": id, "deleted": true})
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    eprintln!("{} {} succeeded", "✓".green(), args.operation);
    Ok(())
}

/// Parse an optional JSON object argument into a property map
fn parse_properties(raw: Option<&str>) -> Result<PropertyMap> {
    let Some(raw) = raw else {
        return Ok(PropertyMap::new());
    };
    let value: serde_json::Value = serde_json::from_str(raw).context("Not valid JSON")?;
    match map_from_json(value) {
        Some(map) => Ok(map),
        None => bail!("Expected a JSON object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use restbridge_provider::PropertyValue;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::try_parse_from([
            "restbridge",
            "generate",
            "./out",
            "0.1.0",
            "--spec",
            "api.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                output,
                version,
                config,
                spec,
            } => {
                assert_eq!(output, PathBuf::from("./out"));
                assert_eq!(version, "0.1.0");
                assert!(config.is_none());
                assert_eq!(spec.as_deref(), Some("api.json"));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_generate_requires_version() {
        assert!(Cli::try_parse_from(["restbridge", "generate", "./out"]).is_err());
    }

    #[test]
    fn test_parse_properties() {
        let map = parse_properties(Some(r#"{"title":"buy milk","order":2}"#)).unwrap();
        assert_eq!(map["title"], PropertyValue::from("buy milk"));
        assert_eq!(map["order"], PropertyValue::from(2_i64));

        assert!(parse_properties(None).unwrap().is_empty());
        assert!(parse_properties(Some("[1, 2]")).is_err());
        assert!(parse_properties(Some("{not json")).is_err());
    }

    #[test]
    fn test_spec_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restbridge.yaml");
        std::fs::write(&path, "package: acme\nspec: from-config.json\n").unwrap();

        let config = load_config(Some(&path), Some("override.json".to_string())).unwrap();
        assert_eq!(config.package, "acme");
        assert_eq!(config.spec, "override.json");
    }
}
