//! Form Layouts CLI
//!
//! Usage:
//!   form-layouts [OPTIONS] <MANIFEST> <PATH>
//!
//! Options:
//!   -r, --resource <NAME>    Resource to resolve against (default: routed by path)
//!   -q, --query <KEY=VALUE>  Query parameter, repeatable
//!   -p, --pretty             Pretty-print the response
//!   -v, --verbose            Log pipeline stages to stderr
//!   -h, --help               Print help

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use form_layouts::http::{handle, HttpResponse};
use form_layouts::{dispatch, load_registry, FormRequest};

#[derive(Parser)]
#[command(name = "form-layouts")]
#[command(about = "Resolve form layout metadata from a resource manifest")]
struct Cli {
    /// Resource manifest (TOML format)
    manifest: PathBuf,

    /// Request path, e.g. /cities/5/form/simple/
    path: String,

    /// Resource to resolve against instead of routing by path prefix
    #[arg(short, long)]
    resource: Option<String>,

    /// Query parameter as key=value
    #[arg(short, long = "query", value_parser = parse_key_value)]
    query: Vec<(String, String)>,

    /// Pretty-print the response
    #[arg(short, long)]
    pretty: bool,

    /// Log pipeline stages to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "form_layouts=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = match load_registry(&cli.manifest) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error loading manifest '{}': {}", cli.manifest.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let request = cli
        .query
        .into_iter()
        .fold(FormRequest::new(cli.path), |req, (key, value)| {
            req.with_query(key, value)
        });

    let response = match &cli.resource {
        Some(name) => match registry.resolve(name) {
            Ok(resource) => match handle(resource, &registry, &request) {
                Ok(form) => HttpResponse::ok(&form),
                Err(e) => HttpResponse::error(&e),
            },
            Err(e) => HttpResponse::error(&e),
        },
        None => dispatch(&registry, &request),
    };

    if !response.is_success() {
        let detail = response.body["detail"].as_str().unwrap_or_default();
        eprintln!("Error ({}): {}", response.status, detail);
        return ExitCode::FAILURE;
    }

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response.body)
    } else {
        serde_json::to_string(&response.body)
    };
    match output {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
