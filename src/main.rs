//! unit-config CLI
//!
//! Entry point for the `unit-config` command-line tool.

use clap::{ArgAction, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use unit_config::loader::{load_adapter, load_project};
use unit_config::{Adapter, ConfigMap, ConfigResolver, FieldPolicy, Fqn, NodeType};

#[derive(Parser)]
#[command(name = "unit-config")]
#[command(about = "Resolve the effective configuration of a model, seed, snapshot or test", version)]
struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace; default honours RUST_LOG)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one unit's effective configuration
    Resolve {
        /// Project being built (TOML or JSON)
        #[arg(long, short = 'p')]
        project: PathBuf,

        /// Project declaring the unit, when it is a dependency
        #[arg(long)]
        own_project: Option<PathBuf>,

        /// Dotted FQN of the unit, e.g. my_project.staging.orders
        #[arg(long)]
        fqn: Fqn,

        /// Unit kind: model, seed, snapshot or test
        #[arg(long, short = 't', default_value = "model")]
        node_type: NodeType,

        /// Built-in adapter name or path to an adapter descriptor file
        #[arg(long, short = 'a', default_value = "default")]
        adapter: String,

        /// Inline declaration as a JSON object; repeat for several blocks
        #[arg(long = "set", value_name = "JSON")]
        set: Vec<String>,

        /// Print only the merged mapping, without provenance
        #[arg(long)]
        config_only: bool,
    },

    /// List recognized configuration fields and how they merge
    Fields {
        /// Built-in adapter name or path to an adapter descriptor file
        #[arg(long, short = 'a', default_value = "default")]
        adapter: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Resolve {
            project,
            own_project,
            fqn,
            node_type,
            adapter,
            set,
            config_only,
        } => {
            run_resolve(project, own_project, fqn, node_type, &adapter, &set, config_only);
        }
        Commands::Fields { adapter, json } => {
            run_fields(&adapter, json);
        }
    }
}

/// Install the stderr subscriber.
///
/// - 0 (default): RUST_LOG, falling back to warn
/// - 1 (-v): info
/// - 2 (-vv): debug
/// - 3+ (-vvv): trace
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn run_resolve(
    project_path: PathBuf,
    own_project_path: Option<PathBuf>,
    fqn: Fqn,
    node_type: NodeType,
    adapter_arg: &str,
    set: &[String],
    config_only: bool,
) {
    let active = load_or_exit(load_project(&project_path), "project");
    let own = match own_project_path {
        Some(path) => load_or_exit(load_project(&path), "owning project"),
        None => active.clone(),
    };
    let adapter = load_or_exit(load_adapter(adapter_arg), "adapter");

    let mut resolver = ConfigResolver::new(&active, &own, &adapter, fqn, node_type);
    for (index, raw) in set.iter().enumerate() {
        let overrides = match parse_override(raw) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Invalid --set #{}: {}", index + 1, e);
                process::exit(2);
            }
        };
        debug!(index, keys = ?overrides.keys().collect::<Vec<_>>(), "applying inline declaration");
        if let Err(e) = resolver.update(overrides) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    let output = if config_only {
        resolver
            .resolve()
            .map_err(|e| e.to_string())
            .and_then(|config| serde_json::to_string_pretty(&config).map_err(|e| e.to_string()))
    } else {
        resolver
            .report()
            .map_err(|e| e.to_string())
            .and_then(|report| report.to_json().map_err(|e| e.to_string()))
    };

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_fields(adapter_arg: &str, json: bool) {
    let adapter = load_or_exit(load_adapter(adapter_arg), "adapter");
    let policy = FieldPolicy::new(adapter.specific_configs());
    let fields = policy.fields();

    if json {
        let listing: ConfigMap = fields
            .iter()
            .map(|(name, kind)| (name.to_string(), Value::String(kind.to_string())))
            .collect();
        match serde_json::to_string_pretty(&listing) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("Adapter: {}", adapter.name);
        println!();
        for (name, kind) in fields {
            println!("  {:<22} {}", name, kind);
        }
    }
}

fn parse_override(raw: &str) -> Result<ConfigMap, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("expected a JSON object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn load_or_exit<T, E: std::fmt::Display>(result: Result<T, E>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error loading {}: {}", what, e);
            process::exit(1);
        }
    }
}
