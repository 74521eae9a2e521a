//! CLI layer: argument parsing, command dispatch, and subcommand implementations.

pub mod args;

pub use args::*;

use std::path::Path;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use grpcnav::{candidates, derive_base_name, CallSite, Match, NotFound, Resolution, Resolver, SymbolIndex, Tier};

use crate::definitions::{self, DefinitionIndex};
use crate::error::NavError;

// ─── CLI ─────────────────────────────────────────────────────────────

/// Jump from a gRPC client stub call to its server-side implementation
#[derive(Parser, Debug)]
#[command(name = "grpcnav", version, about, after_help = "\
Run 'grpcnav <COMMAND> --help' for detailed options and examples.\n\
Common options: -d <DIR> (project root), --suffix-policy, --order, --json")]
pub(crate) struct Cli {
    /// Log level when RUST_LOG is not set: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Find the implementation of the gRPC call under a cursor position
    Goto(GotoArgs),

    /// Find the implementation of an explicit receiver.method pair
    Resolve(ResolveArgs),

    /// List the candidate classes considered for a receiver
    Candidates(CandidatesArgs),

    /// Build the definition index and report coverage statistics
    IndexStats(definitions::DefIndexArgs),
}

// ─── Main entry point ───────────────────────────────────────────────

pub fn run() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Goto(args) => cmd_goto(args),
        Commands::Resolve(args) => cmd_resolve(args),
        Commands::Candidates(args) => cmd_candidates(args),
        Commands::IndexStats(args) => cmd_index_stats(args),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

/// `RUST_LOG` wins; otherwise the `--log-level` flag.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(normalize_log_level(level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn normalize_log_level(level: &str) -> &'static str {
    match level.to_lowercase().as_str() {
        "error" => "error",
        "info" => "info",
        "debug" => "debug",
        "trace" => "trace",
        _ => "warn",
    }
}

// ─── Commands ───────────────────────────────────────────────────────

/// Returns whether an implementation was found.
fn cmd_goto(args: GotoArgs) -> Result<bool, NavError> {
    if args.line == 0 || args.col == 0 {
        return Err(NavError::InvalidArgs("--line and --col are 1-based and must be >= 1".to_string()));
    }
    let file = Path::new(&args.file);
    let Some(call) = definitions::find_call_site(file, args.line, args.col)? else {
        debug!(file = %args.file, line = args.line, col = args.col, "Cursor is not on a qualified call");
        let notice = format!("No gRPC client call at {}:{}:{}", args.file, args.line, args.col);
        print_not_found(&args.opts, None, &notice, None)?;
        return Ok(false);
    };

    let index = definitions::build_definition_index(&args.opts.def_index_args())?;
    resolve_and_print(&index, &call, &args.opts)
}

fn cmd_resolve(args: ResolveArgs) -> Result<bool, NavError> {
    let index = definitions::build_definition_index(&args.opts.def_index_args())?;
    let call = CallSite::new(&args.receiver, &args.method);
    resolve_and_print(&index, &call, &args.opts)
}

fn resolve_and_print(index: &DefinitionIndex, call: &CallSite, opts: &ResolveOpts) -> Result<bool, NavError> {
    let resolution = Resolver::new(index, opts.resolver_config()).resolve(call);
    match &resolution {
        Resolution::Found(m) => {
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&json!({ "call": call, "result": &resolution }))?);
            } else {
                println!("{}", format_match(m));
            }
            Ok(true)
        }
        Resolution::NotFound(reason) => {
            print_not_found(opts, Some(call), &reason.message(), Some(reason))?;
            Ok(false)
        }
    }
}

fn print_not_found(
    opts: &ResolveOpts,
    call: Option<&CallSite>,
    message: &str,
    reason: Option<&NotFound>,
) -> Result<(), NavError> {
    if opts.json {
        let value = json!({ "call": call, "result": { "status": "not_found", "message": message, "detail": reason } });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        eprintln!("{}", message);
    }
    Ok(())
}

/// `path:line:col  pkg.Class.method  [Tier]`
fn format_match(m: &Match) -> String {
    let location = m.method.location.as_ref()
        .or(m.class.location.as_ref())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "?".to_string());
    let mut line = format!("{}  {}.{}  [{}]", location, m.class.qualified_name, m.method.name, m.tier);
    if m.method.declaring_class != m.class.qualified_name {
        line.push_str(&format!("  (inherited from {})", m.method.declaring_class));
    }
    line
}

fn cmd_candidates(args: CandidatesArgs) -> Result<bool, NavError> {
    let config = args.opts.resolver_config();
    let Some(base_name) = derive_base_name(&args.receiver, config.suffix_policy) else {
        let reason = NotFound::MissingStubSuffix {
            receiver: args.receiver.trim().to_string(),
            method: args.method.clone().unwrap_or_default(),
        };
        eprintln!("Receiver '{}' has no Stub suffix (policy: {}). {}",
            args.receiver.trim(), config.suffix_policy, reason.message());
        return Ok(false);
    };

    let index = definitions::build_definition_index(&args.opts.def_index_args())?;
    let found = candidates(&index, &base_name, &config);

    let rows: Vec<_> = found.iter()
        .map(|c| {
            let tier = Tier::of(&c.name);
            let declares = args.method.as_deref()
                .map(|m| !index.find_methods_by_name(c, m, true).is_empty());
            (c, tier, declares)
        })
        .collect();

    if args.opts.json {
        let items: Vec<_> = rows.iter()
            .map(|(c, tier, declares)| json!({
                "class": c,
                "tier": tier,
                "declaresMethod": declares,
            }))
            .collect();
        let value = json!({ "receiver": args.receiver, "baseName": base_name, "candidates": items });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        eprintln!("{} candidate(s) for base name '{}'", rows.len(), base_name);
        for (c, tier, declares) in &rows {
            let tier = tier.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string());
            let location = c.location.as_ref().map(|l| l.to_string()).unwrap_or_default();
            let declares = match declares {
                Some(true) => "  declares method",
                Some(false) => "  lacks method",
                None => "",
            };
            println!("{:<12} {}  {}{}", tier, c.qualified_name, location, declares);
        }
    }
    Ok(!rows.is_empty())
}

fn cmd_index_stats(args: definitions::DefIndexArgs) -> Result<bool, NavError> {
    let index = definitions::build_definition_index(&args)?;
    let tiered = index.all_class_names().iter().filter(|n| Tier::of(n).is_some()).count();

    eprintln!("[index-stats] Root: {} (extensions: {})", index.root, index.extensions.join(", "));
    eprintln!("[index-stats] {} files, {} with definitions, {} without, {} read errors, {} lossy-UTF8",
        index.files.len(), index.file_index.len(), index.empty_file_ids.len(),
        index.parse_errors, index.lossy_file_count);
    eprintln!("[index-stats] {} definitions: {}; {} GrpcService/ImplBase type names",
        index.definitions.len(), format_kind_counts(&index), tiered);
    Ok(true)
}

/// `3 class, 1 interface, 12 method`
fn format_kind_counts(index: &DefinitionIndex) -> String {
    let counts = index.kind_counts();
    if counts.is_empty() {
        return "none".to_string();
    }
    counts.iter()
        .map(|(kind, n)| format!("{} {}", n, kind))
        .collect::<Vec<_>>()
        .join(", ")
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
