use anyhow::{Context, Result};
use ast_session::analysis::{self, ClassFilter, FunctionFilter, ImportFilter};
use ast_session::config;
use ast_session::server::{rpc, tool_definitions, Dispatcher};
use ast_session::Session;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ast-session")]
#[command(about = "Structural code parsing, querying and rewriting session over stdio", long_about = None)]
#[command(version)]
struct Cli {
    /// Server config file (falls back to $AST_SESSION_CONFIG, then defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve JSON-RPC (MCP) requests on stdin/stdout
    Serve,

    /// Print the tool schemas as JSON
    Tools,

    /// Load a file once and print its summary and analysis facets
    Inspect {
        /// File to load
        path: PathBuf,

        /// Language override (javascript, typescript, tsx, python, rust, ...)
        #[arg(short, long)]
        language: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides; stdout is reserved for protocol output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "ast_session=debug"
        } else {
            "ast_session=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = config::resolve(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let dispatcher = Dispatcher::new(config);
            let stdin = io::stdin();
            rpc::serve(&dispatcher, stdin.lock(), io::stdout()).context("stdio transport failed")
        }
        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(&tool_definitions())?);
            Ok(())
        }
        Commands::Inspect { path, language } => cmd_inspect(&config, path, language),
    }
}

fn cmd_inspect(
    config: &config::ServerConfig,
    path: PathBuf,
    language: Option<String>,
) -> Result<()> {
    let mut session = Session::new(config);
    let source = path.to_string_lossy();
    let summary = session
        .load(&source, Some(true), language.as_deref())
        .with_context(|| format!("failed to load {}", path.display()))?;

    let functions = analysis::get_functions(
        &mut session,
        FunctionFilter {
            include_anonymous: true,
            async_only: false,
        },
    )?;
    let classes = analysis::get_classes(
        &mut session,
        ClassFilter {
            include_methods: true,
            include_properties: true,
        },
    )?;
    let imports = analysis::get_imports(&mut session, ImportFilter::default())?;

    let report = json!({
        "document": summary,
        "functions": functions,
        "classes": classes,
        "imports": imports,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
