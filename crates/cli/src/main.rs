mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Convenant template resolution toolchain.
#[derive(Parser)]
#[command(
    name = "convenant",
    version,
    about = "Convenant template resolution toolchain"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Engine config file (default: ./convenant.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand loop blocks in a template against case data
    Expand {
        /// Path to the template text file
        template: PathBuf,
        /// Path to the case data JSON file
        #[arg(long)]
        case: PathBuf,
        /// Evaluation date for ages (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },

    /// Expand loops and resolve document placeholders
    Render {
        /// Path to the template text file
        template: PathBuf,
        /// Path to the case data JSON file
        #[arg(long)]
        case: PathBuf,
        /// Evaluation date for ages (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
        /// Nested placeholder passes
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Evaluate a conditional rule set against a context
    Evaluate {
        /// Path to the rule set JSON file
        rules: PathBuf,
        /// Path to the evaluation context JSON file
        #[arg(long)]
        context: PathBuf,
        /// Replacement map JSON used to resolve the selected result
        #[arg(long)]
        replacements: Option<PathBuf>,
        /// Nested placeholder passes
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Resolve placeholders in a text file
    Resolve {
        /// Path to the text file
        file: PathBuf,
        /// Path to the replacement map JSON file
        #[arg(long)]
        replacements: PathBuf,
        /// Nested placeholder passes
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// List the known loop collections
    Collections,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&format!("error: {}", e), cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Expand {
            template,
            case,
            today,
        } => {
            let options = resolve_options(&config, today.as_deref(), None, cli.output, cli.quiet);
            commands::expand::cmd_expand(&template, &case, &options, cli.output, cli.quiet);
        }
        Commands::Render {
            template,
            case,
            today,
            max_depth,
        } => {
            let options =
                resolve_options(&config, today.as_deref(), max_depth, cli.output, cli.quiet);
            commands::render::cmd_render(&template, &case, &options, cli.output, cli.quiet);
        }
        Commands::Evaluate {
            rules,
            context,
            replacements,
            max_depth,
        } => {
            let options = resolve_options(&config, None, max_depth, cli.output, cli.quiet);
            commands::evaluate::cmd_evaluate(
                &rules,
                &context,
                replacements.as_deref(),
                &options,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Resolve {
            file,
            replacements,
            max_depth,
        } => {
            let options = resolve_options(&config, None, max_depth, cli.output, cli.quiet);
            commands::resolve::cmd_resolve(&file, &replacements, &options, cli.output, cli.quiet);
        }
        Commands::Collections => {
            commands::collections::cmd_collections(cli.output, cli.quiet);
        }
    }
}

fn resolve_options(
    config: &config::Config,
    today: Option<&str>,
    max_depth: Option<usize>,
    output: OutputFormat,
    quiet: bool,
) -> convenant_eval::EngineOptions {
    match config::engine_options(config, today, max_depth) {
        Ok(options) => options,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
