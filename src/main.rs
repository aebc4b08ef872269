use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codex_docgen::ProviderKind;
use codex_docgen::cli::commands::{
    analyze, batch::BatchOptions, config, docgen::DocgenOptions, docgen::UnitSelection,
    readme::ReadmeOptions,
};
use codex_docgen::cli::{CommandContext, Output};

#[derive(Parser)]
#[command(name = "codex-docgen")]
#[command(version, about = "AI-powered code documentation generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate docstrings for all functions and classes in a Python file
    Docgen {
        #[arg(help = "Path to the Python file to process")]
        file: PathBuf,
        #[arg(long, short, help = "Write source plus generated documentation here")]
        output: Option<PathBuf>,
        #[arg(long, conflicts_with = "classes_only", help = "Process only functions")]
        functions_only: bool,
        #[arg(long, help = "Process only classes")]
        classes_only: bool,
        #[arg(long, help = "Provider: offline, deepseek, openai, openrouter")]
        provider: Option<ProviderKind>,
        #[arg(long, help = "API key for the selected provider")]
        api_key: Option<String>,
    },

    /// Process all Python files in a directory
    Batch {
        #[arg(help = "Directory containing Python files")]
        directory: PathBuf,
        #[arg(long, short, help = "Process subdirectories recursively")]
        recursive: bool,
        #[arg(long, help = "Provider: offline, deepseek, openai, openrouter")]
        provider: Option<ProviderKind>,
        #[arg(long, help = "API key for the selected provider")]
        api_key: Option<String>,
    },

    /// Print extracted functions, classes, imports and metrics as JSON
    Analyze {
        #[arg(help = "Path to the Python file to analyze")]
        file: PathBuf,
        #[arg(long, help = "Single-line JSON")]
        compact: bool,
    },

    /// Generate a README section for a Python file
    Readme {
        #[arg(help = "Path to the Python file")]
        file: PathBuf,
        #[arg(long, short, help = "Output file path")]
        output: Option<PathBuf>,
        #[arg(long, help = "Provider: offline, deepseek, openai, openrouter")]
        provider: Option<ProviderKind>,
        #[arg(long, help = "API key for the selected provider")]
        api_key: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", console::style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let output = Output::new().quiet(cli.quiet);

    match cli.command {
        Commands::Docgen {
            file,
            output: out_path,
            functions_only,
            classes_only,
            provider,
            api_key,
        } => {
            let ctx = CommandContext::load()?;
            let rt = Runtime::new()?;
            rt.block_on(codex_docgen::cli::commands::docgen::run(
                &ctx,
                DocgenOptions {
                    file,
                    output: out_path,
                    selection: UnitSelection::from_flags(functions_only, classes_only),
                    provider,
                    api_key,
                },
                &output,
            ))?;
        }
        Commands::Batch {
            directory,
            recursive,
            provider,
            api_key,
        } => {
            let ctx = CommandContext::load()?;
            let rt = Runtime::new()?;
            rt.block_on(codex_docgen::cli::commands::batch::run(
                &ctx,
                BatchOptions {
                    dir: directory,
                    recursive,
                    provider,
                    api_key,
                },
                &output,
            ))?;
        }
        Commands::Analyze { file, compact } => {
            analyze::run(&file, compact)?;
        }
        Commands::Readme {
            file,
            output: out_path,
            provider,
            api_key,
        } => {
            let ctx = CommandContext::load()?;
            let rt = Runtime::new()?;
            rt.block_on(codex_docgen::cli::commands::readme::run(
                &ctx,
                ReadmeOptions {
                    file,
                    output: out_path,
                    provider,
                    api_key,
                },
                &output,
            ))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => config::show(&format)?,
            ConfigAction::Path => config::path()?,
        },
    }

    Ok(())
}
