//! Binary entry point for the angelsynth CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Synthesize every type in a script snapshot
//! angelsynth synthesize --snapshot parsed.json
//!
//! # Only render one type, with an explicit config
//! angelsynth synthesize --snapshot parsed.json --type UDoorComponent --config project.toml
//!
//! # Show the effective configuration
//! angelsynth show-config
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use angelsynth::cli::{load_config, run_show_config, run_synthesize};
use angelsynth::error::{OutputErrorCode, SynthError};
use angelsynth::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Synthetic symbol generation for Angelscript classes.
///
/// All output is JSON on stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "angelsynth", version, about = "Synthetic symbol generation for Angelscript classes")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Configuration file (`.toml` or `.json`). Defaults to
    /// `.angelsynth/config.toml` in the current directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Run synthesis over a script snapshot.
    Synthesize {
        /// Script snapshot (JSON) to load.
        #[arg(long)]
        snapshot: PathBuf,
        /// Only render the type with this simple or qualified name.
        #[arg(long = "type")]
        type_name: Option<String>,
    },
    /// Print the effective configuration.
    ShowConfig,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from(&err);

            // Errors go to stdout as JSON, like every other response
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), SynthError> {
    let project_root = std::env::current_dir()?;
    let config = load_config(cli.global.config.as_deref(), &project_root)?;

    let json = match cli.command {
        Command::Synthesize {
            snapshot,
            type_name,
        } => run_synthesize(&snapshot, &config, type_name.as_deref())?,
        Command::ShowConfig => run_show_config(&config)?,
    };

    let mut stdout = io::stdout();
    writeln!(stdout, "{}", json)?;
    let _ = stdout.flush();
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
