use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pantry::cli::{
    handle_data_command, handle_export, handle_import, handle_log_command,
    handle_sanitize_command, handle_validate_command, DataCommands, SanitizeCommands,
    SnapshotFormat, ValidateCommands,
};
use pantry::config::{PantryPaths, Settings};
use pantry::diagnostics::{DiagnosticJournal, Diagnostics};
use pantry::selector::{BackendSelector, StaticConnectivity};
use pantry::storage::{FileStore, HttpTransport};

#[derive(Parser)]
#[command(
    name = "pantry",
    version,
    about = "Persistence and validation tools for recipe and pantry data",
    long_about = "Pantry stores recipes, stock, settings and planning data either \
                  locally or on a remote data service, checks user input before it \
                  is saved, and moves the whole state between devices as a \
                  snapshot token."
)]
struct Cli {
    /// Treat the network as unavailable (stay on local storage)
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Data(DataCommands),

    /// Export the whole state
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "token")]
        format: SnapshotFormat,
    },

    /// Restore the whole state from a snapshot token
    Import {
        /// Snapshot token
        #[arg(conflicts_with = "file", required_unless_present = "file")]
        token: Option<String>,

        /// Read the token from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Decode and describe the snapshot without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a single value
    #[command(subcommand)]
    Validate(ValidateCommands),

    /// Print the stored form of a value
    #[command(subcommand)]
    Sanitize(SanitizeCommands),

    /// Show recent diagnostic entries
    Log {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Initialize the pantry directories and settings
    Init,

    /// Show current configuration and paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = PantryPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    init_tracing(&settings);

    paths.ensure_directories()?;

    let mut diagnostics = Diagnostics::new(settings.logging.filter());
    if settings.logging.journal_enabled {
        diagnostics = diagnostics.with_journal(DiagnosticJournal::new(paths.diagnostics_log()));
    }

    // Initialize storage
    let transport = HttpTransport::new(
        settings.remote.base_url.clone(),
        Duration::from_secs(settings.remote.timeout_secs),
    )?;
    let connectivity = if cli.offline {
        StaticConnectivity::offline()
    } else {
        StaticConnectivity::online()
    };
    let mut selector = BackendSelector::initialize(
        settings.namespace_prefix.clone(),
        Arc::new(FileStore::new(paths.data_dir())),
        Arc::new(FileStore::new(paths.state_dir())),
        Arc::new(transport),
        &connectivity,
    )?;

    match cli.command {
        Some(Commands::Data(cmd)) => {
            handle_data_command(&mut selector, &diagnostics, cmd).await?;
        }
        Some(Commands::Export { output, format }) => {
            handle_export(&selector, &diagnostics, output, format).await?;
        }
        Some(Commands::Import {
            token,
            file,
            dry_run,
        }) => {
            handle_import(&selector, &diagnostics, token, file, dry_run).await?;
        }
        Some(Commands::Validate(cmd)) => {
            handle_validate_command(&diagnostics, cmd)?;
        }
        Some(Commands::Sanitize(cmd)) => {
            handle_sanitize_command(cmd)?;
        }
        Some(Commands::Log { count }) => {
            handle_log_command(&diagnostics, count)?;
        }
        Some(Commands::Init) => {
            println!("Initializing pantry at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Data is stored locally until you run 'pantry connect <identity>'.");
        }
        Some(Commands::Config) => {
            println!("Pantry Configuration");
            println!("====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("State directory:  {}", paths.state_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Diagnostics log:  {}", paths.diagnostics_log().display());
            println!();
            println!("Settings:");
            println!("  Namespace prefix: {}", settings.namespace_prefix);
            println!("  Remote base URL:  {}", settings.remote.base_url);
            println!("  Remote timeout:   {}s", settings.remote.timeout_secs);
            println!("  Log level:        {}", settings.logging.level);
            println!("  Journal enabled:  {}", settings.logging.journal_enabled);
        }
        None => {
            println!("Pantry - recipe and pantry data storage");
            println!();
            println!("Run 'pantry --help' for usage information.");
        }
    }

    Ok(())
}

/// Install the stderr subscriber; `RUST_LOG` overrides the configured level
fn init_tracing(settings: &Settings) {
    let default_filter = format!(
        "pantry={}",
        settings.logging.level.to_string().to_lowercase()
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
