use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use jags_modules::config::Config;
use jags_modules::{DynamicLibraryLoader, InMemoryConsole, Locator, ModuleManager, NativeLoader};

/// jagsmod - Locate and load JAGS modules
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Engine shared library to open before locating modules
    #[arg(short, long)]
    engine_library: Option<PathBuf>,

    /// Modules directory, bypassing auto-location
    #[arg(short, long)]
    modules_dir: Option<PathBuf>,

    /// Engine version to report when no engine is attached
    #[arg(long)]
    engine_version: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List shared objects mapped into this process
    Libraries,
    /// Print the modules directory
    Locate,
    /// Load modules and print the active module list
    Load {
        /// Module names, loaded after the configured preload list
        names: Vec<String>,

        /// Directory to load these modules from
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Print the engine version
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default subscriber")?;

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        Config::load_from_file(config_path)?
    } else {
        Config::load_default()?
    };

    if let Some(library) = args.engine_library {
        config.engine_library = Some(library);
    }
    if let Some(dir) = args.modules_dir {
        config.modules_dir = Some(dir);
    }
    if let Some(version) = args.engine_version {
        config.engine_version = version;
    }

    // The locator can only find the engine once it is mapped into the process
    let _engine = match &config.engine_library {
        Some(path) => Some(NativeLoader.open(path).map_err(|e| {
            anyhow!("Failed to open engine library {}: {e}", path.display())
        })?),
        None => None,
    };

    let console = InMemoryConsole::new(config.engine_version.clone());
    let mut manager = ModuleManager::new(console).with_locator(Locator::new(&config.locator));
    if let Some(dir) = &config.modules_dir {
        manager.set_modules_dir(dir);
    }

    match args.command {
        Command::Libraries => match manager.loaded_libraries() {
            Some(libraries) => {
                for library in libraries {
                    println!("{}", library.display());
                }
            }
            None => eprintln!("Shared object enumeration is not supported on this platform"),
        },
        Command::Locate => {
            println!("{}", manager.modules_dir()?.display());
        }
        Command::Load { names, dir } => {
            manager
                .load_modules(&config.preload, None)
                .context("Failed to load preloaded modules")?;
            manager.load_modules(&names, dir.as_deref())?;
            for module in manager.list_modules() {
                println!("{module}");
            }
        }
        Command::Version => {
            println!("{}", manager.version()?);
        }
    }

    Ok(())
}
