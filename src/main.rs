//! Binary entrypoint for the Shademire CLI.
//!
//! Commands:
//! - `play [--world <path>] [--name <name>] [--seed <n>]` - play an interactive session
//! - `validate [--world <path>]` - check a world file for broken references
//! - `init` - write a starter `config.toml`
//!
//! See the library crate docs for module-level details: `shademire::`.
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::Path;

use shademire::adventure::{GameSession, SessionStatus, StdConsole, World, WorldDocument};
use shademire::config::Config;
use shademire::validation::{validate_player_name, validate_world};

#[derive(Parser)]
#[command(name = "shademire")]
#[command(about = "A text adventure of quests, monsters and whispered clues")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a game session
    Play {
        /// World data file (overrides config)
        #[arg(short, long)]
        world: Option<String>,

        /// Player name (overrides config)
        #[arg(short, long)]
        name: Option<String>,

        /// RNG seed for drop tables (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Check a world file for broken references
    Validate {
        /// World data file (overrides config)
        #[arg(short, long)]
        world: Option<String>,
    },
    /// Write a default configuration file
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        if Path::new(&cli.config).exists() {
            return Err(anyhow!("{} already exists; not overwriting", cli.config));
        }
        Config::create_default(&cli.config)?;
        println!("Wrote default configuration to {}", cli.config);
        return Ok(());
    }

    let config = Config::load_or_default(&cli.config)?;
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Play { world, name, seed } => {
            let world_path = world.unwrap_or_else(|| config.game.world_file.clone());
            let world = World::load(&world_path)
                .with_context(|| format!("Failed to load world data from {}", world_path))?;
            let name = validate_player_name(name.as_deref().unwrap_or(&config.game.player_name))?;
            let seed = seed.or(config.game.rng_seed);

            let mut console = StdConsole::new(config.game.clear_screen);
            let mut session = GameSession::new(world, &name, config.progression, seed);
            session.start(&mut console);

            loop {
                let line = match console.read_line("\n> ") {
                    Some(line) => line,
                    None => {
                        info!("input closed, ending session");
                        break;
                    }
                };
                if session.execute_line(&line, &mut console) != SessionStatus::Running {
                    break;
                }
            }
            info!("session ended: {:?}", session.status());
        }
        Commands::Validate { world } => {
            let world_path = world.unwrap_or_else(|| config.game.world_file.clone());
            let document = WorldDocument::load(&world_path)
                .with_context(|| format!("Failed to load world data from {}", world_path))?;
            let errors = validate_world(&document);
            if errors.is_empty() {
                println!("{}: no integrity errors found.", world_path);
            } else {
                for error in &errors {
                    println!("{}", error);
                }
                warn!("{} integrity error(s) in {}", errors.len(), world_path);
                std::process::exit(1);
            }
        }
        Commands::Init => {}
    }

    Ok(())
}

fn init_logging(config: &Config, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .logging
            .level
            .parse::<log::LevelFilter>()
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    // Interactive play owns the terminal; only echo when it is not a TTY or when asked to.
    let echo = verbosity > 0 || !atty::is(atty::Stream::Stdout);

    let file = config.logging.file.as_ref().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    match file {
        Some(f) => {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if echo {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(move |fmt, record| {
                if !echo {
                    return Ok(());
                }
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}
