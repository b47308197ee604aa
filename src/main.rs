use sqlrun::config;
use sqlrun::core::db::connection::ConnectionManager;
use sqlrun::core::error::{Result, SqlRunError};
use sqlrun::prompt::InteractivePrompt;
use sqlrun::repl;
use tracing::{info, Level};

fn main() {
    init_tracing();

    // Basic startup message
    println!("Welcome to sqlrun! An interactive SQL shell for SQLite and PostgreSQL.");

    match run() {
        Ok(()) => {}
        Err(SqlRunError::Interrupted) => {
            println!("Interrupted. Goodbye!");
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            println!("Exiting.");
            std::process::exit(1);
        }
    }
}

/// Startup sequence: settings, connection, then the menu loop.
fn run() -> Result<()> {
    let mut lines = InteractivePrompt::new();
    let settings_path = config::default_settings_path();
    let descriptor = config::load_or_prompt(&settings_path, &mut lines)?;
    let manager = ConnectionManager::connect(&descriptor)?;
    info!("starting interactive shell");
    repl::run(manager, &mut lines)
}

/// Log output goes to stderr so the menu owns stdout. WARN by default,
/// DEBUG when SQLRUN_DEBUG is set; there are no CLI flags.
fn init_tracing() {
    let level = if std::env::var_os("SQLRUN_DEBUG").is_some() {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
