/// Connection settings: the descriptor type, the key=value settings file,
/// and the interactive configuration dialog.
///
/// The settings file holds one `key=value` pair per line with keys drawn
/// from {db_type, db_host, db_port, db_user, db_password, db_name}. There
/// is no escaping; values containing newlines or `=` are not supported.
/// Unknown keys and malformed lines are ignored on read.
use crate::core::error::{Result, SqlRunError};
use crate::prompt::LineSource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: &str = "5432";
const DEFAULT_USER: &str = "postgres";
const DEFAULT_DATABASE: &str = "postgres";

/// Server connection parameters for the PostgreSQL backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerParams {
    pub host: String,
    /// Carried as uninterpreted text; a non-numeric port surfaces only
    /// when the connection is attempted.
    pub port: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ServerParams {
    /// Builds the connection URL handed to the driver.
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// Which database the session talks to. Built once at startup from the
/// settings file or the configuration dialog, immutable afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionDescriptor {
    /// Transient in-memory SQLite database.
    Sqlite,
    /// Client-server PostgreSQL database.
    Postgres(ServerParams),
}

/// Default settings location: the platform configuration directory, or a
/// dotfile in the working directory on platforms without one.
pub fn default_settings_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("sqlrun").join("settings.conf"),
        None => PathBuf::from(".sqlrun.conf"),
    }
}

/// Parses settings file content into a descriptor.
///
/// Missing server fields fall back to the usual PostgreSQL defaults; a
/// missing or unrecognized `db_type` selects the embedded backend.
pub fn parse_settings(content: &str) -> ConnectionDescriptor {
    let mut db_type = None;
    let mut host = None;
    let mut port = None;
    let mut user = None;
    let mut password = None;
    let mut database = None;

    for line in content.lines() {
        // Split on the first '='; everything after it is the value.
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key {
            "db_type" => db_type = Some(value.to_string()),
            "db_host" => host = Some(value.to_string()),
            "db_port" => port = Some(value.to_string()),
            "db_user" => user = Some(value.to_string()),
            "db_password" => password = Some(value.to_string()),
            "db_name" => database = Some(value.to_string()),
            _ => {}
        }
    }

    match db_type.as_deref() {
        Some("postgres") => ConnectionDescriptor::Postgres(ServerParams {
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: port.unwrap_or_else(|| DEFAULT_PORT.to_string()),
            user: user.unwrap_or_else(|| DEFAULT_USER.to_string()),
            password: password.unwrap_or_default(),
            database: database.unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        }),
        _ => ConnectionDescriptor::Sqlite,
    }
}

/// Renders a descriptor as settings file content.
pub fn render_settings(descriptor: &ConnectionDescriptor) -> String {
    match descriptor {
        ConnectionDescriptor::Sqlite => "db_type=sqlite\n".to_string(),
        ConnectionDescriptor::Postgres(params) => format!(
            "db_type=postgres\ndb_host={}\ndb_port={}\ndb_user={}\ndb_password={}\ndb_name={}\n",
            params.host, params.port, params.user, params.password, params.database
        ),
    }
}

fn read_settings(path: &Path) -> Result<ConnectionDescriptor> {
    let content = fs::read_to_string(path)
        .map_err(|e| SqlRunError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    Ok(parse_settings(&content))
}

fn write_settings(path: &Path, descriptor: &ConnectionDescriptor) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| SqlRunError::Config(format!("cannot create {}: {}", parent.display(), e)))?;
    }
    fs::write(path, render_settings(descriptor))
        .map_err(|e| SqlRunError::Config(format!("cannot write {}: {}", path.display(), e)))
}

/// Loads the persisted descriptor or walks the user through configuration.
///
/// With a settings file present the user may keep it or reconfigure; a
/// freshly configured descriptor is persisted (overwriting any previous
/// content) before it is returned.
pub fn load_or_prompt(path: &Path, lines: &mut dyn LineSource) -> Result<ConnectionDescriptor> {
    if path.exists() {
        let answer = lines.read_line(&format!(
            "Found saved settings at {}. Reconfigure? [y/N] ",
            path.display()
        ))?;
        if !matches!(answer.trim(), "y" | "Y") {
            debug!(path = %path.display(), "loading saved settings");
            return read_settings(path);
        }
    }

    let descriptor = prompt_descriptor(lines)?;
    write_settings(path, &descriptor)?;
    println!("Settings saved to {}.", path.display());
    Ok(descriptor)
}

fn prompt_descriptor(lines: &mut dyn LineSource) -> Result<ConnectionDescriptor> {
    loop {
        println!("Select database backend:");
        println!("1) SQLite (transient, in-memory)");
        println!("2) PostgreSQL");
        let choice = lines.read_line("backend> ")?;
        match choice.trim() {
            "1" => return Ok(ConnectionDescriptor::Sqlite),
            "2" => return Ok(ConnectionDescriptor::Postgres(prompt_server_params(lines)?)),
            other => println!("Unrecognized choice: {}", other),
        }
    }
}

fn prompt_server_params(lines: &mut dyn LineSource) -> Result<ServerParams> {
    Ok(ServerParams {
        host: prompt_with_default(lines, "Host", DEFAULT_HOST)?,
        port: prompt_with_default(lines, "Port", DEFAULT_PORT)?,
        user: prompt_with_default(lines, "User", DEFAULT_USER)?,
        password: prompt_with_default(lines, "Password", "")?,
        database: prompt_with_default(lines, "Database", DEFAULT_DATABASE)?,
    })
}

/// Empty input keeps the default. No format validation happens here.
fn prompt_with_default(lines: &mut dyn LineSource, label: &str, default: &str) -> Result<String> {
    let input = lines.read_line(&format!("{} [{}]: ", label, default))?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}
