/// Menu-driven interactive shell.
///
/// Reads menu selections and statement text, invokes the connection
/// manager, and renders outcomes as plain lines. One operation runs at a
/// time; every failure except an interrupt or a terminal I/O error is
/// reported and the loop returns to the menu.
use crate::core::db::connection::ConnectionManager;
use crate::core::db::query::{QueryOutput, Value};
use crate::core::error::{Result, SqlRunError};
use crate::prompt::LineSource;
use tracing::debug;

/// One entry of the main menu.
#[derive(Debug, PartialEq)]
pub enum MenuChoice {
    ListTables,
    CreateTable,
    RunSql,
    Help,
    Exit,
}

impl MenuChoice {
    /// Parses a menu selection. Returns `None` for anything unrecognized;
    /// the loop re-prompts instead of failing.
    pub fn parse(input: &str) -> Option<MenuChoice> {
        match input.trim() {
            "1" => Some(MenuChoice::ListTables),
            "2" => Some(MenuChoice::CreateTable),
            "3" => Some(MenuChoice::RunSql),
            "4" => Some(MenuChoice::Help),
            "5" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

const SEPARATOR: &str = "----------";

const MENU: &str = "\
1) List tables
2) Create table
3) Run SQL
4) Help
5) Exit";

const HELP: &str = "\
sqlrun keeps one open database connection for the whole session.

1) List tables   - shows every table in the connected database
2) Create table  - asks for a name and a column list, then runs
                   CREATE TABLE <name> (<columns>)
3) Run SQL       - executes one statement exactly as typed; SELECT
                   prints rows, anything else prints the affected
                   row count
4) Help          - this text
5) Exit          - leaves the shell

Statements are passed to the database unmodified. With the in-memory
SQLite backend all data is lost when the shell exits.";

/// Executes menu operations against the connection manager.
///
/// Handlers return the text to print so they can be exercised directly in
/// tests; only the loop itself touches stdout.
pub struct Shell {
    manager: ConnectionManager,
}

impl Shell {
    pub fn new(manager: ConnectionManager) -> Self {
        Shell { manager }
    }

    /// Renders the table listing, one dash-prefixed name per line.
    pub fn list_tables(&mut self) -> Result<String> {
        let tables = self.manager.list_tables()?;
        if tables.is_empty() {
            return Ok("(no tables)".to_string());
        }
        let lines: Vec<String> = tables.iter().map(|name| format!("- {}", name)).collect();
        Ok(lines.join("\n"))
    }

    /// Prompts for a table name and column list, then creates the table.
    ///
    /// An empty name or a name already present in the listing is rejected
    /// here and the CREATE statement is never sent.
    pub fn create_table(&mut self, lines: &mut dyn LineSource) -> Result<String> {
        let name = lines.read_line("Table name: ")?.trim().to_string();
        if name.is_empty() {
            return Err(SqlRunError::Validation(
                "table name cannot be empty".to_string(),
            ));
        }
        if self.manager.table_exists(&name)? {
            return Err(SqlRunError::Validation(format!(
                "table '{}' already exists",
                name
            )));
        }
        let columns = read_statement_line(lines, "Columns (e.g. id INTEGER, name TEXT): ")?;
        self.manager
            .execute(&format!("CREATE TABLE {} ({})", name, columns))?;
        Ok(format!("Table '{}' created.", name))
    }

    /// Reads one statement and renders its outcome.
    pub fn run_sql(&mut self, lines: &mut dyn LineSource) -> Result<String> {
        let sql = read_statement_line(lines, "sql> ")?;
        match self.manager.execute(&sql)? {
            QueryOutput::Rows(rows) => Ok(render_rows(&rows)),
            QueryOutput::Affected(count) => Ok(format!("{} row(s) affected.", count)),
        }
    }

    fn is_transient(&self) -> bool {
        self.manager.is_transient()
    }
}

/// Empty input gets exactly one re-prompt; the second answer is forwarded
/// even if it is still empty, and the driver reports whatever it makes of
/// it. No statement validation happens on this side.
fn read_statement_line(lines: &mut dyn LineSource, prompt: &str) -> Result<String> {
    let first = lines.read_line(prompt)?;
    if !first.trim().is_empty() {
        return Ok(first);
    }
    lines.read_line(prompt)
}

/// One `(v1, v2, ...)` line per row, then a count line.
fn render_rows(rows: &[Vec<Value>]) -> String {
    let mut out = String::new();
    for row in rows {
        let rendered: Vec<String> = row.iter().map(|value| value.to_string()).collect();
        out.push('(');
        out.push_str(&rendered.join(", "));
        out.push_str(")\n");
    }
    out.push_str(&format!("({} rows)", rows.len()));
    out
}

/// Runs the menu loop until exit, interrupt, or a terminal failure.
pub fn run(manager: ConnectionManager, lines: &mut dyn LineSource) -> Result<()> {
    let mut shell = Shell::new(manager);
    loop {
        println!("{}", SEPARATOR);
        println!("{}", MENU);
        let input = lines.read_line("choice> ")?;
        let Some(choice) = MenuChoice::parse(&input) else {
            println!("Unrecognized option: {}", input.trim());
            continue;
        };
        debug!(?choice, "menu selection");
        let outcome = match choice {
            MenuChoice::Exit => {
                println!("Goodbye!");
                if shell.is_transient() {
                    println!("(in-memory database discarded)");
                }
                return Ok(());
            }
            MenuChoice::Help => {
                println!("{}", HELP);
                continue;
            }
            MenuChoice::ListTables => shell.list_tables(),
            MenuChoice::CreateTable => shell.create_table(lines),
            MenuChoice::RunSql => shell.run_sql(lines),
        };
        report(outcome)?;
    }
}

/// Prints the outcome of one operation. Recoverable failures are reported
/// with the fixed `Error:` label and the loop continues; interrupts and
/// terminal failures bubble to the caller.
fn report(outcome: Result<String>) -> Result<()> {
    match outcome {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(err @ SqlRunError::Interrupted) | Err(err @ SqlRunError::Io(_)) => Err(err),
        Err(err) => {
            eprintln!("Error: {}", err);
            Ok(())
        }
    }
}
