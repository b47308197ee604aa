/// Connection management for both database backends.
///
/// One manager owns one driver handle for the process lifetime. All
/// statement and metadata traffic goes through it, and driver failures are
/// converted into the crate error type; no raw driver error escapes.
use crate::config::ConnectionDescriptor;
use crate::core::db::query::{self, QueryOutput};
use crate::core::error::{Result, SqlRunError};
use tracing::{debug, info};

/// The driver handle behind the manager.
enum DbHandle {
    Sqlite(rusqlite::Connection),
    Postgres(postgres::Client),
}

/// Owns a single database connection and executes statements against it.
///
/// Constructed once at startup from a [`ConnectionDescriptor`] and handed to
/// the shell; there is no global connection state.
pub struct ConnectionManager {
    handle: DbHandle,
}

impl ConnectionManager {
    /// Opens the connection the descriptor names.
    ///
    /// The embedded backend is a transient in-memory database; all data is
    /// lost when the process ends. Fails with `SqlRunError::Connection` if
    /// the driver cannot reach the database.
    pub fn connect(descriptor: &ConnectionDescriptor) -> Result<Self> {
        let handle = match descriptor {
            ConnectionDescriptor::Sqlite => {
                let conn = rusqlite::Connection::open_in_memory()
                    .map_err(|e| SqlRunError::Connection(e.to_string()))?;
                info!("connected to transient in-memory SQLite database");
                DbHandle::Sqlite(conn)
            }
            ConnectionDescriptor::Postgres(params) => {
                let client = postgres::Client::connect(&params.url(), postgres::NoTls)
                    .map_err(|e| SqlRunError::Connection(e.to_string()))?;
                info!(host = %params.host, database = %params.database, "connected to PostgreSQL");
                DbHandle::Postgres(client)
            }
        };
        Ok(ConnectionManager { handle })
    }

    /// True when the connected backend keeps data in memory only.
    pub fn is_transient(&self) -> bool {
        matches!(self.handle, DbHandle::Sqlite(_))
    }

    /// Lists user table names from live database metadata, ordered by name.
    ///
    /// Nothing is cached; every call asks the database again.
    pub fn list_tables(&mut self) -> Result<Vec<String>> {
        match &mut self.handle {
            DbHandle::Sqlite(conn) => {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' \
                     AND name NOT LIKE 'sqlite_%' ORDER BY name",
                )?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(names)
            }
            DbHandle::Postgres(client) => {
                let rows = client.query(
                    "SELECT table_name FROM information_schema.tables \
                     WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
                     ORDER BY table_name",
                    &[],
                )?;
                rows.iter().map(|row| Ok(row.try_get(0)?)).collect()
            }
        }
    }

    /// True iff `name` appears in [`list_tables`](Self::list_tables).
    /// Comparison is exact; case folding is left to the database itself.
    pub fn table_exists(&mut self, name: &str) -> Result<bool> {
        Ok(self.list_tables()?.iter().any(|table| table == name))
    }

    /// Executes exactly the text given: no parsing, no parameter binding,
    /// no rewriting. Statements whose trimmed text starts with SELECT
    /// (case-insensitive) return rows; everything else runs inside a
    /// transaction and returns the driver's affected-row count.
    pub fn execute(&mut self, sql: &str) -> Result<QueryOutput> {
        debug!(sql, "executing statement");
        if query::is_select(sql) {
            self.run_read(sql)
        } else {
            self.run_write(sql)
        }
    }

    fn run_read(&mut self, sql: &str) -> Result<QueryOutput> {
        match &mut self.handle {
            DbHandle::Sqlite(conn) => {
                let mut stmt = conn.prepare(sql)?;
                let column_count = stmt.column_count();
                let rows = stmt
                    .query_map([], |row| query::sqlite_row_values(row, column_count))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(QueryOutput::Rows(rows))
            }
            DbHandle::Postgres(client) => {
                let rows = client.query(sql, &[])?;
                let rows = rows
                    .iter()
                    .map(query::pg_row_values)
                    .collect::<Result<Vec<_>>>()?;
                Ok(QueryOutput::Rows(rows))
            }
        }
    }

    /// Write path: one transaction per statement, committed on success.
    /// An uncommitted transaction rolls back when dropped.
    fn run_write(&mut self, sql: &str) -> Result<QueryOutput> {
        let affected = match &mut self.handle {
            DbHandle::Sqlite(conn) => {
                let tx = conn.transaction()?;
                let count = tx.execute(sql, [])?;
                tx.commit()?;
                count as u64
            }
            DbHandle::Postgres(client) => {
                let mut tx = client.transaction()?;
                let count = tx.execute(sql, &[])?;
                tx.commit()?;
                count
            }
        };
        Ok(QueryOutput::Affected(affected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::query::Value;

    fn memory_manager() -> ConnectionManager {
        ConnectionManager::connect(&ConnectionDescriptor::Sqlite).unwrap()
    }

    #[test]
    fn test_fresh_database_has_no_tables() {
        let mut manager = memory_manager();
        assert!(manager.is_transient());
        assert_eq!(manager.list_tables().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_create_table_appears_in_listing() {
        let mut manager = memory_manager();
        assert!(!manager.table_exists("users").unwrap());

        let output = manager
            .execute("CREATE TABLE users (id INTEGER, name TEXT)")
            .unwrap();
        assert_eq!(output, QueryOutput::Affected(0));

        assert_eq!(manager.list_tables().unwrap(), vec!["users".to_string()]);
        assert!(manager.table_exists("users").unwrap());
    }

    #[test]
    fn test_listing_is_ordered_by_name() {
        let mut manager = memory_manager();
        manager.execute("CREATE TABLE zebra (id INTEGER)").unwrap();
        manager.execute("CREATE TABLE apple (id INTEGER)").unwrap();
        assert_eq!(
            manager.list_tables().unwrap(),
            vec!["apple".to_string(), "zebra".to_string()]
        );
    }

    #[test]
    fn test_table_exists_is_exact_match() {
        let mut manager = memory_manager();
        manager.execute("CREATE TABLE users (id INTEGER)").unwrap();
        assert!(manager.table_exists("users").unwrap());
        assert!(!manager.table_exists("Users").unwrap());
    }

    #[test]
    fn test_write_statements_report_affected_counts() {
        let mut manager = memory_manager();
        manager
            .execute("CREATE TABLE users (id INTEGER, name TEXT)")
            .unwrap();

        let inserted = manager
            .execute("INSERT INTO users VALUES (1, 'a')")
            .unwrap();
        assert_eq!(inserted, QueryOutput::Affected(1));

        manager
            .execute("INSERT INTO users VALUES (2, 'b')")
            .unwrap();
        let updated = manager.execute("UPDATE users SET name = 'x'").unwrap();
        assert_eq!(updated, QueryOutput::Affected(2));

        let deleted = manager
            .execute("DELETE FROM users WHERE id = 1")
            .unwrap();
        assert_eq!(deleted, QueryOutput::Affected(1));
    }

    #[test]
    fn test_select_returns_rows_and_commits_are_visible() {
        let mut manager = memory_manager();
        manager
            .execute("CREATE TABLE users (id INTEGER, name TEXT)")
            .unwrap();
        manager
            .execute("INSERT INTO users VALUES (1, 'a')")
            .unwrap();

        let output = manager.execute("SELECT * FROM users").unwrap();
        assert_eq!(
            output,
            QueryOutput::Rows(vec![vec![
                Value::Integer(1),
                Value::Text("a".to_string())
            ]])
        );
    }

    #[test]
    fn test_select_on_empty_table_returns_empty_rows() {
        let mut manager = memory_manager();
        manager.execute("CREATE TABLE empty (id INTEGER)").unwrap();
        let output = manager.execute("SELECT * FROM empty").unwrap();
        assert_eq!(output, QueryOutput::Rows(vec![]));
    }

    #[test]
    fn test_invalid_sql_reports_driver_message_and_manager_survives() {
        let mut manager = memory_manager();
        manager.execute("CREATE TABLE users (id INTEGER)").unwrap();

        let err = manager.execute("SELEC * FROM users").unwrap_err();
        match err {
            SqlRunError::Database(message) => {
                assert!(message.contains("syntax error"), "got: {message}")
            }
            other => panic!("expected Database error, got {other:?}"),
        }

        // The handle stays usable after a failed statement.
        let output = manager.execute("SELECT * FROM users").unwrap();
        assert_eq!(output, QueryOutput::Rows(vec![]));
    }
}
