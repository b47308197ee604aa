#[cfg(test)]
mod shell_flow_tests {
    use sqlrun::config::ConnectionDescriptor;
    use sqlrun::core::db::connection::ConnectionManager;
    use sqlrun::core::error::SqlRunError;
    use sqlrun::prompt::ScriptedLines;
    use sqlrun::repl::{self, Shell};

    fn embedded_manager() -> ConnectionManager {
        ConnectionManager::connect(&ConnectionDescriptor::Sqlite).unwrap()
    }

    /// Walks one whole session through the shell handlers: create a table,
    /// insert, read back, hit the duplicate-name guard, hit a driver error,
    /// and keep going afterward.
    #[test]
    fn shell_session_walkthrough() {
        let mut shell = Shell::new(embedded_manager());

        let mut lines = ScriptedLines::new(["users", "id INTEGER, name TEXT"]);
        assert_eq!(
            shell.create_table(&mut lines).unwrap(),
            "Table 'users' created."
        );
        assert_eq!(shell.list_tables().unwrap(), "- users");

        let mut lines = ScriptedLines::new(["INSERT INTO users VALUES (1, 'a')"]);
        assert_eq!(shell.run_sql(&mut lines).unwrap(), "1 row(s) affected.");

        let mut lines = ScriptedLines::new(["SELECT * FROM users"]);
        assert_eq!(shell.run_sql(&mut lines).unwrap(), "(1, 'a')\n(1 rows)");

        // The duplicate name is rejected before any statement is sent.
        let mut lines = ScriptedLines::new(["users"]);
        match shell.create_table(&mut lines) {
            Err(SqlRunError::Validation(msg)) => assert!(msg.contains("already exists")),
            other => panic!("expected Validation error, got {other:?}"),
        }

        // A typo reaches the driver; its message comes back and the
        // session keeps working.
        let mut lines = ScriptedLines::new(["SELEC * FROM users"]);
        match shell.run_sql(&mut lines) {
            Err(SqlRunError::Database(msg)) => assert!(msg.contains("syntax error")),
            other => panic!("expected Database error, got {other:?}"),
        }

        let mut lines = ScriptedLines::new(["SELECT * FROM users"]);
        assert_eq!(shell.run_sql(&mut lines).unwrap(), "(1, 'a')\n(1 rows)");
    }

    /// The same session driven through the menu loop itself, including an
    /// unrecognized menu entry and the help screen.
    #[test]
    fn menu_loop_runs_a_full_session() {
        let mut lines = ScriptedLines::new([
            "2",
            "users",
            "id INTEGER, name TEXT",
            "3",
            "INSERT INTO users VALUES (1, 'a')",
            "1",
            "3",
            "SELEC * FROM users",
            "3",
            "SELECT * FROM users",
            "banana",
            "4",
            "5",
        ]);
        assert!(repl::run(embedded_manager(), &mut lines).is_ok());
    }

    #[test]
    fn menu_loop_surfaces_interrupt_at_the_menu_prompt() {
        // The script ends after one listing, which reads as an interrupt.
        let mut lines = ScriptedLines::new(["1"]);
        assert!(matches!(
            repl::run(embedded_manager(), &mut lines),
            Err(SqlRunError::Interrupted)
        ));
    }

    #[test]
    fn interrupt_inside_an_operation_bubbles_out() {
        // Interrupt at the table-name prompt of the create dialog.
        let mut lines = ScriptedLines::new(["2"]);
        assert!(matches!(
            repl::run(embedded_manager(), &mut lines),
            Err(SqlRunError::Interrupted)
        ));
    }
}
