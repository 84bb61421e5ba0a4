use anyhow::Context;
use rusqlite::Connection;

/// Schema migrations, applied in order. Embedded so the binary and the test
/// suite do not depend on the working directory.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_init.sql",
    include_str!("../../migrations/001_init.sql"),
)];

pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .context("failed to create migrations table")?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .context("failed to check migration status")?;

        if already_applied {
            continue;
        }

        conn.execute_batch(sql)
            .with_context(|| format!("failed to apply migration: {name}"))?;

        conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])
            .with_context(|| format!("failed to record migration: {name}"))?;

        tracing::info!("applied migration: {name}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
    }

    #[test]
    fn test_schema_rejects_inverted_ranges() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO pools (id, title, host_name, location, price_per_hour, capacity, created_at)
             VALUES ('p', 'Pool', 'Host', 'Town', 10, 1, '2025-01-01 00:00:00');",
        )
        .unwrap();

        let result = conn.execute_batch(
            "INSERT INTO bookings (id, pool_id, guest_name, guest_email, date, start_time, end_time,
                                   start_minute, end_minute, total_price, created_at, updated_at)
             VALUES ('b', 'p', 'G', 'g@x.io', '2025-01-02', '10:00', '09:00',
                     600, 540, 0, '2025-01-01 00:00:00', '2025-01-01 00:00:00');",
        );
        assert!(result.is_err());
    }
}
