use anyhow::{Context, Result};

use super::connection::{DbPool, get_connection};

/// Creates the deck, card and membership tables when they are missing
pub fn ensure_schema(pool: &DbPool) -> Result<()> {
    let conn = get_connection(pool)?;
    let statements = split_sql_statements(include_str!("schema.sql"));

    for (idx, statement) in statements.iter().enumerate() {
        conn.execute(statement, [])
            .with_context(|| format!("Failed to execute schema statement {}", idx + 1))?;
    }

    log::debug!("Database schema ready ({} statements)", statements.len());
    Ok(())
}

/// Opens the pool for `database_path` and makes sure the schema exists
pub fn open_database(database_path: &str) -> Result<DbPool> {
    let pool = super::connection::create_pool(database_path)
        .with_context(|| format!("Failed to open card database {}", database_path))?;
    ensure_schema(&pool)?;
    log::info!("Opened card database {}", database_path);
    Ok(pool)
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(strip_comment_lines)
        .filter(|s| !s.is_empty())
        .collect()
}

fn strip_comment_lines(statement: &str) -> String {
    statement
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
