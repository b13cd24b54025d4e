use anyhow::{bail, Context, Result};
use rusqlite::Connection;

/// Schema steps in order. Step `n` (0-based) takes `user_version` from `n`
/// to `n + 1`.
const MIGRATIONS: &[(&str, &str)] = &[("schema_v1.sql", include_str!("schemas/schema_v1.sql"))];

pub(super) fn schema_version() -> i32 {
    MIGRATIONS.len() as i32
}

/// Brings the storage schema up to date. Each step commits on its own
/// together with its `user_version` bump, so an interrupted upgrade resumes
/// from the last completed step.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let current: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;
    let target = schema_version();

    if current > target {
        bail!("storage version {current} is newer than supported schema {target}");
    }

    for (index, (name, sql)) in MIGRATIONS.iter().enumerate().skip(current.max(0) as usize) {
        let version = index as i32 + 1;
        let tx = conn
            .transaction()
            .with_context(|| format!("failed to open transaction for {name}"))?;
        tx.execute_batch(sql)
            .with_context(|| format!("failed to execute {name}"))?;
        tx.pragma_update(None, "user_version", version)
            .context("failed to update user_version pragma")?;
        tx.commit()
            .with_context(|| format!("failed to commit {name}"))?;
    }

    Ok(())
}
