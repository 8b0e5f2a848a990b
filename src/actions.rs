use diesel::prelude::*;

use crate::error::StoreError;
use crate::models;

/// Open the SQLite database at `url` and make sure the key-value table exists.
pub fn establish_connection(url: &str) -> Result<SqliteConnection, StoreError> {
    let mut conn = SqliteConnection::establish(url)?;
    ensure_schema(&mut conn)?;
    Ok(conn)
}

pub fn ensure_schema(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    diesel::sql_query(
        "CREATE TABLE IF NOT EXISTS kv_store (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL)",
    )
    .execute(conn)?;

    Ok(())
}

/// Run query using Diesel to find the value stored under `k`.
pub fn read_value(conn: &mut SqliteConnection, k: &str) -> Result<Option<String>, StoreError> {
    // Imported inside the function so the `key`/`value` columns don't leak
    // into the module namespace.
    use crate::schema::kv_store::dsl::*;

    let stored = kv_store
        .filter(key.eq(k))
        .select(value)
        .first::<String>(conn)
        .optional()?;

    Ok(stored)
}

/// Insert or replace the value stored under `k`.
pub fn write_value(conn: &mut SqliteConnection, k: &str, v: &str) -> Result<(), StoreError> {
    use crate::schema::kv_store::dsl::*;

    let entry = models::KvEntry {
        key: k.to_owned(),
        value: v.to_owned(),
    };

    diesel::replace_into(kv_store).values(&entry).execute(conn)?;

    Ok(())
}
