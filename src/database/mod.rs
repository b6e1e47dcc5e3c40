use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool, Result};

/// Source of raw historic rows for one symbol and one field.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// All rows `{ "date": .., "<field>": .. }` of `symbol` where `field` is not
    /// null, ascending by date.
    async fn historic_rows(&self, symbol: &str, field: &str) -> Result<Vec<Value>>;
}

/// Creates a PostgreSQL pool for `db_url` without opening a connection yet, so an
/// unreachable store shows up as query errors instead of a startup failure.
pub fn connect_sqlx(db_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .idle_timeout(Duration::from_secs(30))
        .max_connections(32)
        .min_connections(0)
        .connect_lazy(db_url)
}

pub struct PostgresPriceStore {
    sqlx_db: PgPool,
    table: String,
}

impl PostgresPriceStore {
    pub fn new(sqlx_db: PgPool, table: &str) -> Self {
        PostgresPriceStore {
            sqlx_db,
            table: table.to_string(),
        }
    }
}

#[async_trait]
impl PriceStore for PostgresPriceStore {
    async fn historic_rows(&self, symbol: &str, field: &str) -> Result<Vec<Value>> {
        let sql = historic_rows_sql(&self.table, field);
        let rows = sqlx::query_scalar::<_, Value>(&sql)
            .bind(symbol)
            .bind(field)
            .fetch_all(&self.sqlx_db)
            .await?;
        Ok(rows)
    }
}

/// The field is a column name chosen by the caller, so it is quoted as an
/// identifier rather than interpolated raw. Unknown columns surface as store errors.
fn historic_rows_sql(table: &str, field: &str) -> String {
    let column = quote_ident(field);
    format!(
        r#"
        SELECT json_build_object('date', date, $2::text, {column}) AS row
        FROM {table}
        WHERE symbol = $1 AND {column} IS NOT NULL
        ORDER BY date ASC
        "#,
        table = quote_ident(table),
    )
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
