use std::env;

use clickhouse::Client;
use serde::Deserialize;
use tokio::io::AsyncBufReadExt;
use tokio::runtime::Runtime;

use super::frame::{Frame, Value};
use super::{Backend, BackendError};
use crate::config::AnnotationConfig;
use crate::query_planner::QueryPlan;
use crate::sql_generator::generate_sql;

/// Annotation database served by ClickHouse.
///
/// Owns a current-thread runtime and blocks on every query, so it must not be
/// driven from inside another Tokio runtime.
pub struct ClickHouseBackend {
    client: Client,
    database: String,
    runtime: Runtime,
}

fn read_env_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

impl ClickHouseBackend {
    pub fn new(url: &str, user: &str, password: &str, database: &str) -> Result<Self, BackendError> {
        let client = Client::default()
            .with_url(url)
            .with_user(user)
            .with_password(password)
            .with_database(database)
            .with_option("join_use_nulls", "1") // Return NULL for unmatched LEFT JOIN columns
            .with_option("output_format_json_quote_64bit_integers", "0");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BackendError::Runtime(e.to_string()))?;

        log::info!("Using ClickHouse at {} (database `{}`)", url, database);
        Ok(ClickHouseBackend {
            client,
            database: database.to_string(),
            runtime,
        })
    }

    pub fn from_config(config: &AnnotationConfig) -> Result<Self, BackendError> {
        Self::new(
            &config.clickhouse_url,
            &config.clickhouse_user,
            &config.clickhouse_password,
            &config.clickhouse_database,
        )
    }

    /// Connect using `CLICKHOUSE_URL`, `CLICKHOUSE_USER`, `CLICKHOUSE_PASSWORD`
    /// and `CLICKHOUSE_DATABASE`; `None` if any is unset
    pub fn try_from_env() -> Option<Result<Self, BackendError>> {
        let url = read_env_var("CLICKHOUSE_URL")?;
        let user = read_env_var("CLICKHOUSE_USER")?;
        let password = read_env_var("CLICKHOUSE_PASSWORD")?;
        let database = read_env_var("CLICKHOUSE_DATABASE")?;
        Some(Self::new(&url, &user, &password, &database))
    }

    /// Run raw SQL and collect JSONEachRow lines
    fn fetch_json_rows(
        &self,
        sql: &str,
    ) -> Result<Vec<serde_json::Map<String, serde_json::Value>>, BackendError> {
        // The client treats `?` as a bind placeholder
        let sql = sql.replace('?', "??");
        self.runtime.block_on(async {
            let mut lines = self
                .client
                .query(&sql)
                .fetch_bytes("JSONEachRow")
                .map_err(|e| {
                    log::error!("ClickHouse query failed. SQL was:\n{}\nError: {}", sql, e);
                    e
                })?
                .lines();

            let mut rows = Vec::new();
            while let Some(line) = lines.next_line().await? {
                let row: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&line)
                    .map_err(|e| BackendError::Parse(e.to_string()))?;
                rows.push(row);
            }
            Ok::<_, BackendError>(rows)
        })
    }

    fn rows_to_frame(
        table: &str,
        columns: Vec<String>,
        json_rows: Vec<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<Frame, BackendError> {
        let mut rows = Vec::with_capacity(json_rows.len());
        for json_row in json_rows {
            let mut row = Vec::with_capacity(columns.len());
            for column in &columns {
                let cell = json_row.get(column).unwrap_or(&serde_json::Value::Null);
                let value = Value::from_json(cell).ok_or_else(|| BackendError::UnsupportedValue {
                    table: table.to_string(),
                    column: column.clone(),
                    value: cell.to_string(),
                })?;
                row.push(value);
            }
            rows.push(row);
        }
        Ok(Frame::new(columns, rows))
    }
}

impl Backend for ClickHouseBackend {
    fn list_tables(&self) -> Result<Vec<String>, BackendError> {
        #[derive(Debug, clickhouse::Row, Deserialize)]
        struct TableName {
            name: String,
        }

        let rows: Vec<TableName> = self.runtime.block_on(
            self.client
                .query("SELECT name FROM system.tables WHERE database = ? ORDER BY name")
                .bind(self.database.as_str())
                .fetch_all(),
        )?;
        Ok(rows.into_iter().map(|t| t.name).collect())
    }

    fn table_columns(&self, table: &str) -> Result<Vec<String>, BackendError> {
        #[derive(Debug, clickhouse::Row, Deserialize)]
        struct ColumnName {
            name: String,
        }

        let rows: Vec<ColumnName> = self.runtime.block_on(
            self.client
                .query(
                    "SELECT name FROM system.columns WHERE database = ? AND table = ? ORDER BY position",
                )
                .bind(self.database.as_str())
                .bind(table)
                .fetch_all(),
        )?;
        if rows.is_empty() {
            return Err(BackendError::TableNotFound {
                table: table.to_string(),
            });
        }
        Ok(rows.into_iter().map(|c| c.name).collect())
    }

    fn scan(&self, table: &str) -> Result<Frame, BackendError> {
        let columns = self.table_columns(table)?;
        let json_rows = self.fetch_json_rows(&format!("SELECT * FROM {}", table))?;
        Self::rows_to_frame(table, columns, json_rows)
    }

    fn execute(&self, plan: &QueryPlan) -> Result<Frame, BackendError> {
        let sql = generate_sql(plan);
        let json_rows = self.fetch_json_rows(&sql)?;
        Self::rows_to_frame(&plan.table, plan.columns.clone(), json_rows)
    }
}
