//! PostgreSQL statement executor backed by a sqlx pool

use crate::errors::QueryError;
use crate::render::PreparedStatement;
use crate::traits::StatementExecutor;
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{PgPool, Postgres, Row};
use type_mapping::SqlValue;

type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

// Bind a scalar SqlValue with its native Postgres type
macro_rules! bind_sql_value {
    ($query:expr, $value:expr) => {
        match $value {
            SqlValue::Text(s) => $query.bind(s),
            SqlValue::Integer(i) => $query.bind(i),
            SqlValue::BigInt(i) => $query.bind(i),
            SqlValue::SmallInt(i) => $query.bind(i),
            SqlValue::Float(f) => $query.bind(f),
            SqlValue::Boolean(b) => $query.bind(b),
            SqlValue::Uuid(u) => $query.bind(u),
            SqlValue::Timestamp(t) => $query.bind(t),
            SqlValue::Date(d) => $query.bind(d),
            // Decimals travel as text to keep their precision
            SqlValue::Decimal(s) => $query.bind(s),
            SqlValue::Json(v) => $query.bind(sqlx::types::Json(v)),
            SqlValue::Array(values) => bind_array($query, values),
            SqlValue::Null => $query.bind(Option::<String>::None),
        }
    };
}

/// Executes statements rendered for [`Dialect::Postgres`](crate::render::Dialect::Postgres)
#[derive(Debug, Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl StatementExecutor for PgExecutor {
    type Row = PgRow;

    async fn fetch_all(&self, statement: &PreparedStatement) -> Result<Vec<PgRow>, QueryError> {
        debug_log!("Fetching rows: {}", statement.sql());
        bind_statement(statement)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| QueryError::query_execution(statement.sql(), e))
    }

    async fn fetch_count(&self, statement: &PreparedStatement) -> Result<i64, QueryError> {
        debug_log!("Fetching count: {}", statement.sql());
        let row = bind_statement(statement)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| QueryError::query_execution(statement.sql(), e))?;

        row.try_get::<i64, _>(0)
            .map_err(|e| QueryError::query_execution(statement.sql(), e))
    }

    async fn execute(&self, statement: &PreparedStatement) -> Result<u64, QueryError> {
        debug_log!("Executing: {}", statement.sql());
        let result = bind_statement(statement)
            .execute(&self.pool)
            .await
            .map_err(|e| QueryError::query_execution(statement.sql(), e))?;

        Ok(result.rows_affected())
    }
}

fn bind_statement(statement: &PreparedStatement) -> PgQuery<'_> {
    statement
        .values()
        .cloned()
        .fold(sqlx::query(statement.sql()), |query, value| {
            bind_sql_value!(query, value)
        })
}

/// Postgres arrays are homogeneous; mixed arrays fall back to text elements
fn bind_array(query: PgQuery<'_>, values: Vec<SqlValue>) -> PgQuery<'_> {
    if let Some(texts) = collect(&values, |v| match v {
        SqlValue::Text(s) => Some(s.clone()),
        _ => None,
    }) {
        return query.bind(texts);
    }
    if let Some(ints) = collect(&values, |v| match v {
        SqlValue::Integer(i) => Some(*i),
        _ => None,
    }) {
        return query.bind(ints);
    }
    if let Some(longs) = collect(&values, |v| match v {
        SqlValue::BigInt(i) => Some(*i),
        SqlValue::Integer(i) => Some(i64::from(*i)),
        _ => None,
    }) {
        return query.bind(longs);
    }
    if let Some(uuids) = collect(&values, |v| match v {
        SqlValue::Uuid(u) => Some(*u),
        _ => None,
    }) {
        return query.bind(uuids);
    }

    let texts: Vec<String> = values.iter().map(text_of).collect();
    query.bind(texts)
}

fn collect<T>(values: &[SqlValue], f: impl Fn(&SqlValue) -> Option<T>) -> Option<Vec<T>> {
    values.iter().map(f).collect()
}

fn text_of(value: &SqlValue) -> String {
    match value {
        SqlValue::Text(s) | SqlValue::Decimal(s) => s.clone(),
        other => other.to_string(),
    }
}
