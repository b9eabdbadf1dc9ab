use crate::errors::QueryError;
use crate::render::PreparedStatement;
use async_trait::async_trait;

/// Runs rendered statements against a database.
///
/// Implementations bind [`PreparedStatement::values`] in order. The statement
/// was rendered for a dialect, so an executor only makes sense together with a
/// [`StatementMapper`](crate::render::StatementMapper) of the matching dialect.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Row type handed back to callers
    type Row: Send;

    /// Fetch every row the statement produces
    async fn fetch_all(&self, statement: &PreparedStatement) -> Result<Vec<Self::Row>, QueryError>;

    /// Fetch the single numeric value of a count statement
    async fn fetch_count(&self, statement: &PreparedStatement) -> Result<i64, QueryError>;

    /// Execute a statement and return the number of affected rows
    async fn execute(&self, statement: &PreparedStatement) -> Result<u64, QueryError>;
}
