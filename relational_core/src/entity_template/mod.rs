//! Entity template
//!
//! Glue between the query model and a database: builds a [`SelectSpec`] for a
//! mapped entity, renders it with the [`StatementMapper`] and runs the result
//! through a [`StatementExecutor`].

pub mod pg_executor;


pub use pg_executor::PgExecutor;

use crate::errors::QueryError;
use crate::mapping::{Entity, MappingContext};
use crate::query_builder::{Page, Pageable, Query};
use crate::render::{SelectSpec, StatementMapper};
use crate::traits::StatementExecutor;

#[derive(Debug, Clone)]
pub struct EntityTemplate<E> {
    executor: E,
    mapper: StatementMapper,
}

impl<E: StatementExecutor> EntityTemplate<E> {
    pub fn new(executor: E, mapper: StatementMapper) -> Self {
        Self { executor, mapper }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn mapper(&self) -> &StatementMapper {
        &self.mapper
    }

    pub fn context(&self) -> &MappingContext {
        self.mapper.context()
    }

    /// Selection of `T`'s table shaped by `query`
    pub fn select_spec<T: Entity>(&self, query: &Query) -> Result<SelectSpec, QueryError> {
        Ok(SelectSpec::for_entity::<T>(self.context())?.with_query(query.clone()))
    }

    pub async fn select<T: Entity>(&self, query: &Query) -> Result<Vec<E::Row>, QueryError> {
        let statement = self.mapper.select(&self.select_spec::<T>(query)?)?;
        self.executor.fetch_all(&statement).await
    }

    /// At most one row; more than one match is an error
    pub async fn select_one<T: Entity>(&self, query: &Query) -> Result<Option<E::Row>, QueryError> {
        let mut rows = self.select::<T>(&query.limit(2)).await?;
        if rows.len() > 1 {
            return Err(QueryError::IncorrectResultSize {
                expected: 1,
                actual: rows.len(),
            });
        }
        Ok(rows.pop())
    }

    /// Number of rows matching the query; sorting and paging are ignored
    pub async fn count<T: Entity>(&self, query: &Query) -> Result<u64, QueryError> {
        let statement = self.mapper.count(&self.select_spec::<T>(query)?)?;
        let count = self.executor.fetch_count(&statement).await?;
        u64::try_from(count).map_err(|_| {
            QueryError::illegal_state(format!("Count query returned negative value {}", count))
        })
    }

    pub async fn exists<T: Entity>(&self, query: &Query) -> Result<bool, QueryError> {
        let statement = self.mapper.exists(&self.select_spec::<T>(query)?)?;
        Ok(!self.executor.fetch_all(&statement).await?.is_empty())
    }

    /// One page of results.
    ///
    /// The count query is skipped when the content already pins the total:
    /// a short first page, or any short non-empty page.
    pub async fn page<T: Entity>(
        &self,
        query: &Query,
        pageable: &Pageable,
    ) -> Result<Page<E::Row>, QueryError> {
        let content = self.select::<T>(&query.with(pageable)?).await?;

        let total = match pageable.request() {
            None => content.len() as u64,
            Some(request) => {
                let short = (content.len() as u64) < request.page_size();
                if short && (request.offset() == 0 || !content.is_empty()) {
                    request.offset().saturating_add(content.len() as u64)
                } else {
                    let counted = match pageable.boundary() {
                        Some(boundary) => query.with_boundary(boundary),
                        None => query.clone(),
                    };
                    self.count::<T>(&counted).await?
                }
            }
        };

        debug_log!("Page {:?} has total {}", pageable.page_number(), total);
        Ok(Page::new(content, pageable.clone(), total))
    }
}
