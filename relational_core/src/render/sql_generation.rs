//! SQL generation
//!
//! Renders a [`SelectSpec`] into dialect specific SQL. Bind markers are
//! handed out in the order their values appear in the statement text.

use super::bind_markers::BindMarkers;
use super::dialect::Dialect;
use super::statement::{Binding, PreparedStatement, SelectSpec};
use crate::errors::QueryError;
use crate::identifier::{IdentifierProcessing, SqlIdentifier};
use crate::mapping::{AggregatePath, MappingContext, PersistentEntity};
use crate::query_builder::{
    Combinator, Comparator, Condition, Criteria, JoinClause, JoinCondition, NullHandling, Order,
};
use crate::validation::validate_safe_expression;
use std::sync::Arc;
use type_mapping::SqlValue;

/// Turns select specs into prepared statements for one dialect
#[derive(Debug, Clone)]
pub struct StatementMapper {
    dialect: Dialect,
    context: MappingContext,
}

impl StatementMapper {
    pub fn new(dialect: Dialect, context: MappingContext) -> Self {
        Self { dialect, context }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn context(&self) -> &MappingContext {
        &self.context
    }

    /// `SELECT [DISTINCT] <projection> FROM ... [WHERE] [GROUP BY] [ORDER BY] [limit]`
    pub fn select(&self, spec: &SelectSpec) -> Result<PreparedStatement, QueryError> {
        let mut renderer = Renderer::new(self, spec);

        let projection = renderer.projection()?;
        let from = renderer.from_clause();
        let mut sql = format!(
            "SELECT {}{} {}",
            if spec.is_distinct() { "DISTINCT " } else { "" },
            projection,
            from
        );
        renderer.push_where(&mut sql)?;
        renderer.push_group_by(&mut sql)?;

        let query = spec.query();
        let limit = self.dialect.limit_clause(query.row_limit(), query.row_offset());
        renderer.push_order_by(&mut sql, limit.is_some())?;
        if let Some(limit) = limit {
            sql.push(' ');
            sql.push_str(&limit);
        }

        Ok(renderer.finish(sql))
    }

    /// Row count for the selection's criteria. Sorting and paging are ignored.
    /// Grouped queries without joins count groups through a wrapping
    /// subquery; with joins the grouped statement is returned as is.
    pub fn count(&self, spec: &SelectSpec) -> Result<PreparedStatement, QueryError> {
        let mut renderer = Renderer::new(self, spec);

        let target = renderer.count_target();
        let from = renderer.from_clause();
        let mut sql = format!("SELECT COUNT({}) {}", target, from);
        renderer.push_where(&mut sql)?;

        if spec.query().has_groups() {
            renderer.push_group_by(&mut sql)?;
            if !spec.query().has_join() {
                sql = format!(
                    "SELECT COUNT(1) FROM ({}) {}",
                    sql,
                    renderer.columns.table_reference
                );
            }
        }

        Ok(renderer.finish(sql))
    }

    /// `SELECT 1 ... ` limited to a single row
    pub fn exists(&self, spec: &SelectSpec) -> Result<PreparedStatement, QueryError> {
        let mut renderer = Renderer::new(self, spec);

        let from = renderer.from_clause();
        let mut sql = format!("SELECT 1 {}", from);
        renderer.push_where(&mut sql)?;

        let limit = self.dialect.limit_clause(Some(1), 0);
        if limit.is_some() && self.dialect.requires_order_for_paging() {
            sql.push_str(" ORDER BY (SELECT 1)");
        }
        if let Some(limit) = limit {
            sql.push(' ');
            sql.push_str(&limit);
        }

        Ok(renderer.finish(sql))
    }
}

/// Maps property names onto qualified column expressions
struct ColumnResolver<'a> {
    context: &'a MappingContext,
    entity: Option<Arc<PersistentEntity>>,
    table_reference: String,
    processing: IdentifierProcessing,
}

impl ColumnResolver<'_> {
    fn resolve(&self, name: &str) -> Result<String, QueryError> {
        if name.contains('(') {
            return Ok(name.to_string());
        }
        if name == "*" {
            return Ok(format!("{}.*", self.table_reference));
        }

        if let Some(entity) = &self.entity {
            match self.context.property_path_from(Arc::clone(entity), name) {
                Ok(path) => return self.mapped_column(name, &self.context.aggregate_path(&path)?),
                // Not a property of the entity, fall through to plain names
                Err(QueryError::InvalidArgument(_)) => {}
                Err(e) => return Err(e),
            }
        }

        if name.contains('.') {
            Ok(name.to_string())
        } else {
            Ok(format!("{}.{}", self.table_reference, name))
        }
    }

    fn mapped_column(&self, name: &str, path: &AggregatePath) -> Result<String, QueryError> {
        if path.is_entity() || !path.table_owning_ancestor()?.is_root() {
            return Err(QueryError::invalid_argument(format!(
                "Property '{}' is not stored in a column of {}",
                name, self.table_reference
            )));
        }
        Ok(format!(
            "{}.{}",
            self.table_reference,
            path.column_name()?.to_sql(&self.processing)
        ))
    }

    fn resolve_checked(&self, name: &str, context: &'static str) -> Result<String, QueryError> {
        validate_safe_expression(name, context)
            .map_err(|e| QueryError::invalid_argument(e.to_string()))?;
        self.resolve(name)
    }
}

/// Hands out bind markers and records the bound values
struct Binder {
    markers: BindMarkers,
    bindings: Vec<Binding>,
}

impl Binder {
    fn bind(&mut self, value: SqlValue) -> String {
        let marker = self.markers.next();
        let placeholder = marker.placeholder().to_string();
        trace_log!("Binding {} to {}", value.type_name(), placeholder);

        self.bindings.push(Binding {
            index: marker.index(),
            marker: placeholder.clone(),
            value,
        });
        placeholder
    }
}

/// State for rendering one statement
struct Renderer<'a> {
    dialect: Dialect,
    spec: &'a SelectSpec,
    columns: ColumnResolver<'a>,
    binder: Binder,
}

impl<'a> Renderer<'a> {
    fn new(mapper: &'a StatementMapper, spec: &'a SelectSpec) -> Self {
        let processing = mapper.dialect.identifier_processing();

        Self {
            dialect: mapper.dialect,
            spec,
            columns: ColumnResolver {
                context: &mapper.context,
                entity: spec.entity().cloned(),
                table_reference: spec.table().reference().to_sql(&processing),
                processing,
            },
            binder: Binder {
                markers: mapper.dialect.bind_markers(),
                bindings: Vec::new(),
            },
        }
    }

    fn finish(self, sql: String) -> PreparedStatement {
        debug_log!(
            "Rendered {} statement: {} ({} bindings)",
            self.dialect.name(),
            sql,
            self.binder.bindings.len()
        );
        PreparedStatement::new(sql, self.binder.bindings)
    }

    fn projection(&self) -> Result<String, QueryError> {
        let columns = self.spec.query().projection();
        if columns.is_empty() {
            return Ok(format!("{}.*", self.columns.table_reference));
        }

        columns
            .iter()
            .map(|column| match column {
                SqlIdentifier::Expression(expression) => Ok(expression.clone()),
                SqlIdentifier::Quoted(_) => Ok(format!(
                    "{}.{}",
                    self.columns.table_reference,
                    column.to_sql(&self.columns.processing)
                )),
                SqlIdentifier::Unquoted(name) => self.columns.resolve(name),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|columns| columns.join(", "))
    }

    fn count_target(&self) -> String {
        let id_column = self
            .columns
            .entity
            .as_ref()
            .and_then(|entity| entity.id_property())
            .map(|id| id.column_name().to_sql(&self.columns.processing));

        match id_column {
            Some(column) => format!("{}.{}", self.columns.table_reference, column),
            None => "*".to_string(),
        }
    }

    fn from_clause(&self) -> String {
        let mut sql = format!(
            "FROM {}",
            self.spec.table().to_sql(&self.columns.processing)
        );
        if let Some(joins) = self.spec.query().joins() {
            for join in joins.iter() {
                sql.push(' ');
                sql.push_str(&render_join(join));
            }
        }
        sql
    }

    fn push_where(&mut self, sql: &mut String) -> Result<(), QueryError> {
        let query = self.spec.query();

        let mut parts: Vec<(Criteria, Option<ColumnResolver<'a>>)> = Vec::new();
        if let Some(criteria) = query.criteria().and_then(Criteria::simplify) {
            parts.push((criteria, None));
        }
        if let Some(joins) = query.joins() {
            for join in joins.iter() {
                if let Some(criteria) = join.criteria.as_ref().and_then(Criteria::simplify) {
                    parts.push((criteria, Some(self.join_resolver(join))));
                }
            }
        }
        if parts.is_empty() {
            return Ok(());
        }

        let combined = parts.len() > 1;
        let mut rendered = Vec::with_capacity(parts.len());
        for (criteria, resolver) in &parts {
            let resolver = resolver.as_ref().unwrap_or(&self.columns);
            let text = render_criteria(criteria, resolver, &mut self.binder, false)?;
            rendered.push(match criteria {
                Criteria::Group {
                    combinator: Combinator::Or,
                    ..
                } if combined => format!("({})", text),
                _ => text,
            });
        }

        sql.push_str(" WHERE ");
        sql.push_str(&rendered.join(" AND "));
        Ok(())
    }

    fn join_resolver(&self, join: &JoinClause) -> ColumnResolver<'a> {
        ColumnResolver {
            context: self.columns.context,
            entity: None,
            table_reference: join.table_ref().to_string(),
            processing: self.columns.processing,
        }
    }

    fn push_group_by(&self, sql: &mut String) -> Result<(), QueryError> {
        let groups = match self.spec.query().groups() {
            Some(groups) if groups.is_not_empty() => groups,
            _ => return Ok(()),
        };

        let columns = groups
            .iter()
            .map(|column| self.columns.resolve_checked(column, "Group column"))
            .collect::<Result<Vec<_>, _>>()?;
        sql.push_str(" GROUP BY ");
        sql.push_str(&columns.join(", "));
        Ok(())
    }

    fn push_order_by(&self, sql: &mut String, paged: bool) -> Result<(), QueryError> {
        let sort = self.spec.query().sorting();
        if sort.is_unsorted() {
            if paged && self.dialect.requires_order_for_paging() {
                sql.push_str(" ORDER BY (SELECT 1)");
            }
            return Ok(());
        }

        let orders = sort
            .iter()
            .map(|order| self.render_order(order))
            .collect::<Result<Vec<_>, _>>()?;
        sql.push_str(" ORDER BY ");
        sql.push_str(&orders.join(", "));
        Ok(())
    }

    fn render_order(&self, order: &Order) -> Result<String, QueryError> {
        let column = self.columns.resolve_checked(order.property(), "Sort property")?;
        let mut rendered = format!("{} {}", column, order.direction().to_sql());

        let nulls = match order.null_handling() {
            NullHandling::Native => return Ok(rendered),
            NullHandling::NullsFirst => "NULLS FIRST",
            NullHandling::NullsLast => "NULLS LAST",
        };
        if self.dialect.supports_null_ordering() {
            rendered.push(' ');
            rendered.push_str(nulls);
        } else {
            tracing::warn!(
                "{} does not support {}; ignoring it for '{}'",
                self.dialect.name(),
                nulls,
                order.property()
            );
        }
        Ok(rendered)
    }
}

fn render_join(join: &JoinClause) -> String {
    let mut sql = format!("{} {}", join.join_type.to_sql(), join.table);
    if let Some(alias) = &join.alias {
        sql.push_str(" AS ");
        sql.push_str(alias);
    }

    match &join.condition {
        JoinCondition::On(pairs) => {
            let conditions: Vec<String> = pairs
                .iter()
                .map(|(left, right)| format!("{} = {}", left, right))
                .collect();
            sql.push_str(" ON ");
            sql.push_str(&conditions.join(" AND "));
        }
        JoinCondition::Using(columns) => {
            sql.push_str(&format!(" USING ({})", columns.join(", ")));
        }
        JoinCondition::None => {}
    }
    sql
}

/// Render a simplified criteria tree; nested multi-part groups get parentheses
fn render_criteria(
    criteria: &Criteria,
    columns: &ColumnResolver<'_>,
    binder: &mut Binder,
    nested: bool,
) -> Result<String, QueryError> {
    match criteria {
        Criteria::Condition(condition) => render_condition(condition, columns, binder),
        Criteria::Group { combinator, parts } => {
            let rendered = parts
                .iter()
                .map(|part| render_criteria(part, columns, binder, true))
                .collect::<Result<Vec<_>, _>>()?;
            let joined = rendered.join(combinator.to_sql());

            if nested && parts.len() > 1 {
                Ok(format!("({})", joined))
            } else {
                Ok(joined)
            }
        }
    }
}

fn render_condition(
    condition: &Condition,
    columns: &ColumnResolver<'_>,
    binder: &mut Binder,
) -> Result<String, QueryError> {
    let column = columns.resolve_checked(&condition.field, "Criteria column")?;

    let sql = match (condition.comparator, &condition.value) {
        (Comparator::IsNull, _) | (Comparator::Eq, None | Some(SqlValue::Null)) => {
            format!("{} IS NULL", column)
        }
        (Comparator::IsNotNull, _) | (Comparator::Ne, None | Some(SqlValue::Null)) => {
            format!("{} IS NOT NULL", column)
        }
        (Comparator::IsTrue | Comparator::IsFalse, _) => {
            format!("{} {}", column, condition.comparator.to_sql())
        }
        (Comparator::In | Comparator::NotIn, Some(value)) => {
            let values = match value {
                SqlValue::Array(values) => values.clone(),
                single => vec![single.clone()],
            };
            if values.is_empty() {
                return Ok(match condition.comparator {
                    Comparator::In => "1 = 0".to_string(),
                    _ => "1 = 1".to_string(),
                });
            }

            let markers: Vec<String> = values.into_iter().map(|v| binder.bind(v)).collect();
            format!(
                "{} {} ({})",
                column,
                condition.comparator.to_sql(),
                markers.join(", ")
            )
        }
        (comparator, Some(value)) => {
            format!("{} {} {}", column, comparator.to_sql(), binder.bind(value.clone()))
        }
        (comparator, None) => {
            return Err(QueryError::invalid_argument(format!(
                "Comparison {} on '{}' requires a value",
                comparator.to_sql(),
                condition.field
            )))
        }
    };
    Ok(sql)
}
