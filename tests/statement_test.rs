//! Integration tests for statement rendering and execution
//!
//! Renders derived entities for every dialect and runs templates against a
//! recording executor, so no database is required.

#![allow(dead_code)]

use queryhaus::prelude::*;
use serde_json::json;
use std::sync::Mutex;

#[derive(Entity)]
#[table(name = "person")]
pub struct Person {
    #[id]
    pub id: i64,
    #[column(name = "THE_NAME")]
    pub name: String,
    pub age: i32,
    #[embedded(prefix = "home_")]
    pub home: Address,
    pub attributes: serde_json::Value,
}

#[derive(Entity)]
pub struct Address {
    pub street: String,
}

fn adults_by_name(context: &MappingContext) -> Result<SelectSpec, QueryError> {
    SelectSpec::for_entity::<Person>(context)?
        .with_criteria(Criteria::eq("name", "Walter"))
        .with_boundary(&Boundary::by("age", 18..)?)
        .with_page(&Pageable::of_sorted(2, 10, Sort::by(["name"]))?)
}

/// Render the selection built by `build` against one shared mapping context
fn render(
    dialect: Dialect,
    build: impl FnOnce(&MappingContext) -> Result<SelectSpec, QueryError>,
) -> PreparedStatement {
    let context = MappingContext::new();
    let spec = build(&context).unwrap();
    StatementMapper::new(dialect, context).select(&spec).unwrap()
}

#[test]
fn test_postgres_select() {
    let statement = render(Dialect::Postgres, adults_by_name);

    assert_eq!(
        statement.sql(),
        "SELECT person.* FROM person WHERE person.THE_NAME = $1 AND person.age >= $2 ORDER BY person.THE_NAME ASC LIMIT 10 OFFSET 20"
    );
    assert_eq!(
        statement.values().cloned().collect::<Vec<_>>(),
        vec![SqlValue::from("Walter"), SqlValue::from(18)]
    );
}

#[test]
fn test_mysql_select() {
    let statement = render(Dialect::MySql, adults_by_name);

    assert_eq!(
        statement.sql(),
        "SELECT person.* FROM person WHERE person.THE_NAME = ? AND person.age >= ? ORDER BY person.THE_NAME ASC LIMIT 20, 10"
    );
    assert_eq!(statement.bindings()[1].marker, "?");
}

#[test]
fn test_sqlserver_select() {
    let statement = render(Dialect::SqlServer, adults_by_name);

    assert_eq!(
        statement.sql(),
        "SELECT person.* FROM person WHERE person.THE_NAME = @P0 AND person.age >= @P1 ORDER BY person.THE_NAME ASC OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn test_projection_maps_embedded_columns() {
    let statement = render(Dialect::Postgres, |context| {
        Ok(adults_by_name(context)?.with_projection(["id", "name", "home.street"]))
    });
    assert!(statement
        .sql()
        .starts_with("SELECT person.id, person.THE_NAME, person.home_street FROM person"));
}

#[test]
fn test_json_value_binding() {
    let attributes = json!({"role": "chemist", "tags": ["chemistry"]});
    let statement = render(Dialect::Postgres, |context| {
        Ok(SelectSpec::for_entity::<Person>(context)?
            .with_criteria(Criteria::eq("attributes", attributes.clone())))
    });
    assert_eq!(
        statement.sql(),
        "SELECT person.* FROM person WHERE person.attributes = $1"
    );
    assert_eq!(statement.binding(0), Some(&SqlValue::Json(attributes)));
}

#[test]
fn test_grouped_count() {
    let context = MappingContext::new();
    let spec = SelectSpec::for_entity::<Person>(&context)
        .unwrap()
        .with_criteria(Criteria::eq("name", "Walter"))
        .with_group_by(Groups::by(["name", "age"]).unwrap());

    let statement = StatementMapper::new(Dialect::Postgres, context)
        .count(&spec)
        .unwrap();

    assert_eq!(
        statement.sql(),
        "SELECT COUNT(1) FROM (SELECT COUNT(person.id) FROM person WHERE person.THE_NAME = $1 GROUP BY person.THE_NAME, person.age) person"
    );
    assert_eq!(statement.bindings().len(), 1);
}

#[test]
fn test_unsafe_boundary_rejected() {
    for property in ["age; DROP TABLE person", "age value"] {
        let error = Boundary::by(property, 1..).unwrap_err();
        assert!(matches!(error, QueryError::InvalidArgument(_)));
    }
}

#[test]
fn test_ignore_case_sort_rejected() {
    let sort = Sort::by_orders(vec![Order::asc("name").ignore_case()]);
    let error = Query::empty().sort(&sort).unwrap_err();
    assert!(matches!(error, QueryError::InvalidArgument(_)));
}

/// Records statements and answers with fixed rows
struct RecordingExecutor {
    rows: Vec<&'static str>,
    count: i64,
    statements: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl StatementExecutor for RecordingExecutor {
    type Row = &'static str;

    async fn fetch_all(&self, statement: &PreparedStatement) -> Result<Vec<Self::Row>, QueryError> {
        self.statements.lock().unwrap().push(statement.sql().to_string());
        Ok(self.rows.clone())
    }

    async fn fetch_count(&self, statement: &PreparedStatement) -> Result<i64, QueryError> {
        self.statements.lock().unwrap().push(statement.sql().to_string());
        Ok(self.count)
    }

    async fn execute(&self, statement: &PreparedStatement) -> Result<u64, QueryError> {
        self.statements.lock().unwrap().push(statement.sql().to_string());
        Ok(0)
    }
}

#[tokio::test]
async fn test_template_page_with_boundary() {
    let executor = RecordingExecutor {
        rows: vec!["walter", "jesse"],
        count: 7,
        statements: Mutex::new(Vec::new()),
    };
    let template = EntityTemplate::new(
        executor,
        StatementMapper::new(Dialect::Postgres, MappingContext::new()),
    );
    let pageable = Pageable::of_sorted(0, 2, Sort::by(["age"]).descending())
        .unwrap()
        .with_boundary(Boundary::by("age", 18..=65).unwrap());

    let page = template
        .page::<Person>(&Query::query(Criteria::like("name", "W%")), &pageable)
        .await
        .unwrap();

    assert_eq!(page.content(), &["walter", "jesse"]);
    assert_eq!(page.total_elements(), 7);
    assert_eq!(page.total_pages(), 4);
    assert!(page.has_next());

    let statements = template.executor().statements.lock().unwrap().clone();
    assert_eq!(
        statements,
        vec![
            "SELECT person.* FROM person WHERE person.THE_NAME LIKE $1 AND (person.age >= $2 AND person.age <= $3) ORDER BY person.age DESC LIMIT 2",
            "SELECT COUNT(person.id) FROM person WHERE person.THE_NAME LIKE $1 AND (person.age >= $2 AND person.age <= $3)",
        ]
    );
}
