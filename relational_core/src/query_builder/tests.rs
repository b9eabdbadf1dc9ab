use crate::errors::QueryError;
use crate::query_builder::{
    Boundary, Criteria, Direction, Groups, JoinClause, JoinType, Joins, Order, Pageable, Query,
    Sort,
};
use serde_json::json;

// ========================================
// Projection
// ========================================

#[test]
fn test_columns_preserve_insertion_order() {
    let query = Query::empty().columns(["a"]).columns(["b"]);

    let names: Vec<&str> = query.projection().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_columns_are_not_deduplicated() {
    let query = Query::empty().columns(["a", "a"]).columns(["a"]);
    assert_eq!(query.projection().len(), 3);
}

// ========================================
// Immutability
// ========================================

#[test]
fn test_transformations_leave_receiver_untouched() {
    let base = Query::query(Criteria::eq("name", "Walter"));
    let snapshot = base.clone();

    let _ = base.columns(["id"]);
    let _ = base.limit(10);
    let _ = base.offset(5);
    let _ = base.sort(&Sort::by(["id"])).unwrap();
    let _ = base.group_by(Groups::by(["name"]).unwrap());
    let _ = base.join(Joins::join(JoinClause::cross("other").unwrap()));
    let _ = base.with_boundary(&Boundary::by("age", 1..5).unwrap());
    let _ = base.with(&Pageable::of(1, 2).unwrap()).unwrap();

    assert_eq!(base, snapshot);
}

#[test]
fn test_branches_are_independent() {
    let base = Query::empty().limit(5);
    let left = base.offset(10);
    let right = base.offset(20);

    assert_eq!(left.row_offset(), 10);
    assert_eq!(right.row_offset(), 20);
    assert_eq!(left.row_limit(), Some(5));
    assert_eq!(right.row_limit(), Some(5));
}

// ========================================
// Sorting
// ========================================

#[test]
fn test_sort_appends_orders() {
    let query = Query::empty()
        .sort(&Sort::by(["name"]))
        .unwrap()
        .sort(&Sort::by_orders(vec![Order::desc("id")]))
        .unwrap();

    assert!(query.is_sorted());
    let orders: Vec<(&str, Direction)> = query
        .sorting()
        .iter()
        .map(|o| (o.property(), o.direction()))
        .collect();
    assert_eq!(orders, vec![("name", Direction::Asc), ("id", Direction::Desc)]);
}

#[test]
fn test_ignore_case_sort_rejected() {
    let sort = Sort::by_orders(vec![Order::asc("id"), Order::asc("name").ignore_case()]);

    let plain = Query::empty().sort(&sort);
    assert!(matches!(plain, Err(QueryError::InvalidArgument(_))));

    let busy = Query::query(Criteria::eq("a", 1))
        .limit(3)
        .group_by(Groups::by(["a"]).unwrap())
        .sort(&sort);
    assert!(matches!(busy, Err(QueryError::InvalidArgument(_))));
}

#[test]
fn test_ignore_case_sort_in_pageable_rejected() {
    let pageable =
        Pageable::of_sorted(0, 10, Sort::by_orders(vec![Order::asc("name").ignore_case()]))
            .unwrap();

    assert!(matches!(
        Query::empty().with(&pageable),
        Err(QueryError::InvalidArgument(_))
    ));
}

// ========================================
// Paging
// ========================================

#[test]
fn test_unpaged_is_identity() {
    let query = Query::query(Criteria::eq("name", json!("Walter"))).limit(7);
    assert_eq!(query.with(&Pageable::unpaged()).unwrap(), query);
}

#[test]
fn test_paging_sets_limit_offset_and_sort() {
    let pageable = Pageable::of_sorted(1, 2, Sort::by(["id"]).descending()).unwrap();
    let query = Query::empty().with(&pageable).unwrap();

    assert!(query.is_limited());
    assert_eq!(query.row_limit(), Some(2));
    assert_eq!(query.row_offset(), 2);
    assert_eq!(query.sorting().orders()[0].direction(), Direction::Desc);
}

#[test]
fn test_paging_merges_attached_boundary() {
    let pageable = Pageable::of(0, 10)
        .unwrap()
        .with_boundary(Boundary::by("age", 5..=10).unwrap());
    let query = Query::query(Criteria::eq("name", "Walter"))
        .with(&pageable)
        .unwrap();

    let fields: Vec<&str> = query
        .criteria()
        .unwrap()
        .conditions()
        .iter()
        .map(|c| c.field.as_str())
        .collect();
    assert_eq!(fields, vec!["name", "age", "age"]);
    assert_eq!(query.row_limit(), Some(10));
}

// ========================================
// Boundary, groups and joins
// ========================================

#[test]
fn test_empty_boundary_is_noop() {
    let query = Query::query(Criteria::eq("a", 1));
    assert_eq!(query.with_boundary(&Boundary::empty()), query);
}

#[test]
fn test_boundary_on_query_without_criteria() {
    let query = Query::empty().with_boundary(&Boundary::by("age", 5..).unwrap());
    assert_eq!(query.criteria(), Some(&Criteria::gte("age", 5)));
}

#[test]
fn test_group_by_and_join_replace() {
    let query = Query::empty()
        .group_by(Groups::by(["a"]).unwrap())
        .group_by(Groups::by(["b", "c"]).unwrap())
        .join(Joins::join(JoinClause::cross("x").unwrap()))
        .join(Joins::join(
            JoinClause::new_on(JoinType::Left, "y", "y.id", "t.y_id").unwrap(),
        ));

    assert!(query.has_groups());
    assert_eq!(query.groups().unwrap().columns(), &["b", "c"]);
    assert!(query.has_join());
    assert_eq!(query.joins().unwrap().clauses()[0].table, "y");
}

#[test]
fn test_empty_groups_and_joins_are_not_reported() {
    let query = Query::empty().group_by(Groups::empty()).join(Joins::empty());
    assert!(!query.has_groups());
    assert!(!query.has_join());
    assert!(!query.is_limited());
    assert!(!query.is_sorted());
}
