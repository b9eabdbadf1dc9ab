//! Procedural macros for entity mapping metadata
//!
//! This crate provides the `Entity` derive, which implements
//! `relational_core::mapping::Entity` for a struct from its field attributes.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod parsing;

use codegen::generate_entity_impl;
use parsing::parse_entity;

/// Derive macro for the `Entity` trait
///
/// Fields are simple (single column) properties unless marked otherwise:
///
/// - `#[id]` marks the identifier property
/// - `#[column(name = "...")]` sets an explicit column name
/// - `#[embedded(prefix = "...")]` flattens a value object into the owner's table
/// - `#[reference(reverse_column = "...")]` references an entity in its own table
/// - `#[collection(reverse_column = "...", key_column = "...")]` maps a
///   `Vec`, set or map of entities; the kind follows the field type
/// - `#[transient]` skips the field
///
/// `Option<T>` and `Box<T>` are unwrapped to `T`. Without `#[table(name = "...")]`
/// the table name is derived from the struct name by the naming strategy.
///
/// ```rust,ignore
/// use queryhaus::prelude::*;
///
/// #[derive(Entity)]
/// #[table(name = "person")]
/// pub struct Person {
///     #[id]
///     pub id: i64,
///     #[column(name = "THE_NAME")]
///     pub name: String,
///     #[embedded(prefix = "home_")]
///     pub home: Address,
///     #[collection(key_column = "position")]
///     pub phones: Vec<Phone>,
/// }
/// ```
#[proc_macro_derive(
    Entity,
    attributes(table, id, column, embedded, reference, collection, transient)
)]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    // Parse the struct - handle errors properly
    let entity = match parse_entity(&input) {
        Ok(entity) => entity,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(generate_entity_impl(&input.ident, &entity))
}
