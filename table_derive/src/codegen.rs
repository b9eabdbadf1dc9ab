//! Code generation for `#[derive(Entity)]`
//!
//! Emits an `Entity` implementation whose `describe` builds the
//! `EntityDescriptor` from the parsed field metadata. Paths go through
//! `relational_core`, which must be in scope (the `queryhaus` crate re-exports it).

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use crate::parsing::{CollectionKind, EntityInfo, PropertyInfo, PropertyKind};

pub fn generate_entity_impl(name: &Ident, entity: &EntityInfo) -> TokenStream {
    let entity_name = &entity.name;
    let table = entity
        .table
        .as_ref()
        .map(|table| quote! { .table(#table) });
    let properties = entity.properties.iter().map(generate_property);

    quote! {
        impl relational_core::mapping::Entity for #name {
            fn describe() -> relational_core::mapping::EntityDescriptor {
                relational_core::mapping::EntityDescriptor::builder(#entity_name)
                    #table
                    #(.property(#properties))*
                    .build()
            }
        }
    }
}

fn generate_property(property: &PropertyInfo) -> TokenStream {
    let name = &property.name;
    let descriptor = quote! { relational_core::mapping::PropertyDescriptor };

    let base = match &property.kind {
        PropertyKind::Simple => quote! { #descriptor::simple(#name) },
        PropertyKind::Reference(target) => quote! { #descriptor::entity::<#target>(#name) },
        PropertyKind::Embedded { target, prefix } => {
            quote! { #descriptor::embedded::<#target>(#name, #prefix) }
        }
        PropertyKind::Collection { kind, element } => match kind {
            CollectionKind::List => quote! { #descriptor::list::<#element>(#name) },
            CollectionKind::Set => quote! { #descriptor::set::<#element>(#name) },
            CollectionKind::Map => quote! { #descriptor::map::<#element>(#name) },
        },
    };

    let column = property.column.as_ref().map(|c| quote! { .column(#c) });
    let reverse = property
        .reverse_column
        .as_ref()
        .map(|c| quote! { .reverse_column(#c) });
    let key = property.key_column.as_ref().map(|c| quote! { .key_column(#c) });
    let id = property.id.then(|| quote! { .id() });

    quote! { #base #column #reverse #key #id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_entity;
    use syn::{parse_quote, DeriveInput};

    fn normalized(tokens: TokenStream) -> String {
        tokens.to_string().replace(' ', "")
    }

    #[test]
    fn test_generates_descriptor_chain() {
        let input: DeriveInput = parse_quote! {
            #[table(name = "people")]
            struct Person {
                #[id]
                id: i64,
                #[column(name = "THE_NAME")]
                name: String,
                #[collection(reverse_column = "owner", key_column = "position")]
                phones: Vec<Phone>,
            }
        };
        let entity = parse_entity(&input).unwrap();

        let generated = normalized(generate_entity_impl(&input.ident, &entity));

        assert!(generated.starts_with("implrelational_core::mapping::EntityforPerson"));
        assert!(generated.contains("EntityDescriptor::builder(\"Person\").table(\"people\")"));
        assert!(generated.contains("PropertyDescriptor::simple(\"id\").id()"));
        assert!(generated.contains("PropertyDescriptor::simple(\"name\").column(\"THE_NAME\")"));
        assert!(generated.contains(
            "PropertyDescriptor::list::<Phone>(\"phones\").reverse_column(\"owner\").key_column(\"position\")"
        ));
        assert!(generated.ends_with(".build()}}"));
    }

    #[test]
    fn test_embedded_and_maps() {
        let input: DeriveInput = parse_quote! {
            struct Order {
                #[embedded(prefix = "ship_")]
                shipping: Address,
                #[embedded]
                billing: Address,
                #[collection]
                lines: HashMap<String, Line>,
                #[reference]
                customer: Option<Customer>,
            }
        };
        let entity = parse_entity(&input).unwrap();

        let generated = normalized(generate_entity_impl(&input.ident, &entity));

        assert!(!generated.contains(".table("));
        assert!(generated.contains("embedded::<Address>(\"shipping\",\"ship_\")"));
        assert!(generated.contains("embedded::<Address>(\"billing\",\"\")"));
        assert!(generated.contains("map::<Line>(\"lines\")"));
        assert!(generated.contains("entity::<Customer>(\"customer\")"));
    }
}
