//! Parsing of `#[derive(Entity)]` input
//!
//! Reads the `#[table]` attribute of the struct and the mapping attributes of
//! its fields, classifies each field and validates names at compile time.

use syn::{
    ext::IdentExt, Attribute, Data, DeriveInput, Error, Fields, GenericArgument, LitStr, Meta,
    PathArguments, Result, Type,
};

/// Validate an identifier and return syn::Error for better proc macro error handling
pub fn validate_identifier_syn(kind: &str, name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid {} '{}': {}", kind, name, e)))
}

/// Compile time mirror of `relational_core::validation::validate_identifier`
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Set,
    Map,
}

/// How a field is mapped
pub enum PropertyKind {
    Simple,
    Reference(Type),
    Embedded { target: Type, prefix: String },
    Collection { kind: CollectionKind, element: Type },
}

pub struct PropertyInfo {
    pub name: String,
    pub kind: PropertyKind,
    pub column: Option<String>,
    pub reverse_column: Option<String>,
    pub key_column: Option<String>,
    pub id: bool,
}

pub struct EntityInfo {
    pub name: String,
    pub table: Option<String>,
    pub properties: Vec<PropertyInfo>,
}

pub fn parse_entity(input: &DeriveInput) -> Result<EntityInfo> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Entity cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(named_fields_error(input)),
        },
        _ => return Err(named_fields_error(input)),
    };

    let table = parse_table_attribute(&input.attrs)?;

    let mut properties = Vec::new();
    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;

        if has_attribute(&field.attrs, "transient") {
            continue;
        }

        properties.push(parse_property(
            ident.unraw().to_string(),
            &field.ty,
            &field.attrs,
        )?);
    }

    let ids = properties.iter().filter(|property| property.id).count();
    if ids > 1 {
        return Err(Error::new_spanned(
            &input.ident,
            "Only one field can be marked with #[id]",
        ));
    }

    Ok(EntityInfo {
        name: input.ident.unraw().to_string(),
        table,
        properties,
    })
}

fn named_fields_error(input: &DeriveInput) -> Error {
    Error::new_spanned(
        &input.ident,
        "Entity can only be derived for structs with named fields",
    )
}

/// `#[table(name = "...")]`; the table name is derived when absent
pub fn parse_table_attribute(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut table = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("table")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                validate_identifier_syn("table name", &value.value(), value.span())?;
                table = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported table attribute, expected `name`"))
            }
        })?;
    }

    Ok(table)
}

fn parse_property(name: String, ty: &Type, attrs: &[Attribute]) -> Result<PropertyInfo> {
    let mut property = PropertyInfo {
        name,
        kind: PropertyKind::Simple,
        column: None,
        reverse_column: None,
        key_column: None,
        id: has_attribute(attrs, "id"),
    };
    let mut mapping: Option<&'static str> = None;
    let target = unwrap_option(ty);

    for attr in attrs {
        let key = if attr.path().is_ident("column") {
            "column"
        } else if attr.path().is_ident("embedded") {
            "embedded"
        } else if attr.path().is_ident("reference") {
            "reference"
        } else if attr.path().is_ident("collection") {
            "collection"
        } else {
            continue;
        };

        if key != "column" {
            if let Some(previous) = mapping.replace(key) {
                return Err(Error::new_spanned(
                    attr,
                    format!("#[{}] conflicts with #[{}]", key, previous),
                ));
            }
        }

        match key {
            "column" => {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("name") {
                        property.column = Some(identifier_value(&meta, "column name")?);
                        Ok(())
                    } else {
                        Err(meta.error("unsupported column attribute, expected `name`"))
                    }
                })?;
            }
            "embedded" => {
                let mut prefix = String::new();
                if !matches!(attr.meta, Meta::Path(_)) {
                    attr.parse_nested_meta(|meta| {
                        if meta.path.is_ident("prefix") {
                            let value: LitStr = meta.value()?.parse()?;
                            if !value.value().is_empty() {
                                validate_identifier_syn("prefix", &value.value(), value.span())?;
                            }
                            prefix = value.value();
                            Ok(())
                        } else {
                            Err(meta.error("unsupported embedded attribute, expected `prefix`"))
                        }
                    })?;
                }
                property.kind = PropertyKind::Embedded {
                    target: target.clone(),
                    prefix,
                };
            }
            "reference" => {
                parse_relation_options(attr, &mut property, false)?;
                property.kind = PropertyKind::Reference(target.clone());
            }
            _ => {
                parse_relation_options(attr, &mut property, true)?;
                let (kind, element) = collection_of(target).ok_or_else(|| {
                    Error::new_spanned(
                        ty,
                        "#[collection] requires a Vec, VecDeque, LinkedList, HashSet, BTreeSet, HashMap or BTreeMap field",
                    )
                })?;
                property.kind = PropertyKind::Collection { kind, element };
            }
        }
    }

    if property.id && !matches!(property.kind, PropertyKind::Simple) {
        return Err(Error::new_spanned(
            ty,
            "#[id] can only be placed on a simple field",
        ));
    }

    Ok(property)
}

fn parse_relation_options(
    attr: &Attribute,
    property: &mut PropertyInfo,
    allow_key_column: bool,
) -> Result<()> {
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(());
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("reverse_column") {
            property.reverse_column = Some(identifier_value(&meta, "reverse column")?);
            Ok(())
        } else if allow_key_column && meta.path.is_ident("key_column") {
            property.key_column = Some(identifier_value(&meta, "key column")?);
            Ok(())
        } else {
            Err(meta.error("unsupported relation attribute"))
        }
    })
}

fn identifier_value(meta: &syn::meta::ParseNestedMeta<'_>, kind: &str) -> Result<String> {
    let value: LitStr = meta.value()?.parse()?;
    validate_identifier_syn(kind, &value.value(), value.span())?;
    Ok(value.value())
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

fn type_arguments(ty: &Type) -> Option<(String, Vec<&Type>)> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    let arguments = match &segment.arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Some((segment.ident.to_string(), arguments))
}

/// Strip `Option` and `Box` wrappers
pub fn unwrap_option(ty: &Type) -> &Type {
    match type_arguments(ty) {
        Some((name, args)) if (name == "Option" || name == "Box") && args.len() == 1 => {
            unwrap_option(args[0])
        }
        _ => ty,
    }
}

/// Collection kind and element type; maps yield their value type
pub fn collection_of(ty: &Type) -> Option<(CollectionKind, Type)> {
    let (name, args) = type_arguments(ty)?;
    match (name.as_str(), args.as_slice()) {
        ("Vec" | "VecDeque" | "LinkedList", [element]) => {
            Some((CollectionKind::List, unwrap_option(element).clone()))
        }
        ("HashSet" | "BTreeSet", [element]) => {
            Some((CollectionKind::Set, unwrap_option(element).clone()))
        }
        ("HashMap" | "BTreeMap", [_, value]) => {
            Some((CollectionKind::Map, unwrap_option(value).clone()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;
    use syn::parse_quote;

    fn type_string(ty: &Type) -> String {
        quote!(#ty).to_string().replace(' ', "")
    }

    #[test]
    fn test_valid_identifiers() {
        for name in ["users", "user_profiles", "_private", "table123", "a", "select"] {
            assert!(validate_identifier(name).is_ok(), "{} should be valid", name);
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        for name in [
            "",
            "123table",
            "user-table",
            "users; DROP TABLE users; --",
            "users' OR '1'='1",
        ] {
            assert!(validate_identifier(name).is_err(), "{} should be invalid", name);
        }
        assert!(validate_identifier(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_parse_entity() {
        let input: DeriveInput = parse_quote! {
            #[table(name = "people")]
            struct Person {
                #[id]
                id: i64,
                #[column(name = "THE_NAME")]
                name: String,
                #[embedded(prefix = "home_")]
                home: Address,
                #[reference(reverse_column = "owner")]
                address: Option<Address>,
                #[collection(key_column = "position")]
                phones: Vec<Phone>,
                #[transient]
                scratch: String,
            }
        };

        let entity = parse_entity(&input).unwrap();
        assert_eq!(entity.name, "Person");
        assert_eq!(entity.table.as_deref(), Some("people"));

        let names: Vec<_> = entity.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["id", "name", "home", "address", "phones"]);

        assert!(entity.properties[0].id);
        assert_eq!(entity.properties[1].column.as_deref(), Some("THE_NAME"));
        assert!(matches!(
            &entity.properties[2].kind,
            PropertyKind::Embedded { prefix, .. } if prefix == "home_"
        ));
        match &entity.properties[3].kind {
            PropertyKind::Reference(ty) => assert_eq!(type_string(ty), "Address"),
            _ => panic!("expected a reference"),
        }
        assert_eq!(entity.properties[3].reverse_column.as_deref(), Some("owner"));
        match &entity.properties[4].kind {
            PropertyKind::Collection { kind, element } => {
                assert_eq!(*kind, CollectionKind::List);
                assert_eq!(type_string(element), "Phone");
            }
            _ => panic!("expected a collection"),
        }
        assert_eq!(entity.properties[4].key_column.as_deref(), Some("position"));
    }

    #[test]
    fn test_table_is_optional() {
        let input: DeriveInput = parse_quote! {
            struct r#Type { value: String, vec_of_text: Vec<String> }
        };

        let entity = parse_entity(&input).unwrap();
        assert_eq!(entity.name, "Type");
        assert!(entity.table.is_none());
        assert!(entity
            .properties
            .iter()
            .all(|p| matches!(p.kind, PropertyKind::Simple)));
    }

    #[test]
    fn test_collection_kinds() {
        let list: Type = parse_quote!(std::collections::VecDeque<Item>);
        let set: Type = parse_quote!(BTreeSet<Item>);
        let map: Type = parse_quote!(HashMap<String, Option<Item>>);

        assert_eq!(collection_of(&list).map(|c| c.0), Some(CollectionKind::List));
        assert_eq!(collection_of(&set).map(|c| c.0), Some(CollectionKind::Set));

        let (kind, element) = collection_of(&map).unwrap();
        assert_eq!(kind, CollectionKind::Map);
        assert_eq!(type_string(&element), "Item");

        let plain: Type = parse_quote!(Item);
        assert!(collection_of(&plain).is_none());
    }

    #[test]
    fn test_unwrap_option() {
        let ty: Type = parse_quote!(Option<Box<Address>>);
        assert_eq!(type_string(unwrap_option(&ty)), "Address");
    }

    #[test]
    fn test_rejects_invalid_input() {
        let cases: Vec<DeriveInput> = vec![
            parse_quote! { struct Tuple(i64); },
            parse_quote! { enum Kind { A } },
            parse_quote! { struct Generic<T> { value: T } },
            parse_quote! { #[table(name = "bad table")] struct Bad { id: i64 } },
            parse_quote! { struct TwoIds { #[id] a: i64, #[id] b: i64 } },
            parse_quote! { struct Both { #[embedded] #[reference] a: Address } },
            parse_quote! { struct NotCollection { #[collection] a: Address } },
            parse_quote! { struct EntityId { #[id] #[reference] a: Address } },
            parse_quote! { struct BadColumn { #[column(name = "1st")] a: i64 } },
        ];

        for input in cases {
            assert!(parse_entity(&input).is_err(), "{} should be rejected", input.ident);
        }
    }
}
