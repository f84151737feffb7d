//! Introspection import: JSON text to [`SchemaModel`].
//!
//! Parsing happens in two steps so that invalid JSON and well-formed JSON of
//! the wrong shape surface as different errors. Once the payload deserializes,
//! every type reference is resolved against the declared type list before the
//! model is returned.

use crate::error::{ConvertError, Result};
use crate::model::{
    Deprecation, DirectiveDefinition, DirectiveLocation, EnumType, EnumValueDefinition,
    FieldDefinition, InputObjectType, InputValueDefinition, InterfaceType, ObjectType,
    ScalarType, SchemaModel, TypeDefinition, TypeRef, UnionType,
};
use crate::types::{
    IntrospectionDirective, IntrospectionField, IntrospectionInputValue, IntrospectionPayload,
    IntrospectionType, IntrospectionTypeRef, IntrospectionTypeRefFull, TypeKind,
};
use std::collections::HashMap;

/// Parses introspection JSON text and imports it into a [`SchemaModel`].
///
/// # Errors
///
/// - [`ConvertError::Parse`] if `json` is not valid JSON
/// - [`ConvertError::SchemaShape`] if the JSON is not an introspection result
///   (for example `{"data": {}}`) or references a type that is not declared
#[tracing::instrument(skip(json), fields(size = json.len()))]
pub fn import_introspection(json: &str) -> Result<SchemaModel> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ConvertError::Parse(e.to_string()))?;
    let payload: IntrospectionPayload =
        serde_json::from_value(value).map_err(|e| ConvertError::SchemaShape(e.to_string()))?;
    import_payload(payload)
}

/// Imports an already deserialized payload into a [`SchemaModel`].
#[tracing::instrument(skip(payload), fields(types = payload.data.schema.types.len()))]
pub fn import_payload(payload: IntrospectionPayload) -> Result<SchemaModel> {
    let schema = payload.data.schema;

    let mut kinds = HashMap::with_capacity(schema.types.len());
    for type_def in &schema.types {
        if kinds
            .insert(type_def.name().to_string(), declared_kind(type_def))
            .is_some()
        {
            return Err(shape(format!(
                "type `{}` is declared more than once",
                type_def.name()
            )));
        }
    }
    let importer = Importer { kinds };

    let mut model = SchemaModel::new();
    model.description = schema.description;
    model.query_type = importer.root(schema.query_type, "query")?;
    model.mutation_type = importer.root(schema.mutation_type, "mutation")?;
    model.subscription_type = importer.root(schema.subscription_type, "subscription")?;

    for type_def in schema.types {
        let definition = importer.type_definition(type_def)?;
        model.insert_type(definition);
    }

    model.directives = schema
        .directives
        .unwrap_or_default()
        .into_iter()
        .map(|directive| importer.directive(directive))
        .collect::<Result<_>>()?;

    tracing::debug!(
        types = model.type_count(),
        directives = model.directives.len(),
        "Introspection imported"
    );
    Ok(model)
}

fn shape(message: String) -> ConvertError {
    ConvertError::SchemaShape(message)
}

fn declared_kind(type_def: &IntrospectionType) -> TypeKind {
    match type_def {
        IntrospectionType::Scalar(_) => TypeKind::Scalar,
        IntrospectionType::Object(_) => TypeKind::Object,
        IntrospectionType::Interface(_) => TypeKind::Interface,
        IntrospectionType::Union(_) => TypeKind::Union,
        IntrospectionType::Enum(_) => TypeKind::Enum,
        IntrospectionType::InputObject(_) => TypeKind::InputObject,
    }
}

/// A deprecated element with no reason still gets a bare `@deprecated`,
/// unlike graphql-js `printSchema`, which prints nothing in that case.
fn deprecation(is_deprecated: bool, reason: Option<String>) -> Option<Deprecation> {
    (is_deprecated || reason.is_some()).then_some(Deprecation { reason })
}

#[derive(Debug, Clone, Copy)]
enum Position {
    Input,
    Output,
}

struct Importer {
    kinds: HashMap<String, TypeKind>,
}

impl Importer {
    fn resolve(&self, name: &str, context: &str) -> Result<TypeKind> {
        self.kinds.get(name).copied().ok_or_else(|| {
            shape(format!(
                "unknown type `{name}` referenced by {context}; \
                 ensure that a full introspection query is used"
            ))
        })
    }

    fn expect_kind(&self, name: &str, expected: TypeKind, context: &str) -> Result<()> {
        let kind = self.resolve(name, context)?;
        if kind == expected {
            Ok(())
        } else {
            Err(shape(format!(
                "{context} must reference {} type, but `{name}` is {}",
                kind_label(expected),
                kind_label(kind)
            )))
        }
    }

    fn root(&self, root: Option<IntrospectionTypeRef>, operation: &str) -> Result<Option<String>> {
        let Some(root) = root else {
            return Ok(None);
        };
        self.expect_kind(
            &root.name,
            TypeKind::Object,
            &format!("the {operation} root"),
        )?;
        Ok(Some(root.name))
    }

    fn named_list(
        &self,
        refs: Vec<IntrospectionTypeRef>,
        expected: TypeKind,
        context: &str,
    ) -> Result<Vec<String>> {
        refs.into_iter()
            .map(|r| -> Result<String> {
                self.expect_kind(&r.name, expected, context)?;
                Ok(r.name)
            })
            .collect()
    }

    fn type_definition(&self, type_def: IntrospectionType) -> Result<TypeDefinition> {
        let definition = match type_def {
            IntrospectionType::Scalar(t) => TypeDefinition::Scalar(ScalarType {
                name: t.name,
                description: t.description,
                specified_by_url: t.specified_by_url,
            }),
            IntrospectionType::Object(t) => {
                let context = format!("the interfaces of `{}`", t.name);
                TypeDefinition::Object(ObjectType {
                    interfaces: self.named_list(t.interfaces, TypeKind::Interface, &context)?,
                    fields: self.fields(&t.name, t.fields)?,
                    name: t.name,
                    description: t.description,
                })
            }
            IntrospectionType::Interface(t) => {
                let context = format!("the interfaces of `{}`", t.name);
                TypeDefinition::Interface(InterfaceType {
                    interfaces: self.named_list(
                        t.interfaces.unwrap_or_default(),
                        TypeKind::Interface,
                        &context,
                    )?,
                    fields: self.fields(&t.name, t.fields)?,
                    name: t.name,
                    description: t.description,
                })
            }
            IntrospectionType::Union(t) => {
                let context = format!("the members of union `{}`", t.name);
                TypeDefinition::Union(UnionType {
                    members: self.named_list(t.possible_types, TypeKind::Object, &context)?,
                    name: t.name,
                    description: t.description,
                })
            }
            IntrospectionType::Enum(t) => TypeDefinition::Enum(EnumType {
                values: t
                    .enum_values
                    .into_iter()
                    .map(|value| EnumValueDefinition {
                        deprecation: deprecation(value.is_deprecated, value.deprecation_reason),
                        name: value.name,
                        description: value.description,
                    })
                    .collect(),
                name: t.name,
                description: t.description,
            }),
            IntrospectionType::InputObject(t) => {
                let fields = t
                    .input_fields
                    .into_iter()
                    .map(|field| {
                        let context = format!("input field `{}.{}`", t.name, field.name);
                        self.input_value(field, &context)
                    })
                    .collect::<Result<_>>()?;
                TypeDefinition::InputObject(InputObjectType {
                    fields,
                    one_of: t.is_one_of.unwrap_or(false),
                    name: t.name,
                    description: t.description,
                })
            }
        };
        Ok(definition)
    }

    fn fields(
        &self,
        parent: &str,
        fields: Vec<IntrospectionField>,
    ) -> Result<Vec<FieldDefinition>> {
        fields
            .into_iter()
            .map(|field| -> Result<FieldDefinition> {
                let context = format!("field `{parent}.{}`", field.name);
                let arguments = field
                    .args
                    .into_iter()
                    .map(|arg| {
                        let context = format!("argument `{parent}.{}({}:)`", field.name, arg.name);
                        self.input_value(arg, &context)
                    })
                    .collect::<Result<_>>()?;
                Ok(FieldDefinition {
                    ty: self.type_ref(&field.type_ref, Position::Output, &context)?,
                    arguments,
                    deprecation: deprecation(field.is_deprecated, field.deprecation_reason),
                    name: field.name,
                    description: field.description,
                })
            })
            .collect()
    }

    fn input_value(
        &self,
        value: IntrospectionInputValue,
        context: &str,
    ) -> Result<InputValueDefinition> {
        Ok(InputValueDefinition {
            ty: self.type_ref(&value.type_ref, Position::Input, context)?,
            deprecation: deprecation(
                value.is_deprecated.unwrap_or(false),
                value.deprecation_reason,
            ),
            name: value.name,
            description: value.description,
            default_value: value.default_value,
        })
    }

    fn directive(&self, directive: IntrospectionDirective) -> Result<DirectiveDefinition> {
        let locations = directive
            .locations
            .iter()
            .map(|raw| {
                raw.parse::<DirectiveLocation>()
                    .map_err(|e| shape(format!("{e} on directive `@{}`", directive.name)))
            })
            .collect::<Result<_>>()?;
        let arguments = directive
            .args
            .into_iter()
            .map(|arg| {
                let context = format!("argument `@{}({}:)`", directive.name, arg.name);
                self.input_value(arg, &context)
            })
            .collect::<Result<_>>()?;

        Ok(DirectiveDefinition {
            name: directive.name,
            description: directive.description,
            arguments,
            repeatable: directive.is_repeatable.unwrap_or(false),
            locations,
        })
    }

    fn type_ref(
        &self,
        raw: &IntrospectionTypeRefFull,
        position: Position,
        context: &str,
    ) -> Result<TypeRef> {
        match raw.kind {
            TypeKind::List => {
                let inner = raw
                    .of_type
                    .as_deref()
                    .ok_or_else(|| shape(format!("list type without `ofType` in {context}")))?;
                Ok(TypeRef::List(Box::new(
                    self.type_ref(inner, position, context)?,
                )))
            }
            TypeKind::NonNull => {
                let inner = raw.of_type.as_deref().ok_or_else(|| {
                    shape(format!("non-null type without `ofType` in {context}"))
                })?;
                if inner.kind == TypeKind::NonNull {
                    return Err(shape(format!("non-null of non-null type in {context}")));
                }
                Ok(TypeRef::NonNull(Box::new(
                    self.type_ref(inner, position, context)?,
                )))
            }
            _ => {
                let name = raw
                    .name
                    .as_deref()
                    .ok_or_else(|| shape(format!("named type without a name in {context}")))?;
                let kind = self.resolve(name, context)?;
                let allowed = match position {
                    Position::Output => kind != TypeKind::InputObject,
                    Position::Input => matches!(
                        kind,
                        TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject
                    ),
                };
                if !allowed {
                    let expected = match position {
                        Position::Output => "an output",
                        Position::Input => "an input",
                    };
                    return Err(shape(format!(
                        "{context} must have {expected} type, but `{name}` is {}",
                        kind_label(kind)
                    )));
                }
                Ok(TypeRef::Named(name.to_string()))
            }
        }
    }
}

fn kind_label(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Scalar => "a scalar",
        TypeKind::Object => "an object",
        TypeKind::Interface => "an interface",
        TypeKind::Union => "a union",
        TypeKind::Enum => "an enum",
        TypeKind::InputObject => "an input object",
        TypeKind::List => "a list",
        TypeKind::NonNull => "a non-null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn named(kind: &str, name: &str) -> Value {
        json!({ "kind": kind, "name": name, "ofType": null })
    }

    fn non_null(inner: Value) -> Value {
        json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
    }

    fn payload(types: Value) -> String {
        json!({
            "data": {
                "__schema": {
                    "queryType": { "name": "Query" },
                    "mutationType": null,
                    "subscriptionType": null,
                    "types": types,
                    "directives": []
                }
            }
        })
        .to_string()
    }

    fn string_scalar() -> Value {
        json!({ "kind": "SCALAR", "name": "String", "description": null })
    }

    fn query_with_field(field_type: Value) -> Value {
        json!({
            "kind": "OBJECT",
            "name": "Query",
            "description": null,
            "interfaces": [],
            "fields": [{
                "name": "value",
                "description": null,
                "args": [],
                "type": field_type,
                "isDeprecated": false,
                "deprecationReason": null
            }]
        })
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = import_introspection("{ not json").unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)), "{err}");
    }

    #[test]
    fn test_missing_schema_is_shape_error() {
        let err = import_introspection(r#"{"data": {}}"#).unwrap_err();
        assert!(matches!(err, ConvertError::SchemaShape(_)), "{err}");
        assert!(err.to_string().contains("__schema"));
    }

    #[test]
    fn test_imports_field_types() {
        let json = payload(json!([
            query_with_field(non_null(named("SCALAR", "String"))),
            string_scalar()
        ]));
        let model = import_introspection(&json).unwrap();

        assert_eq!(model.query_type.as_deref(), Some("Query"));
        let Some(TypeDefinition::Object(query)) = model.get_type("Query") else {
            panic!("expected Query object");
        };
        assert_eq!(query.fields[0].ty.to_string(), "String!");
    }

    #[test]
    fn test_unknown_type_reference() {
        let json = payload(json!([query_with_field(named("OBJECT", "Missing"))]));
        let err = import_introspection(&json).unwrap_err();
        assert!(matches!(err, ConvertError::SchemaShape(_)));
        assert!(err.to_string().contains("`Missing`"), "{err}");
        assert!(err.to_string().contains("Query.value"), "{err}");
    }

    #[test]
    fn test_non_null_of_non_null_rejected() {
        let json = payload(json!([
            query_with_field(non_null(non_null(named("SCALAR", "String")))),
            string_scalar()
        ]));
        let err = import_introspection(&json).unwrap_err();
        assert!(err.to_string().contains("non-null of non-null"), "{err}");
    }

    #[test]
    fn test_wrapper_without_of_type_rejected() {
        let json = payload(json!([
            query_with_field(json!({ "kind": "LIST", "name": null, "ofType": null })),
            string_scalar()
        ]));
        let err = import_introspection(&json).unwrap_err();
        assert!(err.to_string().contains("without `ofType`"), "{err}");
    }

    #[test]
    fn test_input_object_in_output_position_rejected() {
        let json = payload(json!([
            query_with_field(named("INPUT_OBJECT", "Filter")),
            {
                "kind": "INPUT_OBJECT",
                "name": "Filter",
                "description": null,
                "inputFields": []
            }
        ]));
        let err = import_introspection(&json).unwrap_err();
        assert!(err.to_string().contains("output type"), "{err}");
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let json = payload(json!([
            query_with_field(named("SCALAR", "String")),
            string_scalar(),
            string_scalar()
        ]));
        let err = import_introspection(&json).unwrap_err();
        assert!(err.to_string().contains("more than once"), "{err}");
    }

    #[test]
    fn test_root_must_be_object() {
        let json = json!({
            "data": { "__schema": {
                "queryType": { "name": "String" },
                "types": [string_scalar()]
            }}
        })
        .to_string();
        let err = import_introspection(&json).unwrap_err();
        assert!(err.to_string().contains("query root"), "{err}");
    }

    #[test]
    fn test_union_member_must_be_object() {
        let json = payload(json!([
            query_with_field(named("SCALAR", "String")),
            string_scalar(),
            {
                "kind": "UNION",
                "name": "Result",
                "description": null,
                "possibleTypes": [{ "kind": "SCALAR", "name": "String" }]
            }
        ]));
        let err = import_introspection(&json).unwrap_err();
        assert!(err.to_string().contains("union `Result`"), "{err}");
    }

    #[test]
    fn test_unknown_directive_location() {
        let json = json!({
            "data": { "__schema": {
                "queryType": null,
                "types": [],
                "directives": [{
                    "name": "cached",
                    "description": null,
                    "locations": ["SOMEWHERE"],
                    "args": []
                }]
            }}
        })
        .to_string();
        let err = import_introspection(&json).unwrap_err();
        assert!(err.to_string().contains("SOMEWHERE"), "{err}");
    }

    #[test]
    fn test_deprecation_from_reason_or_flag() {
        assert_eq!(deprecation(false, None), None);
        assert_eq!(
            deprecation(true, None),
            Some(Deprecation { reason: None })
        );
        assert_eq!(
            deprecation(false, Some("gone".to_string())),
            Some(Deprecation {
                reason: Some("gone".to_string())
            })
        );
    }
}
