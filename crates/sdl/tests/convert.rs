//! End-to-end tests for the import, print and strip pipeline.

use graphql_sdl::{
    convert, convert_with, import_introspection, print_schema, strip_descriptions,
    ConvertError, ConvertOptions, TypeDefinition,
};
use serde_json::json;

const STARWARS: &str = include_str!("fixtures/starwars.json");

#[test]
fn test_printed_schema_keeps_descriptions() {
    let model = import_introspection(STARWARS).unwrap();
    let sdl = print_schema(&model).unwrap();

    insta::assert_snapshot!(sdl, @r#"
"""Cache hints"""
directive @cacheControl(maxAge: Int) on FIELD_DEFINITION | OBJECT

directive @tag(name: String!) repeatable on OBJECT

"""The query root"""
type Query {
  node(id: ID!): Node
  search(
    term: String!
    """Maximum results"""
    limit: Int = 10
  ): [SearchResult!]!
}

"""An object with an ID"""
interface Node {
  id: ID!
}

type Human implements Node {
  """The id"""
  id: ID!
  name: String
  homePlanet: String @deprecated
}

"""Things you can find"""
union SearchResult = Human

"""
A film
from the saga
"""
enum Episode {
  """Released in 1977."""
  NEWHOPE
  EMPIRE
  JEDI @deprecated(reason: "Not canon")
}

input ReviewInput {
  stars: Int!
  """Optional text"""
  commentary: String
}

type Mutation {
  createReview(episode: Episode, review: ReviewInput!): Int
}

"""ISO-8601"""
scalar DateTime @specifiedBy(url: "https://scalars.graphql.org/andimarek/date-time")
"#);
}

#[test]
fn test_converted_schema_has_no_descriptions() {
    let sdl = convert(STARWARS).unwrap();

    insta::assert_snapshot!(sdl, @r#"
directive @cacheControl(maxAge: Int) on FIELD_DEFINITION | OBJECT

directive @tag(name: String!) repeatable on OBJECT

type Query {
  node(id: ID!): Node
  search(
    term: String!
    limit: Int = 10
  ): [SearchResult!]!
}

interface Node {
  id: ID!
}

type Human implements Node {
  id: ID!
  name: String
  homePlanet: String @deprecated
}

union SearchResult = Human

enum Episode {
  NEWHOPE
  EMPIRE
  JEDI @deprecated(reason: "Not canon")
}

input ReviewInput {
  stars: Int!
  commentary: String
}

type Mutation {
  createReview(episode: Episode, review: ReviewInput!): Int
}

scalar DateTime @specifiedBy(url: "https://scalars.graphql.org/andimarek/date-time")
"#);
}

#[test]
fn test_every_element_survives_conversion() {
    let model = import_introspection(STARWARS).unwrap();
    let sdl = convert(STARWARS).unwrap();

    for type_def in model.types() {
        let name = type_def.name();
        if name.starts_with("__") || ["ID", "String", "Int", "Boolean"].contains(&name) {
            continue;
        }
        assert!(sdl.contains(name), "missing type {name}");

        match type_def {
            TypeDefinition::Object(t) => {
                for field in &t.fields {
                    assert!(sdl.contains(&format!("  {}", field.name)), "missing {name}.{}", field.name);
                    for arg in &field.arguments {
                        assert!(sdl.contains(&format!("{}: {}", arg.name, arg.ty)));
                    }
                }
            }
            TypeDefinition::Interface(t) => {
                for field in &t.fields {
                    assert!(sdl.contains(&format!("  {}: {}", field.name, field.ty)), "missing {name}.{}", field.name);
                }
            }
            TypeDefinition::Union(t) => {
                assert!(sdl.contains(&format!("union {name} = {}", t.members.join(" | "))));
            }
            TypeDefinition::Enum(t) => {
                for value in &t.values {
                    assert!(sdl.contains(&format!("  {}", value.name)));
                }
            }
            TypeDefinition::InputObject(t) => {
                for field in &t.fields {
                    assert!(sdl.contains(&format!("  {}: {}", field.name, field.ty)));
                }
            }
            TypeDefinition::Scalar(_) => {}
        }
    }

    let custom_directives = model
        .directives
        .iter()
        .filter(|d| !["include", "skip", "deprecated", "specifiedBy", "oneOf"].contains(&d.name.as_str()));
    for directive in custom_directives {
        assert!(sdl.contains(&format!("directive @{}", directive.name)), "missing @{}", directive.name);
        for arg in &directive.arguments {
            assert!(sdl.contains(&format!("{}: {}", arg.name, arg.ty)), "missing @{}({})", directive.name, arg.name);
        }
    }
    assert!(sdl.contains("directive @cacheControl"));
    assert!(sdl.contains("directive @tag"));
}

#[test]
fn test_conversion_is_deterministic() {
    assert_eq!(convert(STARWARS).unwrap(), convert(STARWARS).unwrap());
}

#[test]
fn test_stripping_only_removes_description_lines() {
    let model = import_introspection(STARWARS).unwrap();
    let documented = print_schema(&model).unwrap();
    let stripped = strip_descriptions(&documented);

    assert!(!stripped.contains("\"\"\""));
    assert_eq!(strip_descriptions(&stripped), stripped);

    // Every stripped line appears, in order, among the documented lines.
    let mut documented_lines = documented.lines();
    for line in stripped.lines() {
        assert!(
            documented_lines.any(|candidate| candidate == line),
            "line not found in printed schema: {line:?}"
        );
    }
}

#[test]
fn test_keep_descriptions_option() {
    let options = ConvertOptions {
        strip_descriptions: false,
    };
    let sdl = convert_with(STARWARS, &options).unwrap();
    assert!(sdl.contains("\"\"\"The query root\"\"\"\ntype Query {"));
}

#[test]
fn test_single_documented_field() {
    let json = json!({
        "data": {
            "__schema": {
                "queryType": null,
                "mutationType": null,
                "subscriptionType": null,
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Foo",
                        "description": null,
                        "interfaces": [],
                        "fields": [{
                            "name": "bar",
                            "description": "a bar field",
                            "args": [],
                            "type": { "kind": "SCALAR", "name": "String", "ofType": null },
                            "isDeprecated": false,
                            "deprecationReason": null
                        }]
                    },
                    { "kind": "SCALAR", "name": "String", "description": null }
                ],
                "directives": []
            }
        }
    })
    .to_string();

    let printed = print_schema(&import_introspection(&json).unwrap()).unwrap();
    assert!(printed.contains("\"\"\"a bar field\"\"\"\n  bar: String"), "{printed}");

    assert_eq!(convert(&json).unwrap(), "type Foo {\n  bar: String\n}");
}

#[test]
fn test_description_ending_in_triple_quotes_is_stripped() {
    let field = |name: &str, description: Option<&str>| {
        json!({
            "name": name,
            "description": description,
            "args": [],
            "type": { "kind": "SCALAR", "name": "String", "ofType": null },
            "isDeprecated": false,
            "deprecationReason": null
        })
    };
    let json = json!({
        "data": {
            "__schema": {
                "queryType": null,
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Foo",
                        "description": null,
                        "interfaces": [],
                        "fields": [
                            field("a", Some(" quote: \"\"\"")),
                            field("b", Some("two\nlines")),
                            field("c", None)
                        ]
                    },
                    { "kind": "SCALAR", "name": "String", "description": null }
                ],
                "directives": []
            }
        }
    })
    .to_string();

    let printed = print_schema(&import_introspection(&json).unwrap()).unwrap();
    assert!(printed.contains("  \"\"\" quote: \\\"\"\"\n  \"\"\"\n  a: String"), "{printed}");

    assert_eq!(
        convert(&json).unwrap(),
        "type Foo {\n  a: String\n  b: String\n  c: String\n}"
    );
}

#[test]
fn test_custom_root_names_print_schema_definition() {
    let json = json!({
        "data": {
            "__schema": {
                "queryType": { "name": "RootQuery" },
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "RootQuery",
                        "description": null,
                        "interfaces": [],
                        "fields": [{
                            "name": "ok",
                            "description": null,
                            "args": [],
                            "type": { "kind": "SCALAR", "name": "Boolean", "ofType": null },
                            "isDeprecated": false,
                            "deprecationReason": null
                        }]
                    },
                    { "kind": "SCALAR", "name": "Boolean", "description": null }
                ]
            }
        }
    })
    .to_string();

    assert_eq!(
        convert(&json).unwrap(),
        "schema {\n  query: RootQuery\n}\n\ntype RootQuery {\n  ok: Boolean\n}"
    );
}

#[test]
fn test_missing_schema_fails_with_shape_error() {
    let err = convert(r#"{"data": {}}"#).unwrap_err();
    assert!(matches!(err, ConvertError::SchemaShape(_)), "{err}");
}

#[test]
fn test_invalid_json_fails_with_parse_error() {
    let err = convert("").unwrap_err();
    assert!(matches!(err, ConvertError::Parse(_)), "{err}");
}
