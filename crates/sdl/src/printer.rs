//! SDL (Schema Definition Language) printing from a [`SchemaModel`].

use crate::error::{ConvertError, Result};
use crate::model::{
    Deprecation, DirectiveDefinition, FieldDefinition, InputValueDefinition, SchemaModel,
    TypeDefinition,
};
use std::collections::HashMap;
use std::fmt::Write;

/// Built-in GraphQL scalar types that should not be included in generated SDL.
const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

/// Directives every GraphQL service provides implicitly.
const BUILTIN_DIRECTIVES: &[&str] = &["skip", "include", "deprecated", "specifiedBy", "oneOf"];

/// Reason implied by a bare `@deprecated`.
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

const INDENT: &str = "  ";

/// Block strings longer than this are printed across several lines.
const MAX_SINGLE_LINE_DESCRIPTION: usize = 70;

/// Prints a [`SchemaModel`] as SDL.
///
/// Output is deterministic: the schema definition (only when the root
/// operation types are not named `Query`, `Mutation` and `Subscription`, or
/// the schema has a description), then custom directive definitions, then
/// type definitions, each group in the order the types were declared in the
/// introspection result. Definitions are separated by a blank line and the
/// text has no trailing newline.
///
/// Built-in scalars, introspection types (`__*`) and built-in directives are
/// omitted. Descriptions are printed as block strings.
///
/// # Errors
///
/// Returns [`ConvertError::Print`] if a type reference cannot be resolved or
/// interfaces implement each other in a cycle. Nothing is printed in that case.
#[tracing::instrument(skip(model), fields(
    types = model.type_count(),
    directives = model.directives.len()
))]
pub fn print_schema(model: &SchemaModel) -> Result<String> {
    check_references(model)?;
    check_interface_cycles(model)?;

    let mut definitions = Vec::new();

    let mut schema_def = String::new();
    if write_schema_definition(&mut schema_def, model)? {
        definitions.push(schema_def);
    }

    for directive in &model.directives {
        if BUILTIN_DIRECTIVES.contains(&directive.name.as_str()) {
            continue;
        }
        let mut sdl = String::new();
        write_directive(&mut sdl, directive)?;
        definitions.push(sdl);
    }

    for type_def in model.types() {
        let name = type_def.name();
        if name.starts_with("__") || BUILTIN_SCALARS.contains(&name) {
            continue;
        }
        let mut sdl = String::new();
        write_type(&mut sdl, type_def)?;
        definitions.push(sdl);
    }

    let sdl = definitions.join("\n\n");
    tracing::debug!(
        definitions_written = definitions.len(),
        sdl_length = sdl.len(),
        "SDL generation complete"
    );
    Ok(sdl)
}

fn unresolved(name: &str, context: &str) -> ConvertError {
    ConvertError::Print(format!("unresolved type `{name}` referenced by {context}"))
}

fn require_type<'a>(model: &'a SchemaModel, name: &str, context: &str) -> Result<&'a TypeDefinition> {
    model.get_type(name).ok_or_else(|| unresolved(name, context))
}

fn check_references(model: &SchemaModel) -> Result<()> {
    let roots = [
        ("query", &model.query_type),
        ("mutation", &model.mutation_type),
        ("subscription", &model.subscription_type),
    ];
    for (operation, root) in roots {
        if let Some(name) = root {
            let context = format!("the {operation} root");
            if !matches!(
                require_type(model, name, &context)?,
                TypeDefinition::Object(_)
            ) {
                return Err(ConvertError::Print(format!(
                    "{context} `{name}` is not an object type"
                )));
            }
        }
    }

    for type_def in model.types() {
        match type_def {
            TypeDefinition::Object(t) => {
                check_interfaces(model, &t.name, &t.interfaces)?;
                check_fields(model, &t.name, &t.fields)?;
            }
            TypeDefinition::Interface(t) => {
                check_interfaces(model, &t.name, &t.interfaces)?;
                check_fields(model, &t.name, &t.fields)?;
            }
            TypeDefinition::Union(t) => {
                let context = format!("union `{}`", t.name);
                for member in &t.members {
                    require_type(model, member, &context)?;
                }
            }
            TypeDefinition::InputObject(t) => {
                for field in &t.fields {
                    let context = format!("input field `{}.{}`", t.name, field.name);
                    require_type(model, field.ty.named_type(), &context)?;
                }
            }
            TypeDefinition::Scalar(_) | TypeDefinition::Enum(_) => {}
        }
    }

    for directive in &model.directives {
        for arg in &directive.arguments {
            let context = format!("argument `@{}({}:)`", directive.name, arg.name);
            require_type(model, arg.ty.named_type(), &context)?;
        }
    }

    Ok(())
}

fn check_interfaces(model: &SchemaModel, parent: &str, interfaces: &[String]) -> Result<()> {
    let context = format!("the interfaces of `{parent}`");
    for name in interfaces {
        if !matches!(
            require_type(model, name, &context)?,
            TypeDefinition::Interface(_)
        ) {
            return Err(ConvertError::Print(format!(
                "`{parent}` implements `{name}`, which is not an interface"
            )));
        }
    }
    Ok(())
}

fn check_fields(model: &SchemaModel, parent: &str, fields: &[FieldDefinition]) -> Result<()> {
    for field in fields {
        let context = format!("field `{parent}.{}`", field.name);
        require_type(model, field.ty.named_type(), &context)?;
        for arg in &field.arguments {
            let context = format!("argument `{parent}.{}({}:)`", field.name, arg.name);
            require_type(model, arg.ty.named_type(), &context)?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

fn check_interface_cycles(model: &SchemaModel) -> Result<()> {
    let mut visits = HashMap::new();
    for type_def in model.types() {
        if let TypeDefinition::Interface(t) = type_def {
            visit_interface(model, &t.name, &mut visits, &mut Vec::new())?;
        }
    }
    Ok(())
}

fn visit_interface<'a>(
    model: &'a SchemaModel,
    name: &'a str,
    visits: &mut HashMap<&'a str, Visit>,
    path: &mut Vec<&'a str>,
) -> Result<()> {
    match visits.get(name) {
        Some(Visit::Done) => return Ok(()),
        Some(Visit::InProgress) => {
            path.push(name);
            return Err(ConvertError::Print(format!(
                "interface implementation cycle: {}",
                path.join(" -> ")
            )));
        }
        None => {}
    }

    visits.insert(name, Visit::InProgress);
    path.push(name);
    if let Some(TypeDefinition::Interface(t)) = model.get_type(name) {
        for parent in &t.interfaces {
            visit_interface(model, parent, visits, path)?;
        }
    }
    path.pop();
    visits.insert(name, Visit::Done);
    Ok(())
}

/// Writes the `schema { ... }` block when it carries information.
fn write_schema_definition(sdl: &mut String, model: &SchemaModel) -> Result<bool> {
    let roots = [
        ("query", model.query_type.as_deref(), "Query"),
        ("mutation", model.mutation_type.as_deref(), "Mutation"),
        ("subscription", model.subscription_type.as_deref(), "Subscription"),
    ];

    let has_roots = roots.iter().any(|(_, name, _)| name.is_some());
    let conventional = roots
        .iter()
        .all(|(_, name, default)| name.is_none_or(|name| name == *default));
    if !has_roots || (conventional && model.description.is_none()) {
        return Ok(false);
    }

    write_description(sdl, model.description.as_deref(), "")?;
    sdl.push_str("schema {\n");
    for (operation, name, _) in roots {
        if let Some(name) = name {
            writeln!(sdl, "{INDENT}{operation}: {name}")?;
        }
    }
    sdl.push('}');
    Ok(true)
}

fn write_directive(sdl: &mut String, directive: &DirectiveDefinition) -> Result<()> {
    write_description(sdl, directive.description.as_deref(), "")?;
    write!(sdl, "directive @{}", directive.name)?;
    write_arguments(sdl, &directive.arguments, "")?;
    if directive.repeatable {
        sdl.push_str(" repeatable");
    }
    sdl.push_str(" on ");
    let locations: Vec<_> = directive.locations.iter().map(|l| l.as_str()).collect();
    sdl.push_str(&locations.join(" | "));
    Ok(())
}

fn write_type(sdl: &mut String, type_def: &TypeDefinition) -> Result<()> {
    write_description(sdl, type_def.description(), "")?;
    match type_def {
        TypeDefinition::Scalar(t) => {
            write!(sdl, "scalar {}", t.name)?;
            if let Some(url) = &t.specified_by_url {
                write!(sdl, " @specifiedBy(url: {})", string_literal(url))?;
            }
        }
        TypeDefinition::Object(t) => {
            write!(sdl, "type {}", t.name)?;
            write_implements(sdl, &t.interfaces);
            write_fields(sdl, &t.fields)?;
        }
        TypeDefinition::Interface(t) => {
            write!(sdl, "interface {}", t.name)?;
            write_implements(sdl, &t.interfaces);
            write_fields(sdl, &t.fields)?;
        }
        TypeDefinition::Union(t) => {
            write!(sdl, "union {}", t.name)?;
            if !t.members.is_empty() {
                write!(sdl, " = {}", t.members.join(" | "))?;
            }
        }
        TypeDefinition::Enum(t) => {
            write!(sdl, "enum {}", t.name)?;
            if !t.values.is_empty() {
                sdl.push_str(" {\n");
                for value in &t.values {
                    write_description(sdl, value.description.as_deref(), INDENT)?;
                    write!(sdl, "{INDENT}{}", value.name)?;
                    write_deprecated(sdl, value.deprecation.as_ref())?;
                    sdl.push('\n');
                }
                sdl.push('}');
            }
        }
        TypeDefinition::InputObject(t) => {
            write!(sdl, "input {}", t.name)?;
            if t.one_of {
                sdl.push_str(" @oneOf");
            }
            if !t.fields.is_empty() {
                sdl.push_str(" {\n");
                for field in &t.fields {
                    write_description(sdl, field.description.as_deref(), INDENT)?;
                    sdl.push_str(INDENT);
                    write_input_value(sdl, field)?;
                    sdl.push('\n');
                }
                sdl.push('}');
            }
        }
    }
    Ok(())
}

fn write_implements(sdl: &mut String, interfaces: &[String]) {
    if !interfaces.is_empty() {
        sdl.push_str(" implements ");
        sdl.push_str(&interfaces.join(" & "));
    }
}

fn write_fields(sdl: &mut String, fields: &[FieldDefinition]) -> Result<()> {
    if fields.is_empty() {
        return Ok(());
    }
    sdl.push_str(" {\n");
    for field in fields {
        write_field(sdl, field)?;
    }
    sdl.push('}');
    Ok(())
}

fn write_field(sdl: &mut String, field: &FieldDefinition) -> Result<()> {
    write_description(sdl, field.description.as_deref(), INDENT)?;
    write!(sdl, "{INDENT}{}", field.name)?;
    write_arguments(sdl, &field.arguments, INDENT)?;
    write!(sdl, ": {}", field.ty)?;
    write_deprecated(sdl, field.deprecation.as_ref())?;
    sdl.push('\n');
    Ok(())
}

/// Writes an argument list. Arguments stay on one line unless one of them
/// has a description, in which case each goes on its own line.
fn write_arguments(sdl: &mut String, args: &[InputValueDefinition], indent: &str) -> Result<()> {
    if args.is_empty() {
        return Ok(());
    }

    if args.iter().all(|arg| arg.description.is_none()) {
        sdl.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                sdl.push_str(", ");
            }
            write_input_value(sdl, arg)?;
        }
        sdl.push(')');
        return Ok(());
    }

    let arg_indent = format!("{indent}{INDENT}");
    sdl.push_str("(\n");
    for arg in args {
        write_description(sdl, arg.description.as_deref(), &arg_indent)?;
        sdl.push_str(&arg_indent);
        write_input_value(sdl, arg)?;
        sdl.push('\n');
    }
    write!(sdl, "{indent})")?;
    Ok(())
}

fn write_input_value(sdl: &mut String, value: &InputValueDefinition) -> Result<()> {
    write!(sdl, "{}: {}", value.name, value.ty)?;
    if let Some(default) = &value.default_value {
        write!(sdl, " = {default}")?;
    }
    write_deprecated(sdl, value.deprecation.as_ref())
}

fn write_deprecated(sdl: &mut String, deprecation: Option<&Deprecation>) -> Result<()> {
    match deprecation {
        None => {}
        Some(Deprecation {
            reason: Some(reason),
        }) if reason != DEFAULT_DEPRECATION_REASON => {
            write!(sdl, " @deprecated(reason: {})", string_literal(reason))?;
        }
        Some(_) => sdl.push_str(" @deprecated"),
    }
    Ok(())
}

fn write_description(sdl: &mut String, description: Option<&str>, indent: &str) -> Result<()> {
    if let Some(desc) = description {
        let block = block_string(desc).replace('\n', &format!("\n{indent}"));
        writeln!(sdl, "{indent}{block}")?;
    }
    Ok(())
}

/// Formats `value` as a GraphQL block string (`"""..."""`).
///
/// Short single-line values stay on one line. Anything else puts the
/// delimiters on their own lines.
fn block_string(value: &str) -> String {
    let value = value.replace("\r\n", "\n").replace('\r', "\n");
    let escaped = value.replace("\"\"\"", "\\\"\"\"");

    let lines: Vec<&str> = value.split('\n').collect();
    let is_single_line = lines.len() == 1;
    let starts_with_blank = |line: &str| line.starts_with([' ', '\t']);

    let force_leading_newline = lines.len() > 1
        && lines[1..]
            .iter()
            .all(|line| line.is_empty() || starts_with_blank(line));
    let has_trailing_triple_quotes = escaped.ends_with("\\\"\"\"");
    let has_trailing_quote = value.ends_with('"') && !has_trailing_triple_quotes;
    let has_trailing_slash = value.ends_with('\\');
    let force_trailing_newline = has_trailing_quote || has_trailing_slash;

    let multiple_lines = !is_single_line
        || value.chars().count() > MAX_SINGLE_LINE_DESCRIPTION
        || force_trailing_newline
        || force_leading_newline
        || has_trailing_triple_quotes;
    let skip_leading_newline = is_single_line && starts_with_blank(&value);

    let mut block = String::from("\"\"\"");
    if (multiple_lines && !skip_leading_newline) || force_leading_newline {
        block.push('\n');
    }
    block.push_str(&escaped);
    if multiple_lines || force_trailing_newline {
        block.push('\n');
    }
    block.push_str("\"\"\"");
    block
}

/// Formats `value` as a quoted GraphQL string literal.
fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\u{8}' => literal.push_str("\\b"),
            '\t' => literal.push_str("\\t"),
            '\n' => literal.push_str("\\n"),
            '\u{c}' => literal.push_str("\\f"),
            '\r' => literal.push_str("\\r"),
            c if c.is_control() => {
                literal.push_str(&format!("\\u{:04X}", u32::from(c)));
            }
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
