//! Text-level removal of description blocks from printed SDL.
//!
//! This works on the printer's output contract rather than on the schema
//! model: every description is a block string that starts its own line. Each
//! match removes whole lines, indentation and line break included, so the
//! remaining SDL has no blank lines or stray delimiters where descriptions were.

use regex::Regex;
use std::sync::LazyLock;

/// A line holding nothing but one block string that opens and closes on it.
///
/// The body is read the way the lexer reads block strings: a backslash
/// directly before `"""` always escapes it, and any other backslash is literal.
/// Each body atom is optionally preceded by up to two quotes and ends in either
/// a plain character or a `\"""` escape, so a backslash is never taken as
/// literal right before the closing delimiter and a match never spans two
/// descriptions.
static SINGLE_LINE_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*"""(?:"{0,2}(?:\\+"{0,2})*(?:[^"\\\n]|\\+"""))*"""[ \t]*(?:\r?\n|$)"#,
    )
    .expect("single-line description pattern is valid")
});

/// A line opening with `"""`, any following lines, and the first line that
/// holds only the closing `"""`.
static MULTI_LINE_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*"""[^\n]*\n(?:[^\n]*\n)*?[ \t]*"""[ \t]*(?:\r?\n|$)"#)
        .expect("multi-line description pattern is valid")
});

/// Removes every description block from `sdl`.
///
/// Single-line descriptions are removed first, then multi-line ones. Lines
/// that are not part of a description are returned unchanged, and applying
/// the function to its own output is a no-op.
///
/// # Examples
///
/// ```
/// # use graphql_sdl::strip_descriptions;
/// let sdl = "type Foo {\n  \"\"\"a bar field\"\"\"\n  bar: String\n}";
/// assert_eq!(strip_descriptions(sdl), "type Foo {\n  bar: String\n}");
/// ```
#[must_use]
#[tracing::instrument(skip(sdl), fields(size = sdl.len()))]
pub fn strip_descriptions(sdl: &str) -> String {
    let single_line_count = SINGLE_LINE_DESCRIPTION.find_iter(sdl).count();
    let without_single = SINGLE_LINE_DESCRIPTION.replace_all(sdl, "");

    let multi_line_count = MULTI_LINE_DESCRIPTION.find_iter(&without_single).count();
    let stripped = MULTI_LINE_DESCRIPTION
        .replace_all(&without_single, "")
        .into_owned();

    tracing::debug!(
        single_line = single_line_count,
        multi_line = multi_line_count,
        removed_bytes = sdl.len() - stripped.len(),
        "Descriptions stripped"
    );
    stripped
}
