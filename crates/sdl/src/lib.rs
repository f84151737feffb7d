//! GraphQL introspection results to description-free SDL.
//!
//! The conversion is a straight pipeline of three independent stages:
//!
//! 1. [`import_introspection`] parses introspection JSON into a [`SchemaModel`]
//! 2. [`print_schema`] prints the model as SDL
//! 3. [`strip_descriptions`] removes every description block from the text
//!
//! # Examples
//!
//! ## One-step conversion
//!
//! ```
//! use graphql_sdl::convert;
//!
//! let json = r#"{
//!   "data": {
//!     "__schema": {
//!       "queryType": { "name": "Query" },
//!       "types": [
//!         {
//!           "kind": "OBJECT",
//!           "name": "Query",
//!           "description": "The root",
//!           "interfaces": [],
//!           "fields": [{
//!             "name": "hello",
//!             "description": null,
//!             "args": [],
//!             "type": { "kind": "SCALAR", "name": "String", "ofType": null },
//!             "isDeprecated": false,
//!             "deprecationReason": null
//!           }]
//!         },
//!         { "kind": "SCALAR", "name": "String", "description": null }
//!       ],
//!       "directives": []
//!     }
//!   }
//! }"#;
//!
//! let sdl = convert(json)?;
//! assert_eq!(sdl, "type Query {\n  hello: String\n}");
//! # Ok::<(), graphql_sdl::ConvertError>(())
//! ```
//!
//! ## Step-by-step usage
//!
//! ```no_run
//! use graphql_sdl::{import_introspection, print_schema, strip_descriptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let json = std::fs::read_to_string("introspection.json")?;
//!
//!     let model = import_introspection(&json)?;
//!     let documented = print_schema(&model)?;
//!     let sdl = strip_descriptions(&documented);
//!
//!     println!("{sdl}");
//!     Ok(())
//! }
//! ```

mod error;
mod import;
mod model;
mod printer;
mod strip;
mod types;

pub use error::{ConvertError, Result};
pub use import::{import_introspection, import_payload};
pub use model::*;
pub use printer::{print_schema, DEFAULT_DEPRECATION_REASON};
pub use strip::strip_descriptions;
pub use types::*;

/// Options for [`convert_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Remove description blocks from the printed SDL.
    pub strip_descriptions: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            strip_descriptions: true,
        }
    }
}

/// Converts introspection JSON into SDL with all descriptions removed.
///
/// This is a convenience function that runs [`import_introspection`],
/// [`print_schema`] and [`strip_descriptions`] in order.
///
/// # Errors
///
/// Returns an error if:
/// - The input is not valid JSON
/// - The JSON is not an introspection result or references undeclared types
/// - The schema cannot be printed
pub fn convert(json: &str) -> Result<String> {
    convert_with(json, &ConvertOptions::default())
}

/// Converts introspection JSON into SDL using the given options.
#[tracing::instrument(skip(json), fields(size = json.len()))]
pub fn convert_with(json: &str, options: &ConvertOptions) -> Result<String> {
    tracing::info!("Starting conversion");
    let model = import_introspection(json)?;
    tracing::debug!("Printing schema");
    let printed = print_schema(&model)?;
    let sdl = if options.strip_descriptions {
        strip_descriptions(&printed)
    } else {
        printed
    };
    tracing::info!(sdl_length = sdl.len(), "Conversion complete");
    Ok(sdl)
}
