//! The stub template engine.
//!
//! A stub is text with `{? key["default"].filter(args) ?}` tags. Rendering a
//! [`Stub`] with a [`ValueMap`] substitutes every tag and splits the optional
//! `===` options block off the result.

mod append;
mod error;
pub mod filters;
mod front_matter;
mod helpers;
mod inflector;
pub mod lexer;
mod registry;
mod render;
mod tag;

pub use append::{AppendDirective, AppendPosition};
pub use error::{CapabilityKind, StubError};
pub use front_matter::{Options, RenderResult};
pub use helpers::{DEFAULT_DATE_FORMAT, MAX_PUT_DEPTH, format_date};
pub use inflector::{EnglishInflector, Inflector, register_inflector};
pub use registry::{FilterFn, HelperContext, HelperFn, Registry, Value};
pub use render::{Parameter, Stub, ValueMap};
pub use tag::{Argument, FilterCall, Placeholder, parse_placeholders};
