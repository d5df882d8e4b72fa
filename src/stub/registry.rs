//! Named filters and helpers.
//!
//! A [`Registry`] maps names to filter and helper closures. The process-wide
//! default set is built once on first use; every [`Registry::with_defaults`]
//! call hands out an independent copy, so registering on one copy never
//! affects another.
//!
//! ```ignore
//! let mut registry = Registry::with_defaults();
//! registry.filter("shout", |value, _args| Ok(format!("{}!", value.to_uppercase())));
//! let stub = Stub::new("{? name.shout ?}", registry);
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use super::error::StubError;
use super::render::ValueMap;
use super::{filters, helpers};

/// A resolved argument passed to a filter or helper.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
}

impl Value {
    /// The argument as text. Numbers use their shortest decimal form.
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            Value::Str(s) => Cow::Borrowed(s),
            Value::Int(n) => Cow::Owned(n.to_string()),
            Value::Float(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// What a helper can see of the stub that invoked it.
pub struct HelperContext<'a> {
    /// File the invoking stub was loaded from, if any.
    pub stub_path: Option<&'a Path>,
    /// Effective parameter values of the invoking render.
    pub values: &'a ValueMap,
    /// Registry of the invoking stub.
    pub registry: &'a Registry,
    /// Number of enclosing `put` renders.
    pub depth: usize,
}

pub type FilterFn = Arc<dyn Fn(&str, &[Value]) -> Result<String, StubError> + Send + Sync>;
pub type HelperFn =
    Arc<dyn Fn(&HelperContext<'_>, &[Value]) -> Result<String, StubError> + Send + Sync>;

static DEFAULTS: OnceLock<Registry> = OnceLock::new();

/// Filter and helper table owned by a stub.
#[derive(Clone, Default)]
pub struct Registry {
    filters: BTreeMap<String, FilterFn>,
    helpers: BTreeMap<String, HelperFn>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the built-in filters and helpers.
    pub fn with_defaults() -> Self {
        DEFAULTS
            .get_or_init(|| {
                let mut registry = Self::new();
                filters::register_defaults(&mut registry);
                helpers::register_defaults(&mut registry);
                registry
            })
            .clone()
    }

    /// Register or replace a filter.
    pub fn filter<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&str, &[Value]) -> Result<String, StubError> + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    /// Register or replace a helper.
    pub fn helper<F>(&mut self, name: impl Into<String>, helper: F)
    where
        F: Fn(&HelperContext<'_>, &[Value]) -> Result<String, StubError> + Send + Sync + 'static,
    {
        self.helpers.insert(name.into(), Arc::new(helper));
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    pub fn filter_names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    pub fn helper_names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }

    pub fn apply_filter(&self, name: &str, value: &str, args: &[Value]) -> Result<String, StubError> {
        let filter = self
            .filters
            .get(name)
            .ok_or_else(|| StubError::undefined_filter(name))?;
        filter(value, args)
    }

    pub fn apply_helper(
        &self,
        name: &str,
        ctx: &HelperContext<'_>,
        args: &[Value],
    ) -> Result<String, StubError> {
        let helper = self
            .helpers
            .get(name)
            .ok_or_else(|| StubError::undefined_helper(name))?;
        helper(ctx, args)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .finish()
    }
}
