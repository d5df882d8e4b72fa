//! Loaded stubs and the rendering engine.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use super::error::StubError;
use super::front_matter::RenderResult;
use super::registry::{HelperContext, Registry, Value};
use super::tag::{Argument, Placeholder, parse_placeholders};

/// Parameter values keyed by parameter name.
pub type ValueMap = BTreeMap<String, String>;

/// A parameter a stub accepts, with the first default declared for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub key: String,
    pub default: String,
}

impl Parameter {
    pub fn is_required(&self) -> bool {
        self.default.is_empty()
    }
}

/// A parsed template.
///
/// The source text and placeholders never change after construction. The
/// registry is the stub's own copy: registering filters or helpers on it does
/// not affect other stubs, and changes made elsewhere after construction are
/// not seen here.
#[derive(Debug, Clone)]
pub struct Stub {
    source: String,
    path: Option<PathBuf>,
    placeholders: Vec<Placeholder>,
    registry: Registry,
}

impl Stub {
    pub fn new(source: impl Into<String>, registry: Registry) -> Self {
        let source = source.into();
        let placeholders = parse_placeholders(&source);
        Self {
            source,
            path: None,
            placeholders,
            registry,
        }
    }

    /// Parse `source` with the default filters and helpers.
    pub fn parse(source: impl Into<String>) -> Self {
        Self::new(source, Registry::with_defaults())
    }

    /// Load a stub file with the default filters and helpers.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StubError> {
        Self::load_with(path, Registry::with_defaults())
    }

    pub fn load_with(path: impl AsRef<Path>, registry: Registry) -> Result<Self, StubError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| StubError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut stub = Self::new(source, registry);
        tracing::debug!(
            path = %path.display(),
            placeholders = stub.placeholders.len(),
            "loaded stub"
        );
        stub.path = Some(path.to_path_buf());
        Ok(stub)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// File the stub was loaded from. Relative `put` paths resolve against its
    /// directory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register a filter on this stub only.
    pub fn filter<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&str, &[Value]) -> Result<String, StubError> + Send + Sync + 'static,
    {
        self.registry.filter(name, filter);
    }

    /// Register a helper on this stub only.
    pub fn helper<F>(&mut self, name: impl Into<String>, helper: F)
    where
        F: Fn(&HelperContext<'_>, &[Value]) -> Result<String, StubError> + Send + Sync + 'static,
    {
        self.registry.helper(name, helper);
    }

    /// Parameters in order of first appearance, synthetic ones last.
    pub fn parameters(&self) -> Vec<Parameter> {
        let mut params: Vec<Parameter> = Vec::new();
        for placeholder in self.placeholders.iter().filter(|p| !p.is_helper()) {
            match params.iter_mut().find(|p| p.key == placeholder.key) {
                Some(existing) => {
                    if existing.default.is_empty() {
                        existing.default = placeholder.default.clone();
                    }
                }
                None => params.push(Parameter {
                    key: placeholder.key.clone(),
                    default: placeholder.default.clone(),
                }),
            }
        }
        params
    }

    /// Keys of parameters that have no default anywhere in the stub.
    pub fn required_parameters(&self) -> Vec<String> {
        self.parameters()
            .into_iter()
            .filter(Parameter::is_required)
            .map(|p| p.key)
            .collect()
    }

    /// Render with `values` and split off the front matter.
    pub fn render(&self, values: &ValueMap) -> Result<RenderResult, StubError> {
        self.render_at_depth(values, 0)
    }

    /// Render with `values` without decoding front matter.
    pub fn render_text(&self, values: &ValueMap) -> Result<String, StubError> {
        self.substitute(values, 0)
    }

    pub(crate) fn render_at_depth(
        &self,
        values: &ValueMap,
        depth: usize,
    ) -> Result<RenderResult, StubError> {
        let text = self.substitute(values, depth)?;
        RenderResult::parse(&text)
    }

    /// The value map helpers and variable arguments see: the caller's values
    /// with each parameter replaced by its effective value.
    fn scope(&self, values: &ValueMap) -> ValueMap {
        let mut scope = values.clone();
        for Parameter { key, default } in self.parameters() {
            let value = match values.get(&key) {
                Some(value) if !value.is_empty() => value.clone(),
                _ => default,
            };
            scope.insert(key, value);
        }
        scope
    }

    fn substitute(&self, values: &ValueMap, depth: usize) -> Result<String, StubError> {
        let scope = self.scope(values);
        let ctx = HelperContext {
            stub_path: self.path(),
            values: &scope,
            registry: &self.registry,
            depth,
        };

        // Longest tag text first so a shorter tag never matches inside a
        // longer one that is still pending.
        let mut order: Vec<&Placeholder> =
            self.placeholders.iter().filter(|p| !p.synthetic).collect();
        order.sort_by(|a, b| b.code.len().cmp(&a.code.len()));

        let mut text = self.source.clone();
        let mut seen: HashSet<&str> = HashSet::new();
        for placeholder in order {
            if !seen.insert(placeholder.code.as_str()) {
                continue;
            }
            let value = self.resolve(placeholder, values, &ctx)?;
            tracing::trace!(code = %placeholder.code, %value, "substituting");
            text = text.replace(&placeholder.code, &value);
        }

        tracing::debug!(tags = seen.len(), depth, "rendered stub");
        Ok(text)
    }

    fn resolve(
        &self,
        placeholder: &Placeholder,
        values: &ValueMap,
        ctx: &HelperContext<'_>,
    ) -> Result<String, StubError> {
        let mut value = if placeholder.is_helper() {
            let args = resolve_args(&placeholder.args, ctx.values);
            self.registry.apply_helper(&placeholder.key, ctx, &args)?
        } else {
            match values.get(&placeholder.key) {
                Some(value) if !value.is_empty() => value.clone(),
                _ if !placeholder.default.is_empty() => placeholder.default.clone(),
                _ => ctx.values.get(&placeholder.key).cloned().unwrap_or_default(),
            }
        };

        for filter in &placeholder.filters {
            let args = resolve_args(&filter.args, ctx.values);
            value = self.registry.apply_filter(&filter.name, &value, &args)?;
        }
        Ok(value)
    }
}

/// Turn template arguments into values. Variables missing from `scope`
/// resolve to the empty string.
pub fn resolve_args(args: &[Argument], scope: &ValueMap) -> Vec<Value> {
    args.iter()
        .map(|arg| match arg {
            Argument::StringLit(text) => Value::Str(text.clone()),
            Argument::NumberLit(text) => parse_number(text),
            Argument::VarRef(name) => Value::Str(scope.get(name).cloned().unwrap_or_default()),
        })
        .collect()
}

/// Integer unless the literal contains a `.`.
fn parse_number(text: &str) -> Value {
    if !text.contains('.') {
        if let Ok(n) = text.parse::<i64>() {
            return Value::Int(n);
        }
    }
    match text.parse::<f64>() {
        Ok(n) => Value::Float(n),
        Err(_) => Value::Str(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> ValueMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn render(source: &str, pairs: &[(&str, &str)]) -> String {
        Stub::parse(source)
            .render(&values(pairs))
            .unwrap()
            .body()
            .to_string()
    }

    #[test]
    fn test_render_case_filters() {
        assert_eq!(
            render(
                "{? name ?} / {? name.kebab ?} / {? name.studly ?}",
                &[("name", "blog post")]
            ),
            "blog post / blog-post / BlogPost"
        );
    }

    #[test]
    fn test_render_default_value() {
        let source = r#"<h1>{? title["Untitled"] ?}</h1>"#;
        assert_eq!(render(source, &[]), "<h1>Untitled</h1>");
        assert_eq!(render(source, &[("title", "")]), "<h1>Untitled</h1>");
        assert_eq!(render(source, &[("title", "Hello")]), "<h1>Hello</h1>");
    }

    #[test]
    fn test_render_missing_value_is_empty() {
        assert_eq!(render("[{? name.upper ?}]", &[]), "[]");
    }

    #[test]
    fn test_default_shared_between_tags_with_same_key() {
        let source = r#"{? model["Post"] ?} {? model.plural.lower ?}"#;
        assert_eq!(render(source, &[]), "Post posts");
    }

    #[test]
    fn test_identical_tags_resolve_identically() {
        let source = "{? a.upper ?}-{? a.upper ?}-{? a ?}";
        let stub = Stub::parse(source);
        assert_eq!(stub.placeholders().len(), 3);
        assert_eq!(render(source, &[("a", "x")]), "X-X-x");
    }

    #[test]
    fn test_var_ref_argument() {
        let source = r#"{? slug.replace(sep, "-") ?}"#;
        let stub = Stub::parse(source);
        assert_eq!(stub.required_parameters(), vec!["slug", "sep"]);
        assert_eq!(render(source, &[("slug", "a b c"), ("sep", " ")]), "a-b-c");
    }

    #[test]
    fn test_numeric_arguments_reach_filters_as_numbers() {
        let mut stub = Stub::parse("{? n.pad(3) ?} {? n.pad(1.5) ?}");
        stub.filter("pad", |value, args| match args.first() {
            Some(Value::Int(width)) => Ok(format!("{value:0>width$}", width = *width as usize)),
            Some(Value::Float(f)) => Ok(format!("{value}@{f}")),
            _ => Ok(value.to_string()),
        });
        let result = stub.render(&values(&[("n", "7")])).unwrap();
        assert_eq!(result.body(), "007 7@1.5");
    }

    #[test]
    fn test_helper_call() {
        let mut stub = Stub::parse(r#"{? greet("hi", name).upper ?}"#);
        stub.helper("greet", |_, args| {
            Ok(args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(" "))
        });
        assert_eq!(
            stub.render(&values(&[("name", "ann")])).unwrap().body(),
            "HI ANN"
        );
        assert_eq!(stub.parameters().len(), 1);
    }

    #[test]
    fn test_undefined_filter_fails_render() {
        let err = Stub::parse("{? name.nope ?}")
            .render(&ValueMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            StubError::UndefinedCapability { ref name, .. } if name == "nope"
        ));
    }

    #[test]
    fn test_undefined_helper_fails_render() {
        let err = Stub::parse("{? nope() ?}")
            .render(&ValueMap::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "helper 'nope' is not defined");
    }

    #[test]
    fn test_malformed_tags_stay_as_text() {
        assert_eq!(
            render("{? name! ?} {? name ?}", &[("name", "x")]),
            "{? name! ?} x"
        );
    }

    #[test]
    fn test_empty_values_blank_every_tag() {
        let source = "a{? x ?}b{? y.upper ?}c{? z.snake ?}d";
        assert_eq!(render(source, &[("x", ""), ("y", ""), ("z", "")]), "abcd");
    }

    #[test]
    fn test_stub_registry_is_a_snapshot() {
        let mut registry = Registry::with_defaults();
        let stub = Stub::new("{? a.shout ?}", registry.clone());
        registry.filter("shout", |v, _| Ok(format!("{v}!")));

        assert!(stub.render(&values(&[("a", "x")])).is_err());

        let mut other = Stub::new("{? a.shout ?}", registry);
        assert_eq!(
            other.render(&values(&[("a", "x")])).unwrap().body(),
            "x!"
        );
        other.filter("shout", |v, _| Ok(format!("{v}?")));
        assert!(!stub.registry().has_filter("shout"));
    }

    #[test]
    fn test_parameters_order_and_defaults() {
        let stub = Stub::parse(r#"{? b ?} {? a["A"] ?} {? b["B"].upper ?} {? date() ?} {? x.replace(y, y) ?}"#);
        let params = stub.parameters();
        let keys: Vec<_> = params.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "x", "y"]);
        assert_eq!(params[0].default, "B");
        assert_eq!(stub.required_parameters(), vec!["x", "y"]);
    }

    #[test]
    fn test_longer_code_substituted_first() {
        let mut stub = Stub::parse("{?a?}{?a.upper?}");
        stub.filter("upper", |v, _| Ok(v.to_ascii_uppercase()));
        assert_eq!(stub.render(&values(&[("a", "q")])).unwrap().body(), "qQ");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12"), Value::Int(12));
        assert_eq!(parse_number("1.5"), Value::Float(1.5));
        assert_eq!(parse_number("99999999999999999999"), Value::Float(1e20));
    }
}
