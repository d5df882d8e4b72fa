use std::fs;

use stuble::stub::{AppendPosition, Registry, Stub, StubError, ValueMap};

fn values(pairs: &[(&str, &str)]) -> ValueMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_model_stub_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("model.stub"),
        concat!(
            "===\n",
            "path = \"app/Models/{? model.studly ?}.php\"\n",
            "===\n",
            "<?php\n",
            "class {? model.studly ?} extends {? base[\"Model\"] ?}\n",
            "{\n",
            "    protected $table = '{? table[\"\"] ?}{? model.snake.plural ?}';\n",
            "{? put(\"partials/footer\") ?}",
        ),
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("partials")).unwrap();
    fs::write(
        dir.path().join("partials/footer.stub"),
        "    // {? model.words ?}\n}\n",
    )
    .unwrap();

    let stub = Stub::load(dir.path().join("model.stub")).unwrap();
    let keys: Vec<_> = stub.parameters().into_iter().map(|p| p.key).collect();
    assert_eq!(keys, vec!["model", "base", "table"]);
    assert_eq!(stub.required_parameters(), vec!["model", "table"]);

    let result = stub.render(&values(&[("model", "blog post")])).unwrap();
    assert_eq!(result.save_path(), "app/Models/BlogPost.php");
    assert_eq!(
        result.body(),
        concat!(
            "<?php\n",
            "class BlogPost extends Model\n",
            "{\n",
            "    protected $table = 'blog_posts';\n",
            "    // blog post\n",
            "}\n",
        )
    );
}

#[test]
fn test_append_directive_end_to_end() {
    let stub = Stub::parse(concat!(
        "===\n",
        "append:\n",
        "  file: routes/web.php\n",
        "  after: \"// {? marker[\"routes\"] ?}\"\n",
        "===\n",
        "Route::resource('{? name.kebab.plural ?}');",
    ));

    let result = stub.render(&values(&[("name", "BlogPost")])).unwrap();
    let directive = result.append_directive().unwrap();
    assert_eq!(directive.file.as_deref(), Some("routes/web.php"));
    assert_eq!(directive.position, AppendPosition::After("// routes".into()));

    let existing = "<?php\n// routes\n";
    assert_eq!(
        directive.apply(Some(existing), result.body()),
        "<?php\n// routes\nRoute::resource('blog-posts');\n"
    );
}

#[test]
fn test_custom_registry() {
    let mut registry = Registry::with_defaults();
    registry.filter("wrap", |value, args| {
        let edge = args.first().map(|a| a.to_string()).unwrap_or_default();
        Ok(format!("{edge}{value}{edge}"))
    });
    registry.helper("env_name", |ctx, _| {
        Ok(ctx.values.get("env").cloned().unwrap_or_else(|| "dev".into()))
    });

    let stub = Stub::new(r#"{? name.upper.wrap("*") ?} on {? env_name() ?}"#, registry);
    let result = stub.render(&values(&[("name", "api")])).unwrap();
    assert_eq!(result.body(), "*API* on dev");

    let plain = Stub::parse(r#"{? name.wrap("*") ?}"#);
    assert!(matches!(
        plain.render(&values(&[("name", "api")])),
        Err(StubError::UndefinedCapability { .. })
    ));
}

#[test]
fn test_malformed_front_matter_fails_render() {
    let stub = Stub::parse("===\ntitle: [unclosed\n===\nbody");
    assert!(matches!(
        stub.render(&ValueMap::new()),
        Err(StubError::MalformedFrontMatter { .. })
    ));
}
