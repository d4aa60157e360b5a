//! Rendering and compiling the same templates.
//!
//! Every marker in a rendered page must find its entry in the compiled registry.

use anyhow::Result;
use regex::Regex;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use tera::Context as TeraContext;
use tera_jsx::compiler::{RegistryCompiler, TemplateSource};
use tera_jsx::config::JsxConfig;
use tera_jsx::discovery::{list_template_files, read_sources};
use tera_jsx::templating::{JsxRenderer, ProjectionConfig};
use tera_jsx::test_utils::{TemplateTree, init_test_logging};

const TODO_TEMPLATE: &str = r#"{% load jsx %}
<ul>
{% for item in items %}
  {% jsx %}
    <TodoItem title={ctx.item.title} done={ctx.item.done} owner={ctx.user.name} />
  {% endjsx %}
{% endfor %}
</ul>
{% jsx %}<Footer count={ctx.items.length} missing={ctx.nothing.here} />{% endjsx %}
"#;

fn marker_fingerprints(html: &str) -> Vec<String> {
    let re = Regex::new(r#"data-sha1="([0-9a-f]+)""#).unwrap();
    re.captures_iter(html).map(|caps| caps[1].to_string()).collect()
}

fn marker_contexts(html: &str) -> Vec<Value> {
    let re = Regex::new(r#"data-ctx="([^"]*)""#).unwrap();
    re.captures_iter(html)
        .map(|caps| {
            let raw = caps[1]
                .replace("&quot;", "\"")
                .replace("&#x27;", "'")
                .replace("&#x2F;", "/")
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&amp;", "&");
            serde_json::from_str(&raw).unwrap()
        })
        .collect()
}

fn registry_fingerprints(registry: &str) -> BTreeSet<String> {
    let re = Regex::new(r#"jsx_registry\["([0-9a-f]+)"\]"#).unwrap();
    re.captures_iter(registry).map(|caps| caps[1].to_string()).collect()
}

fn todo_context() -> TeraContext {
    TeraContext::from_value(json!({
        "items": [
            {"title": "Write tests", "done": true, "secret": "x"},
            {"title": "Ship it", "done": false, "secret": "y"},
        ],
        "user": {"name": "Ada", "email": "ada@example.com"},
    }))
    .unwrap()
}

#[test]
fn test_every_marker_has_a_registry_entry() -> Result<()> {
    init_test_logging(None);

    let renderer = JsxRenderer::default();
    let html = renderer.render_template("todo.html", TODO_TEMPLATE, &todo_context())?;
    let registry =
        RegistryCompiler::compile(&[TemplateSource::new("templates/todo.html", TODO_TEMPLATE)])?;

    let rendered = marker_fingerprints(&html);
    assert_eq!(rendered.len(), 3, "two loop iterations plus the footer");

    let compiled = registry_fingerprints(&registry);
    assert_eq!(compiled.len(), 2);
    for fp in &rendered {
        assert!(compiled.contains(fp), "marker {fp} has no registry entry");
    }
    Ok(())
}

#[test]
fn test_markers_carry_only_referenced_values() -> Result<()> {
    let renderer = JsxRenderer::new(ProjectionConfig::new("MISSING:%s"));
    let html = renderer.render_template("todo.html", TODO_TEMPLATE, &todo_context())?;

    let contexts = marker_contexts(&html);
    assert_eq!(
        contexts[0],
        json!({"item": {"title": "Write tests", "done": true}, "user": {"name": "Ada"}})
    );
    assert_eq!(
        contexts[1],
        json!({"item": {"title": "Ship it", "done": false}, "user": {"name": "Ada"}})
    );
    assert_eq!(
        contexts[2],
        json!({"items": {"length": "MISSING:items.length"}, "nothing": {"here": "MISSING:nothing.here"}})
    );
    assert!(!html.contains("secret"));
    assert!(!html.contains("ada@example.com"));
    Ok(())
}

#[test]
fn test_page_markup_survives_rendering() -> Result<()> {
    let renderer = JsxRenderer::default();
    let html = renderer.render_template("todo.html", TODO_TEMPLATE, &todo_context())?;
    assert!(html.contains("<ul>"));
    assert!(html.contains("</ul>"));
    assert!(!html.contains("{% jsx %}"));
    assert!(!html.contains("load jsx"));
    assert!(!html.contains("<TodoItem"));
    Ok(())
}

#[tokio::test]
async fn test_compile_from_configured_tree() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("templates/todo.html", TODO_TEMPLATE)?;
    tree.write_block("templates/partials/badge.txt", "<Badge label={ctx.label}/>")?;
    let config_path = tree.write("jsx.toml", "template_dirs = [\"templates\"]\n")?;

    let config = JsxConfig::load_from(&config_path).await?;
    let files = list_template_files(&config.template_dirs);
    assert_eq!(files.len(), 2);

    let sources = read_sources(&files).await;
    let registry = RegistryCompiler::compile(&sources)?;
    assert_eq!(registry_fingerprints(&registry).len(), 3);
    assert!(registry.contains("var {Badge} = COMPONENTS;"));
    assert!(registry.contains("var {TodoItem} = COMPONENTS;"));
    assert!(registry.contains("var {Footer} = COMPONENTS;"));

    // Same input, same bytes.
    assert_eq!(RegistryCompiler::compile(&sources)?, registry);
    Ok(())
}
