//! Tests for the `compilejsx` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tera_jsx::compiler::{BOOTSTRAP_JS, REGISTRY_EPILOGUE, REGISTRY_PREAMBLE};
use tera_jsx::config::CONFIG_ENV_VAR;
use tera_jsx::templating::fingerprint;
use tera_jsx::test_utils::TemplateTree;

/// `compilejsx` running inside `tree`, isolated from the caller's environment.
fn compilejsx(tree: &TemplateTree) -> Command {
    let mut cmd = Command::cargo_bin("compilejsx").unwrap();
    cmd.current_dir(tree.path()).env_remove(CONFIG_ENV_VAR).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_stdout_without_templates_is_boilerplate() {
    let tree = TemplateTree::new().unwrap();

    let expected = format!("{REGISTRY_PREAMBLE}\n{BOOTSTRAP_JS}\n{REGISTRY_EPILOGUE}\n");
    compilejsx(&tree).assert().success().stdout(expected);
}

#[test]
fn test_stdout_contains_entries() {
    let tree = TemplateTree::new().unwrap();
    tree.write_block("templates/page.html", "<NeatThing/>").unwrap();

    compilejsx(&tree)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(REGISTRY_PREAMBLE))
        .stdout(predicate::str::contains(format!(
            "jsx_registry[\"{}\"] = (COMPONENTS, ctx) => {{",
            fingerprint("<NeatThing/>")
        )))
        .stdout(predicate::str::contains("return (<NeatThing/>);"))
        .stdout(predicate::str::ends_with(format!("{REGISTRY_EPILOGUE}\n")));
}

#[test]
fn test_output_file() {
    let tree = TemplateTree::new().unwrap();
    tree.write_block("templates/page.html", "<NeatThing/>").unwrap();

    compilejsx(&tree)
        .args(["--output", "static/js/jsx_registry.jsx"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(tree.path().join("static/js/jsx_registry.jsx")).unwrap();
    assert!(written.starts_with(REGISTRY_PREAMBLE));
    assert!(written.contains("return (<NeatThing/>);"));

    compilejsx(&tree).args(["-o", "short.jsx"]).assert().success();
    assert_eq!(std::fs::read_to_string(tree.path().join("short.jsx")).unwrap(), written);
}

#[test]
fn test_config_file_selects_directories() {
    let tree = TemplateTree::new().unwrap();
    tree.write_block("templates/ignored.html", "<Ignored/>").unwrap();
    tree.write_block("app/views/a.html", "<FromApp/>").unwrap();
    tree.write_block("shared/b.txt", "<FromShared/>").unwrap();
    tree.write("jsx.toml", "template_dirs = [\"app/views\", \"shared\"]\n").unwrap();

    compilejsx(&tree)
        .assert()
        .success()
        .stdout(predicate::str::contains("<FromApp/>"))
        .stdout(predicate::str::contains("<FromShared/>"))
        .stdout(predicate::str::contains("<Ignored/>").not());
}

#[test]
fn test_config_env_var_points_to_file() {
    let tree = TemplateTree::new().unwrap();
    tree.write_block("elsewhere/templates/x.html", "<Elsewhere/>").unwrap();
    let config = tree
        .write("elsewhere/settings.toml", "template_dirs = [\"templates\"]\n")
        .unwrap();

    compilejsx(&tree)
        .env(CONFIG_ENV_VAR, &config)
        .assert()
        .success()
        .stdout(predicate::str::contains("<Elsewhere/>"));
}

#[test]
fn test_missing_config_named_by_env_fails() {
    let tree = TemplateTree::new().unwrap();

    compilejsx(&tree)
        .env(CONFIG_ENV_VAR, tree.path().join("nope.toml"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(CONFIG_ENV_VAR));
}

#[test]
fn test_invalid_config_fails() {
    let tree = TemplateTree::new().unwrap();
    tree.write("jsx.toml", "template_dirs = \"not a list\"\n").unwrap();

    compilejsx(&tree).assert().failure().stderr(predicate::str::contains("jsx.toml"));
}

#[test]
fn test_nested_block_fails_without_output() {
    let tree = TemplateTree::new().unwrap();
    tree.write(
        "templates/nested.html",
        "{% jsx %}\n<Component1>\n  {% jsx %}<Component2/>{% endjsx %}\n</Component1>\n{% endjsx %}",
    )
    .unwrap();

    compilejsx(&tree)
        .args(["-o", "registry.jsx"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("jsx blocks cannot be nested"));
    assert!(!tree.path().join("registry.jsx").exists());
}

#[test]
fn test_unreadable_files_are_skipped() {
    let tree = TemplateTree::new().unwrap();
    tree.write_block("templates/good.html", "<Good/>").unwrap();
    std::fs::write(tree.path().join("templates/logo.png"), [0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe])
        .unwrap();

    compilejsx(&tree)
        .assert()
        .success()
        .stdout(predicate::str::contains("<Good/>"))
        .stderr(predicate::str::contains("logo.png"));
}

#[test]
fn test_duplicate_blocks_across_templates() {
    let tree = TemplateTree::new().unwrap();
    let block = "<Component prop={ctx.foo}/>";
    tree.write(
        "templates/a.html",
        &format!(
            "{{% load jsx %}}\n{{% for foo in [1, 2] %}}\n  {{% jsx %}}{block}{{% endjsx %}}\n{{% endfor %}}\n"
        ),
    )
    .unwrap();
    tree.write_block("templates/b.html", block).unwrap();

    let output = compilejsx(&tree).assert().success().get_output().stdout.clone();
    let registry = String::from_utf8(output).unwrap();
    assert_eq!(registry.matches(&fingerprint(block)).count(), 1);
    assert!(registry.contains("/* "));
    assert!(registry.contains("a.html */"));
    assert!(!registry.contains("b.html */"));
}

#[test]
fn test_rejects_unknown_flags() {
    let tree = TemplateTree::new().unwrap();
    compilejsx(&tree).arg("--verbose").assert().failure().code(2);
}
