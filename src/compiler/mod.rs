//! Offline registry compiler.
//!
//! Scans template sources for JSX blocks and generates a JavaScript module that maps
//! each block fingerprint to a render function, followed by the bootstrap code that
//! hydrates the markers left in rendered pages.
//!
//! The output for a block looks like:
//!
//! ```js
//! /* templates/todo.html */
//! jsx_registry["9f86d0…"] = (COMPONENTS, ctx) => {
//! if (Object.hasOwnProperty.call(COMPONENTS, 'TodoItem')) var {TodoItem} = COMPONENTS;
//! return (<TodoItem title={ctx.item.title} />);
//! }
//! ```
//!
//! Blocks with identical bodies share one entry no matter how many templates contain
//! them. Sources are processed in path order and components are sorted, so the
//! generated file only changes when the templates do.

use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::core::JsxError;
use crate::templating::blocks::{JsxBlock, scan_blocks};

/// Module header of the generated registry.
pub const REGISTRY_PREAMBLE: &str = "import React from 'react';
import ReactDOM from 'react-dom';
var jsx_registry = {};";

/// Client-side hydration of every marker on the page.
pub const BOOTSTRAP_JS: &str = r"function renderAllDjangoJSX(COMPONENTS) {
    Array.prototype.forEach.call(
        document.querySelectorAll('script[type^=script][type$=django-jsx]'), function(el) {
            let ctx = JSON.parse(el.dataset.ctx)
            let component = jsx_registry[el.dataset.sha1](COMPONENTS, ctx)
            ReactDOM.render(component, el)
            el.replaceWith(el.children[0])
        }
    )
}";

/// Module footer of the generated registry.
pub const REGISTRY_EPILOGUE: &str = "jsx_registry.renderAllDjangoJSX = renderAllDjangoJSX;
export default jsx_registry;";

fn component_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<(\w+)").expect("static pattern is valid"))
}

/// Tag names opened in a block body, de-duplicated and sorted.
///
/// Plain HTML tags are included; the generated guard only binds names that the
/// component map actually provides.
#[must_use]
pub fn component_names(body: &str) -> Vec<String> {
    component_regex()
        .captures_iter(body)
        .map(|caps| caps[1].to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// A template file and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    /// Path the source was read from
    pub path: PathBuf,
    /// UTF-8 contents
    pub content: String,
}

impl TemplateSource {
    /// Pair a path with its contents.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// One render function in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Fingerprint of the untrimmed block body
    pub fingerprint: String,
    /// Sorted tag names found in the body
    pub components: Vec<String>,
    /// Trimmed body, emitted as the JSX expression
    pub body: String,
    /// Template in which the body was first seen
    pub template: PathBuf,
}

impl RegistryEntry {
    fn from_block(block: &JsxBlock, template: &Path) -> Self {
        let body = block.body().trim().to_string();
        Self {
            fingerprint: block.fingerprint().to_string(),
            components: component_names(&body),
            body,
            template: template.to_path_buf(),
        }
    }

    /// The JavaScript assignment for this entry, without trailing newline.
    #[must_use]
    pub fn to_js(&self) -> String {
        let mut js = format!("jsx_registry[\"{}\"] = (COMPONENTS, ctx) => {{\n", self.fingerprint);
        for name in &self.components {
            let _ = writeln!(
                js,
                "if (Object.hasOwnProperty.call(COMPONENTS, '{name}')) var {{{name}}} = COMPONENTS;"
            );
        }
        if self.body.is_empty() {
            js.push_str("return null;\n}");
        } else {
            let _ = write!(js, "return ({});\n}}", self.body);
        }
        js
    }
}

/// Accumulates registry entries across templates.
#[derive(Debug, Default)]
pub struct RegistryCompiler {
    entries: Vec<RegistryEntry>,
    seen: HashSet<String>,
}

impl RegistryCompiler {
    /// Create an empty compiler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the blocks of one template, returning how many new entries it contributed.
    ///
    /// # Errors
    ///
    /// Returns [`JsxError::NestedBlock`] or [`JsxError::UnclosedBlock`] when the
    /// template is malformed; nothing from that template is added.
    pub fn collect(&mut self, source: &TemplateSource) -> Result<usize, JsxError> {
        let template = source.path.display().to_string();
        let blocks = scan_blocks(&source.content, &template)?;

        let mut added = 0;
        for block in &blocks {
            if !self.seen.insert(block.fingerprint().to_string()) {
                tracing::debug!(
                    "Skipping duplicate jsx block {} in {}:{}",
                    block.fingerprint(),
                    template,
                    block.line()
                );
                continue;
            }
            self.entries.push(RegistryEntry::from_block(block, &source.path));
            added += 1;
        }

        tracing::debug!("{}: {} block(s), {} new", template, blocks.len(), added);
        Ok(added)
    }

    /// Entries collected so far, in discovery order.
    #[must_use]
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// The complete registry module.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from(REGISTRY_PREAMBLE);
        out.push('\n');

        let mut current: Option<&Path> = None;
        for entry in &self.entries {
            if current != Some(entry.template.as_path()) {
                let _ = writeln!(out, "/* {} */", entry.template.display());
                current = Some(entry.template.as_path());
            }
            out.push_str(&entry.to_js());
            out.push('\n');
        }

        out.push_str(BOOTSTRAP_JS);
        out.push('\n');
        out.push_str(REGISTRY_EPILOGUE);
        out.push('\n');
        out
    }

    /// Compile a set of sources into a registry module.
    ///
    /// Sources are processed in path order regardless of the order given.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed template.
    pub fn compile(sources: &[TemplateSource]) -> Result<String, JsxError> {
        let mut ordered: Vec<&TemplateSource> = sources.iter().collect();
        ordered.sort_by(|a, b| a.path.cmp(&b.path));

        let mut compiler = Self::new();
        for source in ordered {
            compiler.collect(source)?;
        }

        tracing::info!(
            "Compiled {} jsx block(s) from {} template(s)",
            compiler.entries.len(),
            sources.len()
        );
        Ok(compiler.render())
    }
}
