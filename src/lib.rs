//! tera-jsx - hydratable JSX blocks in server-rendered templates
//!
//! Templates embed client-side markup in `{% jsx %} … {% endjsx %}` blocks. The
//! server renders each block as a lightweight marker carrying a fingerprint of the
//! block and just the slice of the rendering context the block uses; an offline
//! compiler turns the same blocks into a JavaScript registry keyed by fingerprint,
//! and a small bootstrap function renders every marker on the page.
//!
//! # Architecture Overview
//!
//! ```text
//!  template ──► templating::renderer ──► HTML with <script type="script/django-jsx"> markers
//!      │                 │
//!      │                 └── projection: ctx.* expressions ─► minimal JSON context
//!      │
//!      └──────► compiler ──► jsx_registry.jsx (fingerprint → render function + bootstrap)
//! ```
//!
//! Both sides derive the fingerprint from the same verbatim block body, which is the
//! only coordination needed between them.
//!
//! # Core Modules
//!
//! - [`templating`] - block scanning, expression extraction, context projection and
//!   Tera rendering
//! - [`compiler`] - registry generation
//! - [`discovery`] - template corpus discovery and loading
//! - [`config`] - `jsx.toml` configuration
//! - [`core`] - error types and user-facing error formatting
//! - [`cli`] - the `compilejsx` command
//!
//! # Example
//!
//! ```rust,no_run
//! use tera_jsx::compiler::{RegistryCompiler, TemplateSource};
//!
//! let sources = [TemplateSource::new(
//!     "templates/hello.html",
//!     "{% jsx %}<Hello name={ctx.user.name} />{% endjsx %}",
//! )];
//! let registry = RegistryCompiler::compile(&sources)?;
//! assert!(registry.contains("var {Hello} = COMPONENTS;"));
//! # Ok::<(), tera_jsx::core::JsxError>(())
//! ```

pub mod cli;
pub mod compiler;
pub mod config;
pub mod core;
pub mod discovery;
pub mod templating;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
