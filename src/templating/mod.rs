//! JSX blocks for Tera / Django-style templates.
//!
//! Templates mark regions of client-rendered markup with a block tag:
//!
//! ```text
//! {% load jsx %}
//! {% for item in items %}
//!   {% jsx %}
//!     <TodoItem title={ctx.item.title} done={ctx.item.done} />
//!   {% endjsx %}
//! {% endfor %}
//! ```
//!
//! At render time each block is replaced by an empty `<script>` marker carrying the
//! block fingerprint and the *projected* context: only the values the block refers
//! to through `ctx.` expressions, nested the way the expressions spell them. The
//! registry compiler ([`crate::compiler`]) scans the same templates offline and emits
//! one JavaScript render function per distinct block body, keyed by the same
//! fingerprint, so the browser can find each marker's implementation.
//!
//! # Modules
//!
//! - [`lexer`]: tokenizer for template tags
//! - [`blocks`]: block discovery and fingerprinting
//! - [`expressions`]: `ctx.` expression extraction
//! - [`resolve`]: capability-based lookup into context values
//! - [`projection`]: minimal context projection
//! - [`marker`]: marker elements
//! - [`renderer`]: Tera integration
//!
//! # Missing values
//!
//! A reference that cannot be resolved never fails the render. Its leaf is set to
//! the configured `string_if_invalid` value (empty by default, with `%s` replaced by
//! the dotted path) and the miss is logged at debug level.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tera_jsx::templating::{JsxRenderer, ProjectionConfig};
//!
//! # fn example() -> Result<(), tera_jsx::core::JsxError> {
//! let renderer = JsxRenderer::new(ProjectionConfig::default());
//! let mut context = tera::Context::new();
//! context.insert("name", "Ada");
//! let html = renderer.render_template(
//!     "hello.html",
//!     "{% load jsx %}{% jsx %}<Hello name={ctx.name} />{% endjsx %}",
//!     &context,
//! )?;
//! assert!(html.starts_with(r#"<script type="script/django-jsx""#));
//! # Ok(())
//! # }
//! ```

pub mod blocks;
pub mod expressions;
pub mod lexer;
pub mod marker;
pub mod projection;
pub mod renderer;
pub mod resolve;


pub use blocks::{JsxBlock, fingerprint, scan_blocks};
pub use expressions::{Expression, extract_expressions};
pub use marker::{Marker, register_str};
pub use projection::{ProjectionConfig, project, serialize_projection};
pub use renderer::JsxRenderer;
pub use resolve::{ContextObject, ContextValue, Lookup, Resolution, resolve};
