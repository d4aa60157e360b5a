//! Integration test suite for tera-jsx
//!
//! End-to-end tests for rendering templates with JSX blocks and compiling the
//! client-side registry, through both the library API and the `compilejsx` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: `compilejsx` invocations (stdout, `--output`, configuration, failures)
//! - **config**: configuration loading from the environment
//! - **hydration**: renderer and compiler agreeing on fingerprints

mod cli;
mod config;
mod hydration;
