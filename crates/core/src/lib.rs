//! Core library for dockgen
//!
//! This crate is the **Functional Core** of dockgen. The `dockgen` binary is
//! the Imperative Shell around it: it reads the environment, walks the
//! project directory, talks to the agent service and writes the Dockerfile.
//!
//! Everything here is a pure transformation:
//!
//! - **No I/O**: no environment reads, no HTTP, no filesystem access
//! - **Deterministic**: the same input always produces the same output
//! - **Testable with fixture data**: JSON literals stand in for API responses
//!
//! # Module Organization
//!
//! - [`config`]: Resolve raw variables into a validated configuration and credential
//! - [`project`]: Project summary embedded in the prompt
//! - [`prompt`]: Prompt and run instruction text
//! - [`agent`]: Endpoint URLs, run status, and extraction of the assistant reply
//! - [`sanitize`]: Markdown fence stripping of the reply
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use dockgen_core::sanitize::strip_fences;
//!
//! let dockerfile = strip_fences("```dockerfile\nFROM x\n```").unwrap();
//! assert_eq!(dockerfile, "FROM x");
//! ```

pub mod agent;
pub mod config;
pub mod project;
pub mod prompt;
pub mod sanitize;
