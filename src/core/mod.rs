//! core
//!
//! Domain types, documents, stores, and the addressing algorithm.
//!
//! # Structure
//!
//! - [`types`] - Primitive value model and layout tags
//! - [`source`] - Load contract for path- and memory-backed sources
//! - [`store`] - Lazy store with required-key validation
//! - [`global`] - Global (per-sample) metadata document
//! - [`pixels`] - Per-pixel metadata document
//! - [`sample`] - The two-store container and fallback resolution
//! - [`paths`] - `.global`/`.pixels` filename derivation
//! - [`config`] - User-level CLI defaults

pub mod config;
pub mod global;
pub mod paths;
pub mod pixels;
pub mod sample;
pub mod source;
pub mod store;
pub mod types;
