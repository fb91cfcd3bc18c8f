//! `ContainerConsole` - client-side data layer for a container-farming console
//!
//! This crate provides the data-orchestration layer behind a container-farming
//! management console: a typed REST client, a transform/TTL-cache adaptor,
//! a metrics polling service with backoff, and observable per-page view models.
//! The rendering surface (whatever draws the console) sits on top of the view
//! models; the REST backend sits behind the API client.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    // Documentation - missing docs should be added gradually
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_types_passed_by_value,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Complexity and readability
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::too_many_lines,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// Transform and caching layer between the API client and the view models
pub mod adaptor;
/// Typed REST client for the container-farm backend
pub mod api;
/// Keyed TTL cache used by the adaptor layer
pub mod cache;
/// Configuration management for connection, thresholds, and polling settings
pub mod config;
/// Unified error types, result alias, and UI-facing error classification
pub mod errors;
/// Wire and display data models
pub mod models;
/// Explicit subscriber-list primitive used by view models and the poller
pub mod observer;
/// Timer-driven metrics polling with exponential backoff
pub mod polling;
/// Observable per-page state objects consumed by the view layer
pub mod viewmodels;

#[cfg(test)]
pub mod test_utils;
