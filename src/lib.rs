//! Browser client for the CTA optimizer service.
//!
//! Users submit a URL, an image, or pasted text; the service extracts calls to
//! action and proposes rewrites; the client lets them review, edit, accept,
//! revert, and export those suggestions, and replay past analyses.
//!
//! Everything under [`session`], [`api`], [`export`], and [`config`] is plain
//! Rust and runs natively in tests. The Leptos view layer lives in [`app`],
//! [`pages`], and [`components`].

pub mod api;
pub mod app;
pub mod browser;
pub mod components;
pub mod config;
pub mod error;
pub mod export;
pub mod pages;
pub mod session;
pub mod telemetry;

pub use config::ClientConfig;
pub use error::{ServiceError, SessionError, ValidationError};
