//! District finance catalog served by the `district-atlas` API.
//!
//! The dataset is loaded once at startup into an immutable [`catalog::Catalog`]; the
//! newsletter list is the only mutable state and lives behind [`newsletter::NewsletterStore`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod newsletter;
pub mod router;
pub mod telemetry;
