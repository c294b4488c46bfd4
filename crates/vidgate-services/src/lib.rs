//! Vidgate background services.

pub mod cleanup;

pub use cleanup::CleanupService;
