//! Error types for the coordinator's caller-facing surface.
//!
//! There are no fatal errors in this crate: per-URL load failures are
//! reported through progress events and never abort a batch, and cancelling
//! an unknown or already-completed batch is a silent no-op. The only errors
//! surfaced to callers are invalid submissions, rejected synchronously
//! before any batch is created.

use thiserror::Error;

/// A submission the coordinator rejects outright.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The URL list was empty.
    #[error("cannot submit an empty URL list")]
    EmptyUrlList,

    /// A per-URL options list was supplied but its length does not match the
    /// URL list.
    #[error("options length {options} does not match URL count {urls}")]
    OptionsLengthMismatch {
        /// Number of URLs submitted.
        urls: usize,
        /// Number of options supplied.
        options: usize,
    },
}
