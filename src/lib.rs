//! Shared plumbing for the `bandcamp-import` and `pdf-rename` binaries:
//! subscriber installation and the mapping from errors to exit codes.

pub mod error;
pub mod exit;
pub mod logging;
