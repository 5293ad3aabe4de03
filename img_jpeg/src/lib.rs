//! img_jpeg — batch HEIC/HEIF to JPEG converter.
//!
//! The binary wires the CLI to the batch pipeline in `shared_utils`; this
//! library surface exposes the run configuration and the codec adapter so
//! integration tests can drive full conversions.

pub mod config;
pub mod converter;

pub use config::RunConfig;
pub use converter::{convert_task, ConvertError, TARGET_EXTENSION};
