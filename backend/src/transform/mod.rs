//! Transformation and orchestration.
//!
//! - [`delimited`] - Rows to comma-delimited text (quoted or raw)
//! - [`pipeline`] - Upload state machine: select, read, parse, transform, submit

pub mod delimited;
pub mod pipeline;

pub use delimited::{to_delimited_text, Delimiting};
pub use pipeline::{UploadPipeline, NO_FILE_MESSAGE, invalid_selection_message};
