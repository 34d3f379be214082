//! Delimited-file adapters.
//!
//! - [`table`] reads the raw sales file into a [`RawTable`](crate::domain::RawTable).
//! - [`artifact`] writes the merged highlights artifact and reads it back
//!   for the presentation side.

pub mod artifact;
pub mod table;

pub use artifact::{
    read_highlights, read_highlights_from_path, write_artifact, write_artifact_to_path,
};
pub use table::{read_table, read_table_from_path};
