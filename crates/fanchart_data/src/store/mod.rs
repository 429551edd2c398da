//! Draw containers and summary output.

mod draw_file;
pub mod output;

pub use draw_file::{DrawFile, FileMetadata};
pub use output::{output_path, read_means_bands, write_means_bands};
