//! CLI command handlers, one per file.

mod config_path;
mod images;
mod tree;

pub use config_path::run_config_path;
pub use images::{run_images, ImagesArgs};
pub use tree::{run_file, run_node};
