pub mod fs;
pub mod text;

pub use fs::{read_json, write_json_atomic};
pub use text::{normalize_title, truncate_chars};
