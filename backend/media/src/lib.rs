pub mod extensions;
pub mod normalize;

pub use extensions::{allowed_file, sanitize_filename, ALLOWED_EXTENSIONS};
pub use normalize::normalize_to_jpeg;
