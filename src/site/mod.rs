pub mod front_matter;
pub mod slug;

pub use front_matter::render;
pub use slug::{file_name, id_from_file_name, slugify};
