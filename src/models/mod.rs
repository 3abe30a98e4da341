pub mod instagram;
pub mod post;
pub mod stats;

pub use post::{InsertOutcome, NewPost, Post, PostFilter, PostPatch, UNKNOWN};
pub use stats::PostStats;
