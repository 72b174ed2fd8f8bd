//! Request extractors

mod owner;

pub use owner::Owner;
