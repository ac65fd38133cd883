pub mod bounds;
pub mod error;
pub mod metadata;
