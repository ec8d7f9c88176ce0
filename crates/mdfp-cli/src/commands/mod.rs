pub mod compose;
pub mod descriptors;
