//! Storage backends for the catalogue

pub mod in_memory;

pub use in_memory::InMemoryCatalogue;
