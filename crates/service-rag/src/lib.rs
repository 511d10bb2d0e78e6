pub mod catalog;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod model;
pub mod retriever;
