//! Application layer orchestrating domain logic and infrastructure.

pub mod engine;
pub mod generate;
pub mod scan;
