// Common Types Module

pub mod types;

pub use types::Identifier;
