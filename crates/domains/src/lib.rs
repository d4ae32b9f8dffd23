//! # domains
//!
//! The central domain model of the YCBN site: catalog entities, the project
//! membership and article publication records, intake rows, typed form inputs,
//! the error taxonomy and the port traits every adapter implements.

pub mod errors;
pub mod inputs;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
