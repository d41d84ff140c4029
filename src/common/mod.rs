//! Common module - types, errors and collaborator traits shared by every component

pub mod channels;
pub mod errors;
pub mod traits;
pub mod types;
