//! API handlers module

pub mod analyses;
pub mod documents;
pub mod health;
