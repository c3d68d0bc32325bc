//! Outbound adapters implementing domain driven ports.

pub mod persistence;
pub mod security;
