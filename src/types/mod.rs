//! Tipos compartilhados.

pub mod config;
pub mod errors;
pub mod lenient;
pub mod requests;
pub mod responses;
