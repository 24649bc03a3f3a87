//! Development authentication endpoint

pub mod routes;
pub mod server;

pub use server::*;
