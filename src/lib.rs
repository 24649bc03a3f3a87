//! MediFlow - hospital dashboard session and access control
//!
//! This is the library interface for MediFlow: the session manager that
//! tracks who is logged in, and the role-based guards that decide which
//! dashboard views and menu entries each role may reach.

pub mod access;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;

pub use auth::{Role, SessionManager};
pub use config::Config;
pub use error::Error;
