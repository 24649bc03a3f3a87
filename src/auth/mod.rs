//! Authentication and session management

pub mod backend;
pub mod models;
pub mod session;
pub mod store;
pub mod token;

pub use backend::{AuthBackend, HttpAuthBackend, MockAuthBackend};
pub use models::{LoginRequest, LoginResponse, RegisterRequest, Role, User};
pub use session::{SessionManager, SessionState};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use token::{decode, decode_active, Claims};
