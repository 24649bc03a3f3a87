//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::sync::Arc;

use crate::access::{self, default_links, visible_items};
use crate::api;
use crate::auth::{
    AuthBackend, FileCredentialStore, HttpAuthBackend, MockAuthBackend, Role, SessionManager,
};
use crate::cli::{info, print_nav_table, print_navigation, print_session, success, warn, OutputFormat};
use crate::config::{self, BackendKind, Config};
use crate::error::AuthError;

/// Initialize a new mediflow.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("mediflow.toml");

    if config_path.exists() {
        warn("mediflow.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created mediflow.toml");
    info("Run 'mediflow serve-auth' for a local auth endpoint, then 'mediflow login'");

    Ok(())
}

/// Log in and persist the session
pub async fn login(email: &str, role: Role, password: Option<String>) -> Result<()> {
    let config = config::load_config_or_default()?;
    let sessions = session_manager(&config)?;
    sessions.bootstrap();

    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    match sessions.login(email, &password, role).await {
        Ok(()) => {
            success("Login Successful. Welcome back!");
            if let Some(claims) = sessions.current_session() {
                print_session(&claims);
            }
            Ok(())
        }
        Err(e) => Err(auth_failure("Login failed", e)),
    }
}

/// Clear the stored session
pub async fn logout() -> Result<()> {
    let config = config::load_config_or_default()?;
    let sessions = session_manager(&config)?;
    sessions.bootstrap();

    sessions.logout();
    success("Logged out");
    Ok(())
}

/// Show the current session
pub async fn whoami(format: OutputFormat) -> Result<()> {
    let config = config::load_config_or_default()?;
    let sessions = session_manager(&config)?;
    sessions.bootstrap();

    let session = sessions.active_session();
    match format {
        OutputFormat::Table => match &session {
            Some(claims) => print_session(claims),
            None => info("Not logged in"),
        },
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&session)?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// List navigation links for the current session
pub async fn nav() -> Result<()> {
    let config = config::load_config_or_default()?;
    let sessions = session_manager(&config)?;
    sessions.bootstrap();

    let links = default_links();
    let session = sessions.active_session();
    print_nav_table(&visible_items(session.as_ref(), &links));
    Ok(())
}

/// Run the route guard for a path
pub async fn open(path: &str) -> Result<()> {
    let config = config::load_config_or_default()?;
    let sessions = session_manager(&config)?;
    sessions.bootstrap();

    print_navigation(path, access::navigate(&sessions, path));
    Ok(())
}

/// Create an account on the configured backend
pub async fn register(email: &str, role: Role, password: Option<String>) -> Result<()> {
    let config = config::load_config_or_default()?;
    let sessions = session_manager(&config)?;

    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    match sessions.register(email, &password, role).await {
        Ok(()) => {
            success(&format!("Registered {} as {}", email, role));
            Ok(())
        }
        Err(e) => Err(auth_failure("Registration failed", e)),
    }
}

/// Start the development auth server
pub async fn serve_auth(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = config::load_config_or_default()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    if config.server.users.is_empty() {
        warn("No seeded users; register accounts with 'mediflow register'");
    }
    info(&format!(
        "Starting auth server on http://{}:{}",
        config.server.host, config.server.port
    ));

    api::run_server(&config.server).await?;
    Ok(())
}

// Helper functions

fn session_manager(config: &Config) -> Result<SessionManager> {
    let store = Arc::new(FileCredentialStore::new(&config.store.path));
    let backend: Arc<dyn AuthBackend> = match config.auth.backend {
        BackendKind::Remote => Arc::new(HttpAuthBackend::new(&config.auth)?),
        BackendKind::Mock => Arc::new(MockAuthBackend::new(config.mock.clone())),
    };
    Ok(SessionManager::new(store, backend))
}

fn prompt_password() -> Result<String> {
    let password = dialoguer::Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;
    Ok(password)
}

/// Error for a failed auth call. Only the user-facing message is shown; the
/// underlying cause goes to the debug log.
fn auth_failure(context: &str, e: AuthError) -> anyhow::Error {
    tracing::debug!("{}: {}", context, e);
    anyhow::anyhow!("{}: {}", context, e.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_hides_cause() {
        let expected = "Login failed: Invalid credentials or role. Please try again.";
        assert_eq!(
            auth_failure("Login failed", AuthError::InvalidCredentials).to_string(),
            expected
        );
        assert_eq!(
            auth_failure(
                "Login failed",
                AuthError::Unreachable("connection refused".to_string())
            )
            .to_string(),
            expected
        );
    }
}
