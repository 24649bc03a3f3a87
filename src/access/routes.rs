//! Dashboard route table

use serde::Serialize;

use super::guard::{GuardDecision, RouteGuard, LANDING_PATH, LOGIN_PATH};
use super::policy::Resource;
use crate::auth::session::SessionManager;

/// A screen the dashboard can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    Login,
    Page(Resource),
    NotFound,
}

/// What a path maps to before any session is consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Redirect(&'static str),
    Login,
    Protected(Resource),
    NotFound,
}

/// Result of a navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Navigation {
    Render(View),
    Redirect(&'static str),
    /// Session bootstrap still running
    Pending,
}

/// Map a path to its route. Query strings, fragments and a trailing slash
/// are ignored.
pub fn resolve(path: &str) -> Route {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    match path {
        "/" => Route::Redirect(LANDING_PATH),
        LOGIN_PATH => Route::Login,
        other => Resource::from_path(other)
            .map(Route::Protected)
            .unwrap_or(Route::NotFound),
    }
}

/// Navigate to `path`, guarding protected views against the live session
pub fn navigate(sessions: &SessionManager, path: &str) -> Navigation {
    navigate_at(sessions, path, chrono::Utc::now().timestamp())
}

pub fn navigate_at(sessions: &SessionManager, path: &str, now: i64) -> Navigation {
    match resolve(path) {
        Route::Redirect(target) => Navigation::Redirect(target),
        Route::NotFound => Navigation::Render(View::NotFound),
        Route::Login => {
            if sessions.is_pending() {
                Navigation::Pending
            } else if sessions.active_session_at(now).is_some() {
                Navigation::Redirect(LANDING_PATH)
            } else {
                Navigation::Render(View::Login)
            }
        }
        Route::Protected(resource) => {
            match RouteGuard::new(sessions).check_at(resource.allowed_roles(), now) {
                GuardDecision::Render => Navigation::Render(View::Page(resource)),
                GuardDecision::RedirectToLogin => Navigation::Redirect(LOGIN_PATH),
                GuardDecision::RedirectToLanding => Navigation::Redirect(LANDING_PATH),
                GuardDecision::Pending => Navigation::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_root_redirects() {
        assert_eq!(resolve("/"), Route::Redirect("/dashboard"));
        assert_eq!(resolve(""), Route::Redirect("/dashboard"));
    }

    #[test]
    fn test_resolve_known_paths() {
        assert_eq!(resolve("/login"), Route::Login);
        assert_eq!(resolve("/beds"), Route::Protected(Resource::BedManagement));
        assert_eq!(resolve("/beds/"), Route::Protected(Resource::BedManagement));
        assert_eq!(
            resolve("/blood-bank?group=O-#top"),
            Route::Protected(Resource::BloodBank)
        );
    }

    #[test]
    fn test_resolve_unknown_path() {
        assert_eq!(resolve("/pharmacy"), Route::NotFound);
        assert_eq!(resolve("/dashboard/extra"), Route::NotFound);
    }
}
