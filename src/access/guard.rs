//! Route guard
//!
//! Decides, on every navigation, whether a protected view may render. The
//! decision is never cached: a session change takes effect on the next
//! navigation.

use serde::Serialize;
use tracing::debug;

use super::policy::{is_authorized, RoleSet};
use crate::auth::session::SessionManager;
use crate::auth::token::Claims;

/// Login entry point
pub const LOGIN_PATH: &str = "/login";

/// Safe landing view for authenticated users who lack a role
pub const LANDING_PATH: &str = "/dashboard";

/// Outcome of guarding a protected view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GuardDecision {
    /// Show the protected content
    Render,
    /// No session: go to the login entry point
    RedirectToLogin,
    /// Session lacks the role: go to the landing view
    RedirectToLanding,
    /// Session bootstrap has not resolved; render nothing yet
    Pending,
}

impl GuardDecision {
    /// Where a redirecting decision sends the user
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            GuardDecision::RedirectToLogin => Some(LOGIN_PATH),
            GuardDecision::RedirectToLanding => Some(LANDING_PATH),
            GuardDecision::Render | GuardDecision::Pending => None,
        }
    }
}

/// Guard a view for an already resolved session
pub fn guard(session: Option<&Claims>, allowed: RoleSet) -> GuardDecision {
    match session {
        None => GuardDecision::RedirectToLogin,
        Some(claims) if !is_authorized(claims.role, allowed) => GuardDecision::RedirectToLanding,
        Some(_) => GuardDecision::Render,
    }
}

/// Guard bound to the live session
pub struct RouteGuard<'a> {
    sessions: &'a SessionManager,
}

impl<'a> RouteGuard<'a> {
    pub fn new(sessions: &'a SessionManager) -> Self {
        Self { sessions }
    }

    /// Evaluate against the wall clock. Expired sessions are ended on the way.
    pub fn check(&self, allowed: RoleSet) -> GuardDecision {
        self.check_at(allowed, chrono::Utc::now().timestamp())
    }

    pub fn check_at(&self, allowed: RoleSet, now: i64) -> GuardDecision {
        if self.sessions.is_pending() {
            return GuardDecision::Pending;
        }

        let session = self.sessions.active_session_at(now);
        let decision = guard(session.as_ref(), allowed);
        if let Some(target) = decision.redirect_target() {
            debug!("Guard redirect to {} (allowed: {})", target, allowed);
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;

    #[test]
    fn test_guard_without_session() {
        assert_eq!(guard(None, RoleSet::ALL), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn test_guard_role_mismatch_goes_to_landing() {
        let claims = Claims::new("s", Role::Staff, i64::MAX);
        let allowed = RoleSet::of(&[Role::Admin, Role::Doctor]);

        let decision = guard(Some(&claims), allowed);
        assert_eq!(decision, GuardDecision::RedirectToLanding);
        assert_eq!(decision.redirect_target(), Some("/dashboard"));
    }

    #[test]
    fn test_guard_renders_for_allowed_role() {
        let claims = Claims::new("d", Role::Doctor, i64::MAX);
        assert_eq!(
            guard(Some(&claims), RoleSet::of(&[Role::Doctor])),
            GuardDecision::Render
        );
    }

    #[test]
    fn test_guard_empty_allow_list() {
        let claims = Claims::new("a", Role::Admin, i64::MAX);
        assert_eq!(
            guard(Some(&claims), RoleSet::EMPTY),
            GuardDecision::RedirectToLanding
        );
    }
}
