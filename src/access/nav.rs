//! Navigation filtering
//!
//! Hides menu entries the current role cannot open. Cosmetic only; every
//! target is still guarded.

use serde::Serialize;

use super::policy::{is_authorized, Resource, RoleSet};
use crate::auth::token::Claims;

/// A navigation menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub title: String,
    pub path: String,
    pub allowed_roles: RoleSet,
}

impl NavLink {
    pub fn new(title: impl Into<String>, path: impl Into<String>, allowed_roles: RoleSet) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            allowed_roles,
        }
    }
}

impl From<Resource> for NavLink {
    fn from(resource: Resource) -> Self {
        NavLink::new(resource.title(), resource.path(), resource.allowed_roles())
    }
}

/// The dashboard menu, in display order
pub fn default_links() -> Vec<NavLink> {
    Resource::ALL.into_iter().map(NavLink::from).collect()
}

/// Links the session may open, in input order
pub fn visible_items<'a>(session: Option<&Claims>, links: &'a [NavLink]) -> Vec<&'a NavLink> {
    let Some(claims) = session else {
        return Vec::new();
    };

    links
        .iter()
        .filter(|link| is_authorized(claims.role, link.allowed_roles))
        .collect()
}

/// Paths of the links the session may open, in input order
pub fn visible_links<'a>(session: Option<&Claims>, links: &'a [NavLink]) -> Vec<&'a str> {
    visible_items(session, links)
        .into_iter()
        .map(|link| link.path.as_str())
        .collect()
}
