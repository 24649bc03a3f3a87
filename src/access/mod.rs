//! Role-based access control for dashboard views

pub mod guard;
pub mod nav;
pub mod policy;
pub mod routes;

pub use guard::{guard, GuardDecision, RouteGuard, LANDING_PATH, LOGIN_PATH};
pub use nav::{default_links, visible_items, visible_links, NavLink};
pub use policy::{is_authorized, Resource, RoleSet};
pub use routes::{navigate, resolve, Navigation, Route, View};
