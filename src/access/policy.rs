//! Access policy
//!
//! Every protected resource declares the roles allowed to reach it. The
//! allow-lists are static; nothing mutates them at runtime.

use serde::Serialize;
use std::fmt;

use crate::auth::models::Role;

/// A set of roles, stored as a bitmask
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    /// Nobody is allowed
    pub const EMPTY: RoleSet = RoleSet(0);

    pub const ALL: RoleSet = RoleSet::of(&Role::ALL);

    pub const fn of(roles: &[Role]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < roles.len() {
            bits |= Self::bit(roles[i]);
            i += 1;
        }
        RoleSet(bits)
    }

    const fn bit(role: Role) -> u8 {
        match role {
            Role::Admin => 0b001,
            Role::Doctor => 0b010,
            Role::Staff => 0b100,
        }
    }

    pub const fn contains(self, role: Role) -> bool {
        self.0 & Self::bit(role) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |role| self.contains(*role))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        RoleSet(iter.into_iter().fold(0, |bits, role| bits | Self::bit(role)))
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "nobody");
        }
        let names: Vec<String> = self.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", names.join(", "))
    }
}

impl Serialize for RoleSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Grant iff `role` is in `allowed`. An empty allow-list grants nobody.
pub fn is_authorized(role: Role, allowed: RoleSet) -> bool {
    allowed.contains(role)
}

/// Protected dashboard screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resource {
    Dashboard,
    Patients,
    IllnessInsights,
    BedManagement,
    BloodBank,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Dashboard,
        Resource::Patients,
        Resource::IllnessInsights,
        Resource::BedManagement,
        Resource::BloodBank,
    ];

    pub const fn allowed_roles(self) -> RoleSet {
        match self {
            Resource::Dashboard | Resource::Patients | Resource::BloodBank => RoleSet::ALL,
            Resource::IllnessInsights => RoleSet::of(&[Role::Admin, Role::Doctor]),
            Resource::BedManagement => RoleSet::of(&[Role::Admin, Role::Staff]),
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Resource::Dashboard => "/dashboard",
            Resource::Patients => "/patients",
            Resource::IllnessInsights => "/illness",
            Resource::BedManagement => "/beds",
            Resource::BloodBank => "/blood-bank",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Resource::Dashboard => "Dashboard",
            Resource::Patients => "Patients",
            Resource::IllnessInsights => "Illness Insights",
            Resource::BedManagement => "Bed Management",
            Resource::BloodBank => "Blood Bank",
        }
    }

    pub fn from_path(path: &str) -> Option<Resource> {
        Resource::ALL.into_iter().find(|r| r.path() == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_grants_nobody() {
        for role in Role::ALL {
            assert!(!is_authorized(role, RoleSet::EMPTY));
        }
    }

    #[test]
    fn test_role_set_membership() {
        let set = RoleSet::of(&[Role::Admin, Role::Staff]);
        assert!(set.contains(Role::Admin));
        assert!(!set.contains(Role::Doctor));
        assert!(set.contains(Role::Staff));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Role::Admin, Role::Staff]);
        assert_eq!(set, [Role::Staff, Role::Admin].into_iter().collect());
    }

    #[test]
    fn test_role_set_display() {
        assert_eq!(RoleSet::of(&[Role::Doctor, Role::Admin]).to_string(), "Admin, Doctor");
        assert_eq!(RoleSet::EMPTY.to_string(), "nobody");
    }

    #[test]
    fn test_resource_paths_roundtrip() {
        for resource in Resource::ALL {
            assert_eq!(Resource::from_path(resource.path()), Some(resource));
            assert!(!resource.allowed_roles().is_empty());
        }
        assert_eq!(Resource::from_path("/pharmacy"), None);
    }
}
