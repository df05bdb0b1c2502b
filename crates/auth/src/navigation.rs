//! # Navigation Authorization
//!
//! Pure mapping from a viewer's role to the destinations it may see and
//! reach. Tiers are not numerically ordered: each tier lists the roles that
//! satisfy it.

use serde::Serialize;

use crate::roles::RoleName;

/// Minimum-role tier guarding a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Any authenticated role.
    Base,
    /// Coordinator or admin.
    Coordinator,
    /// Admin only.
    Admin,
}

impl Tier {
    pub fn permits(&self, role: RoleName) -> bool {
        match (self, role) {
            (Tier::Base, _) => true,
            (Tier::Coordinator, RoleName::Admin | RoleName::Coordinator) => true,
            (Tier::Coordinator, RoleName::Teacher) => false,
            (Tier::Admin, RoleName::Admin) => true,
            (Tier::Admin, RoleName::Coordinator | RoleName::Teacher) => false,
        }
    }
}

/// A named screen reachable by URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Landing,
    Login,
    Incidents,
    Students,
    Groups,
    Categories,
    Dashboard,
    Users,
}

impl Destination {
    pub const ALL: [Destination; 8] = [
        Destination::Landing,
        Destination::Login,
        Destination::Incidents,
        Destination::Students,
        Destination::Groups,
        Destination::Categories,
        Destination::Dashboard,
        Destination::Users,
    ];

    /// Sidebar order.
    const MENU: [Destination; 6] = [
        Destination::Incidents,
        Destination::Students,
        Destination::Groups,
        Destination::Categories,
        Destination::Dashboard,
        Destination::Users,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => error::LOGIN_PATH,
            Self::Incidents => error::BASE_PATH,
            Self::Students => "/students",
            Self::Groups => "/groups",
            Self::Categories => "/categories",
            Self::Dashboard => "/dashboard",
            Self::Users => "/users",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Landing => "Home",
            Self::Login => "Sign in",
            Self::Incidents => "Incidents",
            Self::Students => "Students",
            Self::Groups => "Groups",
            Self::Categories => "Categories",
            Self::Dashboard => "Dashboard",
            Self::Users => "Users",
        }
    }

    /// Tier required to reach this destination; `None` means public.
    pub fn required_tier(&self) -> Option<Tier> {
        match self {
            Self::Landing | Self::Login => None,
            Self::Incidents | Self::Students => Some(Tier::Base),
            Self::Groups | Self::Categories | Self::Dashboard => Some(Tier::Coordinator),
            Self::Users => Some(Tier::Admin),
        }
    }
}

/// Outcome of a direct visit to a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// No viewer; send to the login screen.
    RedirectToLogin,
    /// Viewer below the destination's tier; soft-redirect elsewhere.
    RedirectTo(Destination),
}

/// Whether `role` may reach `destination`. `None` is an unauthenticated viewer.
pub fn is_authorized(role: Option<RoleName>, destination: Destination) -> bool {
    match (destination.required_tier(), role) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(tier), Some(role)) => tier.permits(role),
    }
}

/// Every destination `role` may reach, in declaration order.
pub fn allowed_destinations(role: Option<RoleName>) -> Vec<Destination> {
    Destination::ALL
        .into_iter()
        .filter(|destination| is_authorized(role, *destination))
        .collect()
}

/// Decides what happens when `role` visits `destination` directly.
pub fn gate(role: Option<RoleName>, destination: Destination) -> GateDecision {
    if is_authorized(role, destination) {
        GateDecision::Allow
    }
    else if role.is_none() {
        GateDecision::RedirectToLogin
    }
    else {
        GateDecision::RedirectTo(Destination::Incidents)
    }
}

/// Sidebar entries visible to `role`. Empty for an unauthenticated viewer.
pub fn menu(role: Option<RoleName>) -> Vec<Destination> {
    Destination::MENU
        .into_iter()
        .filter(|destination| is_authorized(role, *destination))
        .collect()
}
