//! # Role Resolver
//!
//! Turns an authenticated identity into a [`Viewer`]: the user row joined to
//! its role. Every failure path (no identity, no user row, store error)
//! resolves to [`Viewer::Unauthenticated`].

use std::{fmt, str::FromStr};

use entity::{roles, users};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of authorization roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Admin,
    Coordinator,
    Teacher,
}

impl RoleName {
    pub const ALL: [RoleName; 3] = [RoleName::Admin, RoleName::Coordinator, RoleName::Teacher];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Coordinator => "coordinator",
            Self::Teacher => "teacher",
        }
    }

    /// Human-readable label used in menus and the user list.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Coordinator => "Coordinator",
            Self::Teacher => "Teacher",
        }
    }

    /// Maps a stored role name onto the closed set.
    ///
    /// Names outside the set degrade to [`RoleName::Teacher`], the lowest tier.
    pub fn from_db(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(target: "auth", role = name, "Unknown role name, treating as teacher");
            Self::Teacher
        })
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for RoleName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(Self::Admin),
            "coordinator" => Ok(Self::Coordinator),
            "teacher" => Ok(Self::Teacher),
            other => Err(AppError::validation(format!("Unknown role: {}", other))),
        }
    }
}

/// Display label for a stored role name; unknown names are shown verbatim.
pub fn role_label(name: &str) -> String {
    name.parse::<RoleName>()
        .map(|role| role.label().to_string())
        .unwrap_or_else(|_| name.to_string())
}

/// Who is looking at the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Viewer {
    Unauthenticated,
    Authenticated {
        identity:     Uuid,
        role:         RoleName,
        display_name: String,
    },
}

impl Viewer {
    pub fn role(&self) -> Option<RoleName> {
        match self {
            Self::Unauthenticated => None,
            Self::Authenticated {
                role, ..
            } => Some(*role),
        }
    }

    pub fn identity(&self) -> Option<Uuid> {
        match self {
            Self::Unauthenticated => None,
            Self::Authenticated {
                identity, ..
            } => Some(*identity),
        }
    }

    /// The acting identity for a mutation.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for an unauthenticated viewer.
    pub fn require_identity(&self) -> Result<Uuid> {
        self.identity()
            .ok_or_else(|| AppError::unauthorized("Sign in required"))
    }
}

/// Resolves the viewer for an identity.
///
/// # Arguments
///
/// * `db` - Database connection
/// * `identity` - The identity from the auth provider, if any
///
/// # Returns
///
/// `Viewer::Unauthenticated` when there is no identity, no matching user, or
/// the lookup fails. A user whose role row is missing resolves to the lowest
/// tier.
pub async fn resolve_role<C>(db: &C, identity: Option<Uuid>) -> Viewer
where
    C: ConnectionTrait,
{
    let Some(identity) = identity
    else {
        return Viewer::Unauthenticated;
    };

    let found = users::Entity::find_by_id(identity)
        .find_also_related(roles::Entity)
        .one(db)
        .await;

    match found {
        Ok(Some((user, role))) => {
            let role = role.map_or_else(
                || {
                    tracing::warn!(target: "auth", user_id = %identity, "User has no role row, treating as teacher");
                    RoleName::Teacher
                },
                |role| RoleName::from_db(&role.name),
            );
            tracing::debug!(target: "auth", user_id = %identity, role = %role, "Resolved viewer role");
            Viewer::Authenticated {
                identity,
                role,
                display_name: user.display_name,
            }
        },
        Ok(None) => {
            tracing::info!(target: "auth", user_id = %identity, "No user row for identity");
            Viewer::Unauthenticated
        },
        Err(e) => {
            tracing::error!(target: "auth", user_id = %identity, error = %e, "Role lookup failed, denying access");
            Viewer::Unauthenticated
        },
    }
}

/// Loads a role by its name.
///
/// # Errors
///
/// Returns `NotFound` when no such role exists.
pub async fn find_role_by_name<C>(db: &C, name: &str) -> Result<roles::Model>
where
    C: ConnectionTrait,
{
    roles::Entity::find()
        .filter(roles::Column::Name.eq(name))
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Role '{}'", name)))
}

/// Assigns a role to a user
///
/// # Arguments
///
/// * `db` - Database connection
/// * `user_id` - The user to update
/// * `role_id` - The role to assign; must exist
///
/// # Errors
///
/// Returns `NotFound` if either the user or the role does not exist.
pub async fn assign_role<C>(db: &C, user_id: Uuid, role_id: Uuid) -> Result<users::Model>
where
    C: ConnectionTrait,
{
    let role = roles::Entity::find_by_id(role_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Role"))?;

    let user = users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let mut active = user.into_active_model();
    active.role_id = Set(role.id);
    let updated = active.update(db).await?;

    tracing::info!(target: "auth", user_id = %user_id, role = %role.name, "Assigned role to user");

    Ok(updated)
}
