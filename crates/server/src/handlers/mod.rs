//! # Screen Handlers
//!
//! One module per screen. Each handler takes the application state, the
//! resolved viewer where it needs one, and an already-validated request.
//! Lists are ordered by their display field with the id as tiebreaker so
//! the order is stable.

pub mod categories;
pub mod dashboard;
pub mod groups;
pub mod incidents;
pub mod session;
pub mod students;
pub mod users;

use std::collections::HashMap;

use entity::users as users_entity;
use error::Result;
use sea_orm::{ConnectionTrait, EntityTrait};
use uuid::Uuid;

/// Display names of every user, keyed by id.
pub(crate) async fn user_names<C>(db: &C) -> Result<HashMap<Uuid, String>>
where
    C: ConnectionTrait,
{
    Ok(users_entity::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|user| (user.id, user.display_name))
        .collect())
}
