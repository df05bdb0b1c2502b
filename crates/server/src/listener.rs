//! # Navigation Listener
//!
//! Subscribes to session events and re-evaluates, for the affected
//! identity, the destinations it may currently reach. The outcome is logged
//! under the `access` target. Requests never read it: the gate and the
//! `/navigation` endpoint resolve the viewer themselves.

use std::sync::Arc;

use auth::{allowed_destinations, resolve_role, AuthProvider, Destination, SessionEvent};
use sea_orm::DatabaseConnection;
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};

/// Handle to the background listener task.
pub struct NavigationWatcher {
    handle: JoinHandle<()>,
}

impl NavigationWatcher {
    /// Starts listening on `auth`'s session events.
    pub fn spawn(db: DatabaseConnection, auth: &Arc<dyn AuthProvider>) -> Self {
        let mut events = auth.subscribe();

        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let allowed = reevaluate(&db, &event).await;
                        tracing::info!(
                            target: "access",
                            user_id = %event.identity(),
                            event = event.kind(),
                            allowed = ?allowed,
                            "Navigation re-evaluated"
                        );
                    },
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(target: "access", missed, "Navigation listener fell behind");
                    },
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Self {
            handle,
        }
    }

    pub fn is_finished(&self) -> bool { self.handle.is_finished() }

    pub fn abort(&self) { self.handle.abort(); }
}

/// Destinations the event's identity may reach after `event`.
///
/// A sign-out leaves only the public destinations. Every other event
/// re-resolves the identity's role, so a missing user also falls back to the
/// public set.
pub async fn reevaluate(db: &DatabaseConnection, event: &SessionEvent) -> Vec<Destination> {
    let role = match event {
        SessionEvent::SignedOut {
            ..
        } => None,
        _ => resolve_role(db, Some(event.identity())).await.role(),
    };
    allowed_destinations(role)
}
