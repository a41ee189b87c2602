use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::admin::manager::DropOutcome;

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub dragged_id: Uuid,
    pub target_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteQuery {
    pub confirm: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WindowQuery {
    pub days: Option<u32>,
}

/// Result of a drag gesture: whether anything moved and the order now held.
#[derive(Debug, Serialize)]
pub struct MoveResponse<E> {
    pub changed: bool,
    pub items: Vec<E>,
}

impl<E> MoveResponse<E> {
    pub fn new(outcome: &DropOutcome, items: Vec<E>) -> Self {
        Self {
            changed: matches!(outcome, DropOutcome::Reordered { .. }),
            items,
        }
    }
}
