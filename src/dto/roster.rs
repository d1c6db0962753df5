use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::PlayerEntity,
    dto::{format_system_time, validation::validate_shirt_number},
};

/// Payload creating a roster entry. New players start active with a zero
/// career total.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePlayerRequest {
    /// Display name.
    pub name: String,
    /// Shirt number (1-99).
    pub number: u8,
}

impl Validate for CreatePlayerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() || self.name.len() > 30 {
            let mut err = validator::ValidationError::new("name_length");
            err.message = Some("Player name must be 1 to 30 characters".into());
            errors.add("name", err);
        }

        if let Err(e) = validate_shirt_number(self.number) {
            errors.add("number", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Partial update of a roster entry. Omitted fields keep their value.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePlayerRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New shirt number (1-99).
    #[serde(default)]
    pub number: Option<u8>,
    /// Whether the player joins the next squad snapshot.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Validate for UpdatePlayerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(ref name) = self.name {
            if name.trim().is_empty() || name.len() > 30 {
                let mut err = validator::ValidationError::new("name_length");
                err.message = Some("Player name must be 1 to 30 characters".into());
                errors.add("name", err);
            }
        }

        if let Some(number) = self.number {
            if let Err(e) = validate_shirt_number(number) {
                errors.add("number", e);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Roster entry projection returned by the player endpoints.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct PlayerSummary {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Shirt number.
    pub number: u8,
    /// Whether the player joins the next squad snapshot.
    pub is_active: bool,
    /// Cumulative career goal total.
    pub total_goals: u32,
    /// Creation timestamp, RFC3339.
    pub created_at: String,
}

impl From<PlayerEntity> for PlayerSummary {
    fn from(player: PlayerEntity) -> Self {
        Self {
            id: player.id,
            name: player.name,
            number: player.number,
            is_active: player.is_active,
            total_goals: player.total_goals,
            created_at: format_system_time(player.created_at),
        }
    }
}
