use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::TeamProfileEntity,
    dto::{format_system_time, validation::validate_team_color},
};

/// Team profile returned by the team endpoint, including the selectable
/// color set from configuration.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamProfileResponse {
    /// Team display name.
    pub name: String,
    /// Current display color as `#rrggbb`.
    pub color: String,
    /// Colors offered by the picker.
    pub available_colors: Vec<String>,
    /// Last profile update, RFC3339; absent until first saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl TeamProfileResponse {
    /// Build the response from a stored profile and the configured color set.
    pub fn from_profile(profile: TeamProfileEntity, available_colors: Vec<String>) -> Self {
        Self {
            name: profile.name,
            color: profile.color,
            available_colors,
            updated_at: Some(format_system_time(profile.updated_at)),
        }
    }
}

/// Payload updating the team profile.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTeamProfileRequest {
    /// New team display name.
    pub name: String,
    /// New display color as `#rrggbb`.
    pub color: String,
}

impl Validate for UpdateTeamProfileRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() || self.name.len() > 30 {
            let mut err = validator::ValidationError::new("name_length");
            err.message = Some("Team name must be 1 to 30 characters".into());
            errors.add("name", err);
        }

        if let Err(e) = validate_team_color(&self.color) {
            errors.add("color", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
