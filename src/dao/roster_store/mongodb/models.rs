use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{MatchEntity, MatchScorerEntity, PlayerEntity, TeamProfileEntity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlayerDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    number: u8,
    is_active: bool,
    total_goals: i64,
    created_at: DateTime,
}

impl From<PlayerEntity> for MongoPlayerDocument {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            number: value.number,
            is_active: value.is_active,
            total_goals: i64::from(value.total_goals),
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoPlayerDocument> for PlayerEntity {
    fn from(value: MongoPlayerDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            number: value.number,
            is_active: value.is_active,
            // The atomic `$inc` can transiently push the stored total below
            // zero when a match delete races a finalize; clamp on read.
            total_goals: value.total_goals.max(0).try_into().unwrap_or(u32::MAX),
            created_at: value.created_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTeamProfileDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    color: String,
    updated_at: DateTime,
}

/// Fixed id of the singleton team profile document.
pub const TEAM_PROFILE_DOC_ID: &str = "team-profile";

impl From<TeamProfileEntity> for MongoTeamProfileDocument {
    fn from(value: TeamProfileEntity) -> Self {
        Self {
            id: TEAM_PROFILE_DOC_ID.to_owned(),
            name: value.name,
            color: value.color,
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoTeamProfileDocument> for TeamProfileEntity {
    fn from(value: MongoTeamProfileDocument) -> Self {
        Self {
            name: value.name,
            color: value.color,
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMatchDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    opponent_name: String,
    self_score: u32,
    opponent_score: u32,
    match_date: DateTime,
    duration_seconds: u64,
    photo_url: Option<String>,
    scorers: Vec<MatchScorerEntity>,
    created_at: DateTime,
}

impl From<MatchEntity> for MongoMatchDocument {
    fn from(value: MatchEntity) -> Self {
        Self {
            id: value.id,
            opponent_name: value.opponent_name,
            self_score: value.self_score,
            opponent_score: value.opponent_score,
            match_date: DateTime::from_system_time(value.match_date),
            duration_seconds: value.duration_seconds,
            photo_url: value.photo_url,
            scorers: value.scorers,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoMatchDocument> for MatchEntity {
    fn from(value: MongoMatchDocument) -> Self {
        Self {
            id: value.id,
            opponent_name: value.opponent_name,
            self_score: value.self_score,
            opponent_score: value.opponent_score,
            match_date: value.match_date.to_system_time(),
            duration_seconds: value.duration_seconds,
            photo_url: value.photo_url,
            scorers: value.scorers,
            created_at: value.created_at.to_system_time(),
        }
    }
}

/// Filter selecting a document by its uuid primary key.
///
/// Uuid fields serialize as hyphenated strings through serde, so the filter
/// must match with the same representation.
pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": id.to_string()}
}
