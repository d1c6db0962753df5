use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        MongoMatchDocument, MongoPlayerDocument, MongoTeamProfileDocument, TEAM_PROFILE_DOC_ID,
        doc_id,
    },
};
use crate::dao::{
    models::{MatchEntity, MatchListItemEntity, PlayerEntity, TeamProfileEntity},
    roster_store::RosterStore,
    storage::{StorageError, StorageResult},
};

const PLAYER_COLLECTION_NAME: &str = "players";
const MATCH_COLLECTION_NAME: &str = "matches";
const TEAM_COLLECTION_NAME: &str = "team";

/// MongoDB-backed [`RosterStore`] holding the roster, the singleton team
/// profile, and finalized match records.
#[derive(Clone)]
pub struct MongoRosterStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoRosterStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        let players = database.collection::<MongoPlayerDocument>(PLAYER_COLLECTION_NAME);
        let player_index = mongodb::IndexModel::builder()
            .keys(doc! {"number": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("player_number_idx".to_owned()))
                    .build(),
            )
            .build();
        players
            .create_index(player_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PLAYER_COLLECTION_NAME,
                index: "number",
                source,
            })?;

        let matches = database.collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME);
        let match_index = mongodb::IndexModel::builder()
            .keys(doc! {"match_date": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("match_date_idx".to_owned()))
                    .build(),
            )
            .build();
        matches
            .create_index(match_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: MATCH_COLLECTION_NAME,
                index: "match_date",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn player_collection(&self) -> Collection<MongoPlayerDocument> {
        self.database()
            .await
            .collection::<MongoPlayerDocument>(PLAYER_COLLECTION_NAME)
    }

    async fn match_collection(&self) -> Collection<MongoMatchDocument> {
        self.database()
            .await
            .collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME)
    }

    async fn team_collection(&self) -> Collection<MongoTeamProfileDocument> {
        self.database()
            .await
            .collection::<MongoTeamProfileDocument>(TEAM_COLLECTION_NAME)
    }

    async fn list_players(&self) -> MongoResult<Vec<PlayerEntity>> {
        let collection = self.player_collection().await;

        let documents: Vec<MongoPlayerDocument> = collection
            .find(doc! {})
            .sort(doc! {"number": 1})
            .await
            .map_err(|source| MongoDaoError::LoadPlayers { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadPlayers { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn find_player(&self, id: Uuid) -> MongoResult<Option<PlayerEntity>> {
        let collection = self.player_collection().await;

        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadPlayers { source })?;

        Ok(document.map(Into::into))
    }

    async fn upsert_player(&self, player: PlayerEntity) -> MongoResult<()> {
        let id = player.id;
        let document: MongoPlayerDocument = player.into();
        let collection = self.player_collection().await;

        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SavePlayer { id, source })?;

        Ok(())
    }

    async fn delete_player(&self, id: Uuid) -> MongoResult<bool> {
        let collection = self.player_collection().await;
        let result = collection
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeletePlayer { id, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn load_team_profile(&self) -> MongoResult<Option<TeamProfileEntity>> {
        let collection = self.team_collection().await;

        let document = collection
            .find_one(doc! {"_id": TEAM_PROFILE_DOC_ID})
            .await
            .map_err(|source| MongoDaoError::LoadProfile { source })?;

        Ok(document.map(Into::into))
    }

    async fn save_team_profile(&self, profile: TeamProfileEntity) -> MongoResult<()> {
        let document: MongoTeamProfileDocument = profile.into();
        let collection = self.team_collection().await;

        collection
            .replace_one(doc! {"_id": TEAM_PROFILE_DOC_ID}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveProfile { source })?;

        Ok(())
    }

    async fn upsert_match(&self, record: MatchEntity) -> MongoResult<()> {
        let id = record.id;
        let document: MongoMatchDocument = record.into();
        let collection = self.match_collection().await;

        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveMatch { id, source })?;

        Ok(())
    }

    async fn increment_career_goals(&self, player_id: Uuid, delta: i64) -> MongoResult<u64> {
        let collection = self.player_collection().await;

        let result = collection
            .update_one(doc_id(player_id), doc! {"$inc": {"total_goals": delta}})
            .await
            .map_err(|source| MongoDaoError::IncrementGoals { player_id, source })?;

        Ok(result.matched_count)
    }

    async fn list_matches(&self) -> MongoResult<Vec<MatchListItemEntity>> {
        let collection = self.match_collection().await;

        let documents: Vec<MongoMatchDocument> = collection
            .find(doc! {})
            .sort(doc! {"match_date": -1})
            .await
            .map_err(|source| MongoDaoError::ListMatches { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListMatches { source })?;

        Ok(documents
            .into_iter()
            .map(|document| {
                let entity: MatchEntity = document.into();
                entity.into()
            })
            .collect())
    }

    async fn delete_match(&self, id: Uuid) -> MongoResult<Option<MatchEntity>> {
        let collection = self.match_collection().await;

        let document = collection
            .find_one_and_delete(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteMatch { id, source })?;

        Ok(document.map(Into::into))
    }
}

impl RosterStore for MongoRosterStore {
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_players().await.map_err(Into::into) })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_player(id).await.map_err(Into::into) })
    }

    fn upsert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.upsert_player(player).await.map_err(Into::into) })
    }

    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_player(id).await.map_err(Into::into) })
    }

    fn load_team_profile(&self) -> BoxFuture<'static, StorageResult<Option<TeamProfileEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.load_team_profile().await.map_err(Into::into) })
    }

    fn save_team_profile(
        &self,
        profile: TeamProfileEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_team_profile(profile).await.map_err(Into::into) })
    }

    fn upsert_match(&self, record: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            // Scorer references must point at existing roster entries.
            for scorer in &record.scorers {
                let found = store.find_player(scorer.player_id).await?;
                if found.is_none() {
                    return Err(StorageError::UnknownPlayer {
                        id: scorer.player_id,
                    });
                }
            }

            store.upsert_match(record).await.map_err(Into::into)
        })
    }

    fn increment_career_goals(
        &self,
        player_id: Uuid,
        delta: i64,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let matched = store.increment_career_goals(player_id, delta).await?;
            if matched == 0 {
                return Err(StorageError::UnknownPlayer { id: player_id });
            }
            Ok(())
        })
    }

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchListItemEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_matches().await.map_err(Into::into) })
    }

    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.delete_match(id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
