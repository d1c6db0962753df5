use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::{MatchEntity, MatchListItemEntity, PlayerEntity, TeamProfileEntity},
    roster_store::RosterStore,
    storage::{StorageError, StorageResult},
};

/// In-memory [`RosterStore`] used by the test suite and by storage-less
/// development runs. All data lives in plain maps behind a mutex; nothing
/// survives a restart.
#[derive(Clone, Default)]
pub struct MemoryRosterStore {
    inner: Arc<Mutex<Inner>>,
    #[cfg(test)]
    fail_career_increments: Arc<std::sync::atomic::AtomicBool>,
}

#[derive(Default)]
struct Inner {
    players: HashMap<Uuid, PlayerEntity>,
    profile: Option<TeamProfileEntity>,
    matches: HashMap<Uuid, MatchEntity>,
}

impl MemoryRosterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fault-injection hook: make every career-goal increment fail until
    /// cleared, to exercise the finalize partial-failure path.
    #[cfg(test)]
    pub fn fail_career_increments(&self, fail: bool) {
        self.fail_career_increments
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RosterStore for MemoryRosterStore {
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut players: Vec<_> = store.lock().players.values().cloned().collect();
            players.sort_by_key(|player| player.number);
            Ok(players)
        })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.lock().players.get(&id).cloned()) })
    }

    fn upsert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.lock().players.insert(player.id, player);
            Ok(())
        })
    }

    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.lock().players.remove(&id).is_some()) })
    }

    fn load_team_profile(&self) -> BoxFuture<'static, StorageResult<Option<TeamProfileEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.lock().profile.clone()) })
    }

    fn save_team_profile(
        &self,
        profile: TeamProfileEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.lock().profile = Some(profile);
            Ok(())
        })
    }

    fn upsert_match(&self, record: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut inner = store.lock();
            for scorer in &record.scorers {
                if !inner.players.contains_key(&scorer.player_id) {
                    return Err(StorageError::UnknownPlayer {
                        id: scorer.player_id,
                    });
                }
            }
            inner.matches.insert(record.id, record);
            Ok(())
        })
    }

    fn increment_career_goals(
        &self,
        player_id: Uuid,
        delta: i64,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            #[cfg(test)]
            if store
                .fail_career_increments
                .load(std::sync::atomic::Ordering::SeqCst)
            {
                return Err(StorageError::unavailable(
                    "career increment fault injected".into(),
                    std::io::Error::other("injected"),
                ));
            }

            let mut inner = store.lock();
            let player = inner
                .players
                .get_mut(&player_id)
                .ok_or(StorageError::UnknownPlayer { id: player_id })?;
            let next = i64::from(player.total_goals).saturating_add(delta).max(0);
            player.total_goals = next.try_into().unwrap_or(u32::MAX);
            Ok(())
        })
    }

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchListItemEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut matches: Vec<MatchListItemEntity> = store
                .lock()
                .matches
                .values()
                .cloned()
                .map(Into::into)
                .collect();
            matches.sort_by(|a, b| b.match_date.cmp(&a.match_date));
            Ok(matches)
        })
    }

    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.lock().matches.remove(&id)) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
