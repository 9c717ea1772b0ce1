// libs/intake-cell/src/services/store.rs
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant};
use tracing::{debug, info};

use appointment_cell::{SessionKey, SharedRoster};

use crate::error::IntakeError;
use crate::services::flow::IntakeFlow;

pub type SharedFlow = Arc<Mutex<IntakeFlow>>;

struct StoredSession {
    flow: SharedFlow,
    last_seen: Instant,
}

/// Live intake sessions keyed by session id.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionKey, StoredSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> (SessionKey, SharedFlow) {
        let flow = IntakeFlow::new();
        let key = flow.key();
        let shared = Arc::new(Mutex::new(flow));

        self.sessions.write().await.insert(
            key,
            StoredSession {
                flow: shared.clone(),
                last_seen: Instant::now(),
            },
        );
        info!("Opened intake session {}", key);
        (key, shared)
    }

    /// Looks the session up and marks it as active.
    pub async fn get(&self, key: SessionKey) -> Result<SharedFlow, IntakeError> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(&key).ok_or(IntakeError::SessionNotFound(key))?;
        stored.last_seen = Instant::now();
        Ok(stored.flow.clone())
    }

    /// Drops the session. The caller is responsible for logging it out first
    /// so any slot hold is released.
    pub async fn remove(&self, key: SessionKey) -> Result<SharedFlow, IntakeError> {
        let removed = self
            .sessions
            .write()
            .await
            .remove(&key)
            .ok_or(IntakeError::SessionNotFound(key))?;
        debug!("Closed intake session {}", key);
        Ok(removed.flow)
    }

    /// Drops every session untouched for at least `idle_for` and releases its
    /// slot hold. Returns how many were evicted.
    pub async fn evict_idle(&self, roster: &SharedRoster, idle_for: Duration) -> usize {
        let evicted: Vec<(SessionKey, SharedFlow)> = {
            let mut sessions = self.sessions.write().await;
            let idle: Vec<SessionKey> = sessions
                .iter()
                .filter(|(_, stored)| stored.last_seen.elapsed() >= idle_for)
                .map(|(key, _)| *key)
                .collect();
            idle.into_iter()
                .filter_map(|key| sessions.remove(&key).map(|stored| (key, stored.flow)))
                .collect()
        };

        for (key, flow) in &evicted {
            let mut flow = flow.lock().await;
            let mut roster = roster.write().await;
            flow.logout(&mut roster);
            info!("Evicted idle intake session {}", key);
        }
        evicted.len()
    }

    /// Periodically evicts idle sessions and prunes lapsed slot holds.
    pub fn spawn_sweeper(&self, roster: SharedRoster, idle_for: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut sweep_interval = interval(every);
            loop {
                sweep_interval.tick().await;

                let evicted = store.evict_idle(&roster, idle_for).await;
                let pruned = roster.write().await.prune_expired_holds();
                if evicted > 0 || pruned > 0 {
                    debug!("Sweep evicted {} sessions and pruned {} holds", evicted, pruned);
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
