//! In-memory registry of console sessions.
//!
//! Each session owns one console state. Sessions are not persisted and die with the process;
//! a session left idle for longer than the store's TTL is evicted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::navigator::ConsoleState;

/// How often the background sweep looks for idle sessions.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// One admin's console.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub state: Mutex<ConsoleState>,
    /// Unix millis of the last lookup.
    last_seen: AtomicI64,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            state: Mutex::new(ConsoleState::new()),
            last_seen: AtomicI64::new(now.timestamp_millis()),
        }
    }

    fn touch(&self, now: DateTime<Utc>) {
        self.last_seen.store(now.timestamp_millis(), Ordering::Relaxed);
    }

    fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        let millis = now.timestamp_millis() - self.last_seen.load(Ordering::Relaxed);
        Duration::from_millis(u64::try_from(millis).unwrap_or(0))
    }
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn create(&self) -> Arc<Session> {
        let now = Utc::now();
        self.evict_idle(now).await;

        let session = Arc::new(Session::new(now));
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id, session.clone());
        tracing::info!(
            session = %session.id,
            active = sessions.len(),
            "Console session created"
        );
        session
    }

    /// Look up a live session and mark it as used. Expired sessions are not returned.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.get_at(id, Utc::now()).await
    }

    async fn get_at(&self, id: Uuid, now: DateTime<Utc>) -> Option<Arc<Session>> {
        let session = self.sessions.read().await.get(&id).cloned()?;
        if session.idle_for(now) > self.ttl {
            self.remove(id).await;
            return None;
        }
        session.touch(now);
        Some(session)
    }

    /// Returns false if no such session existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(session = %id, "Console session closed");
        }
        removed
    }

    /// Drop every session idle for longer than the TTL. Returns how many were dropped.
    pub async fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for(now) <= self.ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, active = sessions.len(), "Evicted idle console sessions");
        }
        evicted
    }
}

/// Periodically evict idle sessions for the lifetime of the process.
pub fn spawn_sweeper(store: Arc<SessionStore>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            store.evict_idle(Utc::now()).await;
        }
    })
}
