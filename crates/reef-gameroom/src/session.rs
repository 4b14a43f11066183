use reef_anticheat::{AnomalyTracker, SequenceTracker, SessionLimiter};
use reef_config::RateLimitConfig;
use reef_core::{PlayerId, RoomId, SessionId};
use reef_crypto::SessionKeys;
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

/// A session idle this long (no packet in either direction) is reaped by
/// [`SessionTable::reap_idle`].
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Everything the controller keeps about one connected client: its
/// negotiated session keys, the wire-level replay counters, the anti-cheat
/// trackers that belong to this connection alone, and what it's bound to.
pub struct Session {
    pub id: SessionId,
    pub ip: IpAddr,
    pub keys: Option<SessionKeys>,
    pub last_client_nonce: u64,
    pub server_nonce: u64,
    pub sequence: SequenceTracker,
    pub limiter: SessionLimiter,
    pub anomaly: AnomalyTracker,
    pub player_id: Option<PlayerId>,
    pub room_id: Option<RoomId>,
    pub created_at: Instant,
    pub last_activity: Instant,
}

impl Session {
    pub fn new(id: SessionId, ip: IpAddr, rate_limits: &RateLimitConfig, now: Instant) -> Self {
        Self {
            id,
            ip,
            keys: None,
            last_client_nonce: 0,
            server_nonce: 0,
            sequence: SequenceTracker::new(),
            limiter: SessionLimiter::new(rate_limits, now),
            anomaly: AnomalyTracker::new(),
            player_id: None,
            room_id: None,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn touch(&mut self, now: Instant) {
        self.last_activity = now;
    }

    pub fn next_server_nonce(&mut self) -> u64 {
        self.server_nonce += 1;
        self.server_nonce
    }

    pub fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_activity) >= timeout
    }
}

/// `session_id -> Session` plus the reverse `player_id -> session_id`
/// lookup the controller needs to route broadcasts and contribution
/// payouts back to a connection.
#[derive(Default)]
pub struct SessionTable {
    sessions: HashMap<SessionId, Session>,
    by_player: HashMap<PlayerId, SessionId>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, session: Session) {
        self.sessions.insert(session.id, session);
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    pub fn bind_player(&mut self, session_id: SessionId, player_id: PlayerId) {
        if let Some(session) = self.sessions.get_mut(&session_id) {
            session.player_id = Some(player_id);
        }
        self.by_player.insert(player_id, session_id);
    }

    pub fn by_player(&self, player_id: PlayerId) -> Option<SessionId> {
        self.by_player.get(&player_id).copied()
    }

    pub fn remove(&mut self, id: SessionId) -> Option<Session> {
        let session = self.sessions.remove(&id)?;
        if let Some(player_id) = session.player_id {
            self.by_player.remove(&player_id);
        }
        Some(session)
    }

    /// Evicts every session idle past [`SESSION_IDLE_TIMEOUT`], returning
    /// the ids removed so the caller can close the underlying sockets.
    pub fn reap_idle(&mut self, now: Instant) -> Vec<SessionId> {
        let idle: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|s| s.is_idle(now, SESSION_IDLE_TIMEOUT))
            .map(|s| s.id)
            .collect();
        for id in &idle {
            self.remove(*id);
        }
        idle
    }
}
