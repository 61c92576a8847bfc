use log::debug;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// Session key under which the last looked-up symbol is kept.
pub const LAST_SEARCHED_SYMBOL: &str = "last_searched_symbol";

/// Sessions a [`MemorySessionStore::new`] store keeps before evicting the oldest.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Key-value state scoped to one client session.
pub trait Session: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn insert(&self, key: &str, value: String);
}

#[derive(Debug, Default)]
struct Sessions {
    values: HashMap<String, HashMap<String, String>>,
    // ids in creation order, oldest first
    order: VecDeque<String>,
}

/// In-process session storage, keyed by session id.
///
/// Holds at most `max_sessions` sessions; creating one more evicts the oldest.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: Mutex<Sessions>,
    max_sessions: usize,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that keeps at most `max_sessions` (at least one) sessions.
    pub fn with_capacity(max_sessions: usize) -> Self {
        MemorySessionStore {
            sessions: Mutex::new(Sessions::default()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// A view onto the session `id`; the session itself is created on first write.
    pub fn session(self: &Arc<Self>, id: impl Into<String>) -> SessionHandle {
        SessionHandle {
            store: Arc::clone(self),
            id: id.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self, id: &str, key: &str, value: String) {
        let mut sessions = self.lock();
        if !sessions.values.contains_key(id) {
            while sessions.order.len() >= self.max_sessions {
                let Some(oldest) = sessions.order.pop_front() else {
                    break;
                };
                sessions.values.remove(&oldest);
                debug!("Evicted session {oldest}");
            }
            sessions.order.push_back(id.to_string());
        }

        sessions
            .values
            .entry(id.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        // poisoning is ignored; no writer leaves a map half-updated
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// [`Session`] for a single id in a [`MemorySessionStore`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    store: Arc<MemorySessionStore>,
    id: String,
}

impl SessionHandle {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Session for SessionHandle {
    fn get(&self, key: &str) -> Option<String> {
        self.store
            .lock()
            .values
            .get(&self.id)
            .and_then(|values| values.get(key))
            .cloned()
    }

    fn insert(&self, key: &str, value: String) {
        self.store.write(&self.id, key, value);
    }
}

/// Random 128-bit session id, hex encoded.
pub fn new_session_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}
