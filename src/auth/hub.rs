// src/auth/hub.rs
use std::collections::HashMap;
use std::sync::Mutex;

use crate::auth::sessions::SessionUser;

/// Auth state changes published to subscribers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SignedIn { user_id: i64, email: String },
    SignedOut { user_id: i64 },
}

type Listener = Box<dyn Fn(&SessionEvent) + Send + Sync>;

/// Shared session state with subscribe/notify. Handlers get an explicit
/// handle to this instead of reaching into ambient globals, and the cache
/// spares a DB lookup per request on the hot path.
///
/// Listeners must not call `subscribe` from inside a callback.
pub struct SessionHub {
    cache: Mutex<HashMap<String, SessionUser>>,
    listeners: Mutex<Vec<Listener>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Cache a resolved session under its raw token.
    pub fn remember(&self, token: &str, user: SessionUser) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(token.to_string(), user);
        }
    }

    /// Cached lookup. Entries past their expiry are evicted on the way out,
    /// so a hit is always a live session.
    pub fn get(&self, token: &str, now: i64) -> Option<SessionUser> {
        let mut cache = self.cache.lock().ok()?;
        match cache.get(token) {
            Some(user) if user.expires_at > now => Some(user.clone()),
            Some(_) => {
                cache.remove(token);
                None
            }
            None => None,
        }
    }

    pub fn forget(&self, token: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.remove(token);
        }
    }

    /// Drop every cached session for a user, e.g. after a sign-out.
    pub fn forget_user(&self, user_id: i64) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.retain(|_, user| user.user_id != user_id);
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + Send + Sync + 'static) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(Box::new(listener));
        }
    }

    pub fn publish(&self, event: SessionEvent) {
        if let Ok(listeners) = self.listeners.lock() {
            for listener in listeners.iter() {
                listener(&event);
            }
        }
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn user(user_id: i64, expires_at: i64) -> SessionUser {
        SessionUser {
            user_id,
            email: format!("u{user_id}@example.com"),
            expires_at,
        }
    }

    #[test]
    fn remember_then_get_hits_until_expiry() {
        let hub = SessionHub::new();
        hub.remember("tok", user(1, 2000));

        assert_eq!(hub.get("tok", 1000).map(|u| u.user_id), Some(1));
        // At expiry the entry is evicted, not just skipped.
        assert!(hub.get("tok", 2000).is_none());
        assert!(hub.get("tok", 1000).is_none());
    }

    #[test]
    fn forget_removes_entry() {
        let hub = SessionHub::new();
        hub.remember("tok", user(1, 2000));
        hub.forget("tok");
        assert!(hub.get("tok", 1000).is_none());
    }

    #[test]
    fn forget_user_clears_all_their_tokens() {
        let hub = SessionHub::new();
        hub.remember("a", user(1, 2000));
        hub.remember("b", user(1, 2000));
        hub.remember("c", user(2, 2000));

        hub.forget_user(1);
        assert!(hub.get("a", 1000).is_none());
        assert!(hub.get("b", 1000).is_none());
        assert_eq!(hub.get("c", 1000).map(|u| u.user_id), Some(2));
    }

    #[test]
    fn publish_reaches_every_subscriber() {
        let hub = SessionHub::new();
        let seen = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let seen = Arc::clone(&seen);
            hub.subscribe(move |event| {
                if let SessionEvent::SignedIn { user_id, .. } = event {
                    seen.fetch_add(*user_id as usize, Ordering::SeqCst);
                }
            });
        }

        hub.publish(SessionEvent::SignedIn {
            user_id: 5,
            email: "a@b.com".to_string(),
        });
        hub.publish(SessionEvent::SignedOut { user_id: 5 });

        assert_eq!(seen.load(Ordering::SeqCst), 15);
    }

    #[test]
    fn hub_is_shareable_across_threads() {
        let hub = Arc::new(SessionHub::new());
        let mut handles = Vec::new();
        for i in 0..4 {
            let hub = Arc::clone(&hub);
            handles.push(std::thread::spawn(move || {
                hub.remember(&format!("tok{i}"), user(i, 2000));
                hub.get(&format!("tok{i}"), 1000).is_some()
            }));
        }
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
