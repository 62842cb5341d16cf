use std::sync::Arc;

use log::{info, warn};
use tokio::sync::watch;

use crate::{
    error::AppResult,
    models::User,
    store::{KeyValueStore, TOKEN_KEY, USER_KEY},
};

#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    user_tx: Arc<watch::Sender<Option<User>>>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let initial = read_user(store.as_ref());
        let (user_tx, _) = watch::channel(initial);
        Self {
            store,
            user_tx: Arc::new(user_tx),
        }
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("cannot read session token: {}", e);
                None
            }
        }
    }

    // Local read only. The backend re-checks every request.
    pub fn current_user(&self) -> Option<User> {
        read_user(self.store.as_ref())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn start(&self, token: &str, user: &User) -> AppResult<()> {
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &serde_json::to_string(user)?)?;
        info!("session started for {}", user.username);
        self.user_tx.send_replace(Some(user.clone()));
        Ok(())
    }

    /// Replaces the cached profile after the backend confirmed a change.
    pub fn update_user(&self, user: &User) -> AppResult<()> {
        self.store.set(USER_KEY, &serde_json::to_string(user)?)?;
        self.user_tx.send_replace(Some(user.clone()));
        Ok(())
    }

    pub fn clear(&self) -> AppResult<()> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        info!("session cleared");
        self.user_tx.send_replace(None);
        Ok(())
    }

    /// Receives the cached profile on every login, change and logout.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user_tx.subscribe()
    }
}

fn read_user(store: &dyn KeyValueStore) -> Option<User> {
    let raw = match store.get(USER_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("cannot read cached user: {}", e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!("ignoring unreadable cached user: {}", e);
            None
        }
    }
}
