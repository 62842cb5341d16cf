use std::sync::Arc;

use log::{debug, warn};

use crate::{
    error::AppResult,
    models::{Platform, PlatformAccount},
    store::{ACTIVE_ACCOUNT_KEY_PREFIX, KeyValueStore},
};

pub struct ActiveAccounts {
    store: Arc<dyn KeyValueStore>,
}

impl ActiveAccounts {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(platform: Platform) -> String {
        format!("{ACTIVE_ACCOUNT_KEY_PREFIX}{platform}")
    }

    pub fn selected(&self, platform: Platform) -> Option<i64> {
        match self.store.get(&Self::key(platform)) {
            Ok(value) => value.and_then(|v| v.parse().ok()),
            Err(e) => {
                warn!("cannot read active {} account: {}", platform, e);
                None
            }
        }
    }

    pub fn select(&self, platform: Platform, account_id: i64) -> AppResult<()> {
        self.store
            .set(&Self::key(platform), &account_id.to_string())
    }

    pub fn forget(&self, platform: Platform) -> AppResult<()> {
        self.store.remove(&Self::key(platform))
    }

    pub fn resolve<'a>(
        &self,
        platform: Platform,
        accounts: &'a [PlatformAccount],
    ) -> Option<&'a PlatformAccount> {
        if let Some(selected) = self.selected(platform) {
            if let Some(account) = accounts.iter().find(|a| a.id == selected) {
                return Some(account);
            }
            debug!("active {} account {} is no longer connected", platform, selected);
        }
        default_account(accounts)
    }
}

/// Latest `connected_at` first; among equal or missing timestamps the account
/// listed last.
pub fn default_account(accounts: &[PlatformAccount]) -> Option<&PlatformAccount> {
    accounts
        .iter()
        .enumerate()
        .max_by_key(|(index, account)| (account.connected_at, *index))
        .map(|(_, account)| account)
}
