pub mod account;
pub mod ai;
pub mod discord;
pub mod post;
pub mod submission;
pub mod twitter;
pub mod user;

pub use account::*;
pub use ai::*;
pub use discord::*;
pub use post::*;
pub use submission::*;
pub use twitter::*;
pub use user::*;

use serde::Deserialize;

/// Lists come back either bare or wrapped in a `data` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}
