pub mod accounts;
pub mod api;
pub mod cache;
pub mod error;
pub mod models;
pub mod oauth;
pub mod overview;
pub mod ratelimit;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod store;
pub mod submissions;

pub use error::{AppError, AppResult};
