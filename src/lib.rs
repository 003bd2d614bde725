//! Shared reactive state for the chat front end: one observable cell per
//! piece of state, the record shapes those cells hold, and the settings
//! defaults that stored preferences are merged over.

pub mod chat;
pub mod config;
pub mod constants;
pub mod emoji;
pub mod model;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod state;
pub mod store;

pub use config::Config;
pub use model::Model;
pub use session::SessionUser;
pub use settings::Settings;
pub use state::{expect_global_state, provide_global_state, use_global_state, GlobalState};
pub use store::{Store, Subscription};
