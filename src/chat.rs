pub mod types;

pub use types::{Banner, Channel, ChatListItem, Document, Prompt, Tag};
