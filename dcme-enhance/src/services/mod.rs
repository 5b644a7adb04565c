//! External service clients

pub mod chat_client;

pub use chat_client::{ChatClient, ChatError, ChatParams};
