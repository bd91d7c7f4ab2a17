mod chat;
mod conversation;
mod health;
mod metrics;
mod models;

pub use chat::{CLAUDE_KEY_HEADER, chat_handler};
pub use conversation::{clear_conversation_handler, conversation_handler};
pub use health::{health_handler, root_handler};
pub use metrics::metrics_handler;
pub use models::{models_handler, reset_model_handler};
