//! Agent API data model

pub mod helpers;
pub mod types;

pub use helpers::{agent_request, assistant_message, user_message};
pub use types::{
    AgentRequest, AgentResult, BinaryData, ConversationContext, Message, ProfileEntry,
    SystemContextEntry, UserContext,
};
