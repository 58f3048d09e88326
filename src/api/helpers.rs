//! Short-hand constructors for agent requests and messages

use super::types::{AgentRequest, BinaryData, ConversationContext, Message, UserContext};

pub const USER_ROLE: &str = "user";
pub const ASSISTANT_ROLE: &str = "assistant";

/// Build a request holding a single user message.
pub fn agent_request(
    content: &str,
    conversation_id: &str,
    binary_data: Vec<BinaryData>,
    turn_id: Option<&str>,
) -> AgentRequest {
    let turn_id = turn_id.map(str::to_string);
    AgentRequest {
        messages: vec![Message {
            turn_id: turn_id.clone(),
            binary_data: Some(binary_data),
            ..Message::new(USER_ROLE, content)
        }],
        conversation_context: ConversationContext {
            conversation_id: conversation_id.to_string(),
            turn_id,
        },
        system_context: Vec::new(),
        user_context: UserContext::default(),
    }
}

pub fn user_message(content: &str, turn_id: Option<&str>) -> Message {
    Message {
        turn_id: turn_id.map(str::to_string),
        ..Message::new(USER_ROLE, content)
    }
}

pub fn assistant_message(
    content: &str,
    turn_id: Option<&str>,
    binary_data: Option<Vec<BinaryData>>,
) -> Message {
    Message {
        turn_id: turn_id.map(str::to_string),
        binary_data,
        ..Message::new(ASSISTANT_ROLE, content)
    }
}
