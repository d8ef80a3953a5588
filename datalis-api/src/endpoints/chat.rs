use crate::macros::setter;
use crate::request::{Method, Request, RequestData};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    pub user_id: String,
    pub workbench_id: String,
    pub title: String,
    pub created_at: String,
}

/// Entry of the session list, which omits the owning user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSessionSummary {
    pub session_id: String,
    pub title: Option<String>,
    pub workbench_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message_id: String,
    pub session_id: String,
    pub sender_id: Option<String>,
    pub message_type: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub created_at: String,
}

/// Assistant reply to a sent message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
    #[serde(default)]
    pub context_chunks: Vec<Value>,
    #[serde(default)]
    pub usage_info: Map<String, Value>,
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct CreateChatSession {
    workbench_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

impl CreateChatSession {
    pub fn new(workbench_id: impl Into<String>) -> Self {
        Self {
            workbench_id: workbench_id.into(),
            title: None,
        }
    }

    setter!(opt title: String);
}

impl Request for CreateChatSession {
    type Data = Self;
    type Response = ChatSession;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/chat/sessions".into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMessage {
    #[serde(skip)]
    session_id: String,
    content: String,
}

impl SendMessage {
    pub fn new(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            content: content.into(),
        }
    }
}

impl Request for SendMessage {
    type Data = Self;
    type Response = ChatReply;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/chat/sessions/{}/messages", self.session_id).into()
    }

    fn data(&self) -> RequestData<'_, Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone)]
pub struct ListMessages {
    session_id: String,
}

impl ListMessages {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

impl Request for ListMessages {
    type Data = ();
    type Response = Vec<ChatMessage>;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/chat/sessions/{}/messages", self.session_id).into()
    }
}

#[derive(Default, Debug, Clone)]
pub struct ListChatSessions;

impl Request for ListChatSessions {
    type Data = ();
    type Response = Vec<ChatSessionSummary>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/chat/sessions".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_message_keeps_session_out_of_body() {
        let req = SendMessage::new("s-1", "What drove Q3 revenue?");
        assert_eq!(req.endpoint(), "/chat/sessions/s-1/messages");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "content": "What drove Q3 revenue?" })
        );
    }

    #[test]
    fn reply_tolerates_missing_usage() {
        let reply: ChatReply =
            serde_json::from_value(serde_json::json!({ "message": "Revenue grew 12%." })).unwrap();
        assert_eq!(reply.message, "Revenue grew 12%.");
        assert!(reply.context_chunks.is_empty());
    }
}
