//! Frames exchanged over the room WebSocket.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::models::RoomMessage;

/// Frames a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinGlobal,
    SendMessage(OutgoingMessage),
}

/// Message draft as submitted by a client. Fields are optional on the wire so a
/// missing one is reported through an ack instead of a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub user_id: Option<i32>,
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MessageAck {
    Ok { message: RoomMessage },
    Error { error: String },
}

/// Frames the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Replay for the joining socket only, oldest first.
    History(Vec<RoomMessage>),
    /// Fan-out to every joined socket, the sender included.
    ReceiveMessage(RoomMessage),
    /// Sent to the sender only.
    MessageAck(MessageAck),
    Error { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message() -> RoomMessage {
        RoomMessage {
            id: 1,
            room: "global".to_string(),
            user_id: 3,
            username: "sam".to_string(),
            avatar: None,
            text: "hi".to_string(),
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_parse_client_frames() {
        let join: ClientEvent = serde_json::from_value(json!({"event": "join_global"})).unwrap();
        assert_eq!(join, ClientEvent::JoinGlobal);

        let send: ClientEvent = serde_json::from_value(json!({
            "event": "send_message",
            "data": {"user_id": 3, "username": "sam", "text": "hi"}
        }))
        .unwrap();
        let ClientEvent::SendMessage(draft) = send else {
            panic!("expected send_message");
        };
        assert_eq!(draft.user_id, Some(3));
        assert_eq!(draft.avatar, None);

        assert!(serde_json::from_value::<ClientEvent>(json!({"event": "shout"})).is_err());
    }

    #[test]
    fn test_ack_shape() {
        let ok = serde_json::to_value(ServerEvent::MessageAck(MessageAck::Ok {
            message: message(),
        }))
        .unwrap();
        assert_eq!(ok["event"], "message_ack");
        assert_eq!(ok["data"]["status"], "ok");
        assert_eq!(ok["data"]["message"]["id"], 1);

        let err = serde_json::to_value(ServerEvent::MessageAck(MessageAck::Error {
            error: "Message text is required".to_string(),
        }))
        .unwrap();
        assert_eq!(err["data"]["status"], "error");
        assert_eq!(err["data"]["error"], "Message text is required");
    }

    #[test]
    fn test_history_frame() {
        let frame = serde_json::to_value(ServerEvent::History(vec![message()])).unwrap();
        assert_eq!(frame["event"], "history");
        assert_eq!(frame["data"][0]["text"], "hi");
    }
}
