use serde::{Deserialize, Serialize};

use crate::action::ActionInput;
use crate::frame::Frame;
use crate::game_trait::{CardId, GameId, GameStatus, InstanceId};

/// Body of every `/api/cmd/{command}` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub game_id: GameId,
    #[serde(default, alias = "instance_id")]
    pub guid: Option<InstanceId>,
    #[serde(default)]
    pub card_id: Option<CardId>,
    #[serde(default)]
    pub x: Option<i64>,
    #[serde(default)]
    pub y: Option<i64>,
    /// Free-form client annotation echoed back in `action_input.data`.
    #[serde(default)]
    pub reasoning: Option<serde_json::Value>,
}

/// Frame returned after every accepted command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResponse {
    pub game_id: GameId,
    #[serde(rename = "guid", alias = "instance_id")]
    pub instance_id: InstanceId,
    pub frame: Frame,
    #[serde(rename = "state", alias = "status")]
    pub status: GameStatus,
    pub score: u32,
    pub win_score: u32,
    pub action_count: u64,
    pub action_input: ActionInput,
    /// Set when the command succeeded but its scorecard could not be updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scorecard_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::CommandKind;

    #[test]
    fn request_accepts_instance_id_alias() {
        let req: CommandRequest =
            serde_json::from_str(r#"{"game_id":"g1","instance_id":"abc","x":3}"#).unwrap();
        assert_eq!(req.guid.as_deref(), Some("abc"));
        assert_eq!(req.x, Some(3));
        assert_eq!(req.y, None);
    }

    #[test]
    fn response_uses_wire_field_names() {
        let resp = FrameResponse {
            game_id: "g1".into(),
            instance_id: "i1".into(),
            frame: Frame::default(),
            status: GameStatus::InProgress,
            score: 0,
            win_score: 10,
            action_count: 0,
            action_input: ActionInput::new(CommandKind::Reset, None, None),
            scorecard_error: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["guid"], "i1");
        assert_eq!(json["state"], "NOT_FINISHED");
        assert_eq!(json["action_input"]["id"], 0);
        assert!(json.get("scorecard_error").is_none());
    }
}
