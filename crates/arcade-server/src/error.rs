use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use arcade_core::error::CommandError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Unauthorized(m)
            | Self::Internal(m) => {
                write!(f, "{m}")
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            Self::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            Self::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            Self::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
            Self::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<CommandError> for AppError {
    fn from(err: CommandError) -> Self {
        let message = err.to_string();
        match err {
            CommandError::UnknownGame(_)
            | CommandError::UnknownInstance(_)
            | CommandError::GameMismatch { .. }
            | CommandError::InvalidAction(_) => Self::BadRequest(message),
            CommandError::UnknownScorecard(_) => Self::NotFound(message),
            CommandError::InstanceTerminal { .. } | CommandError::ScorecardClosed(_) => {
                Self::Conflict(message)
            },
            CommandError::GameLogic(_) | CommandError::GameLogicTimeout(_) => {
                tracing::error!(error = %message, "Game logic failure");
                Self::Internal(message)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::error::GameLogicError;
    use arcade_core::game_trait::GameStatus;

    fn status_of(err: CommandError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn command_errors_map_to_status_codes() {
        assert_eq!(
            status_of(CommandError::UnknownGame("g".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CommandError::InvalidAction("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CommandError::UnknownScorecard("c".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CommandError::InstanceTerminal {
                instance_id: "i".into(),
                status: GameStatus::Win,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CommandError::ScorecardClosed("c".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CommandError::GameLogicTimeout(5)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(GameLogicError::State("bad".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn unauthorized_has_json_error_body() {
        let resp = AppError::Unauthorized("invalid API key".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "invalid API key");
    }

    #[test]
    fn message_is_preserved() {
        let err = AppError::from(CommandError::UnknownInstance("nonexistent-123".into()));
        assert_eq!(err.to_string(), "unknown guid: nonexistent-123");
    }
}
