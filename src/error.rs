// Error taxonomy shared by all bots.

use thiserror::Error;

/// Errors that abort a bot run.
#[derive(Debug, Error)]
pub enum BotError {
    /// Network failure or a non-success HTTP status.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a structured error payload.
    #[error("game rejected request: {0}")]
    Game(String),
    /// The response did not have the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<serde_json::Error> for BotError {
    fn from(e: serde_json::Error) -> Self {
        BotError::Decode(e.to_string())
    }
}

/// Invalid user-supplied settings, detected before any network traffic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid boost type '{0}', expected 'turbo' or 'recharge'")]
    InvalidBoostKind(String),
    #[error("max allowed {kind} boosts must not be negative (got {value})")]
    NegativeBoostBudget { kind: &'static str, value: i64 },
    #[error("combo must have exactly 4 digits, got {0}")]
    ComboLength(usize),
    #[error("combo may only contain the digits 1-4, found '{0}'")]
    ComboDigit(char),
    #[error("access token must not be empty")]
    EmptyToken,
    #[error("access token contains characters not allowed in a header")]
    InvalidToken,
    #[error("spin count must be positive")]
    ZeroSpinCount,
}

/// Outcome of a game call that reached the server.
///
/// A server-side rejection is a value, not an error, so callers decide
/// whether it ends the run.
#[derive(Debug, Clone, PartialEq)]
pub enum GameReply<T> {
    Ok(T),
    GameError(String),
}

impl<T> GameReply<T> {
    /// Treat a server rejection as fatal.
    pub fn into_result(self) -> Result<T, BotError> {
        match self {
            GameReply::Ok(v) => Ok(v),
            GameReply::GameError(msg) => Err(BotError::Game(msg)),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, GameReply::Ok(_))
    }
}
