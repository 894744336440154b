pub type ScrollFxResult<T> = Result<T, ScrollFxError>;

#[derive(thiserror::Error, Debug)]
pub enum ScrollFxError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("keyframes error: {0}")]
    Keyframes(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollFxError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn keyframes(msg: impl Into<String>) -> Self {
        Self::Keyframes(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ScrollFxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}
