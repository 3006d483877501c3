use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("file name template must use the stage placeholder exactly once")]
    Template,

    #[error("Unsupported stage: {0}")]
    UnsupportedStage(String),

    #[error("Unsupported config tier: {0}")]
    UnsupportedTier(String),

    #[error("Home directory is not available")]
    NoHomeDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
