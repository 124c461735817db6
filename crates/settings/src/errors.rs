use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("section not registered")]
    NotRegistered,

    #[error("settings lock poisoned")]
    Poisoned,

    #[error("invalid: {0}")]
    Invalid(&'static str),
}
