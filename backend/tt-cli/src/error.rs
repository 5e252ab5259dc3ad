use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] tt_config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] tt_db::DbError),

    #[error("{0}")]
    Engine(#[from] tt_engine::EngineError),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("Invalid argument --{argument}: {message}")]
    InvalidArgument {
        argument: &'static str,
        message: String,
    },
}

impl CliError {
    pub fn invalid_argument(argument: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Database(_) => "STORAGE_ERROR",
            Self::Engine(e) => e.error_code(),
            Self::Json(_) => "OUTPUT_ERROR",
            Self::Logger { .. } => "LOGGER_ERROR",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
