use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("OpenAI API key is not set. Set OPENAI_API_KEY or run `car-lookup config --set-api-key YOUR_KEY`")]
    MissingApiKey,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Roster not configured. Pass --roster or run `car-lookup config --set-roster PATH`")]
    RosterNotConfigured,

    #[error("Unsupported roster format: {0} (use .csv, .json or .xlsx)")]
    UnsupportedFormat(String),

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Invalid admin credentials")]
    Unauthorized,

    #[error("API call failed: {0}")]
    ApiCall(String),

    #[error("Failed to parse API response: {0}")]
    ApiParse(String),

    #[error("Excel read error: {0}")]
    Excel(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CLI execution error: {0}")]
    CliExecution(String),

    #[error(transparent)]
    Common(#[from] car_lookup_common::Error),
}

pub type Result<T> = std::result::Result<T, LookupError>;
