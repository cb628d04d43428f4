use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid root margin '{input}': {reason}")]
    InvalidMargin { input: String, reason: String },

    #[error("Unknown page: {0}")]
    UnknownPage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
