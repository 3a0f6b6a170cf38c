use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error")]
    IO(#[from] std::io::Error),
    #[error("Rule file '{0}' names no domain")]
    MissingDomain(String),
    #[error("Invalid domain pattern")]
    Pattern(#[from] regex::Error),
    #[error("Invalid attribute rule '{0}'")]
    Attribute(String),
}
