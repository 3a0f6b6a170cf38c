use thiserror::Error;

#[derive(Error, Debug)]
pub enum DateFixError {
    #[error("libXml Error")]
    Xml,
    #[error("Unknown observer")]
    Observer,
}
