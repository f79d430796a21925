use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    #[error("Landmark detector error: {0}")]
    Detector(String),

    #[error("Attribute model error: {0}")]
    AttributeModel(String),

    #[error("Unexpected attribute result shape: {0}")]
    UnexpectedShape(String),
}

pub type Result<T> = std::result::Result<T, Error>;
