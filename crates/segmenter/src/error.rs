use thiserror::Error;

pub type Result<T> = std::result::Result<T, SegmenterError>;

#[derive(Error, Debug)]
pub enum SegmenterError {
    #[error("Invalid segmenter configuration: {0}")]
    InvalidConfig(String),
}
