use thiserror::Error;

pub type Result<T> = std::result::Result<T, RetrieverError>;

#[derive(Error, Debug)]
pub enum RetrieverError {
    #[error("Store error: {0}")]
    Store(#[from] kb_store::StoreError),

    #[error("Invalid retrieval options: {0}")]
    InvalidOptions(String),
}
