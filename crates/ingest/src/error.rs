use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unsupported file type: {kind} (no text extraction path)")]
    Unsupported { kind: String },

    #[error("Document has no extractable text")]
    EmptyDocument,

    #[error("Segmenter error: {0}")]
    Segmenter(#[from] kb_segmenter::SegmenterError),

    #[error("Store error: {0}")]
    Store(#[from] kb_store::StoreError),
}
