use std::future::Future;

use board_editor::wire::{InfluenceRequest, InfluenceResponse, ShapeError};
use board_editor::EditorError;
use thiserror::Error;

/// Why a request to the influence service produced no usable reply.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service answered with status {0}")]
    Status(u16),

    #[error("no answer within {0} ms")]
    Timeout(u64),

    #[error("unexpected response body: {0}")]
    Shape(#[from] ShapeError),
}

impl From<TransportError> for EditorError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Shape(shape) => EditorError::from(shape),
            other => EditorError::NetworkFailure(other.to_string()),
        }
    }
}

/// Something that can compute an influence grid for a board.
///
/// Implementations are cloned into the task that performs each request, so
/// they should be cheap to clone.
pub trait InfluenceService: Clone + Send + Sync + 'static {
    fn fetch(
        &self,
        request: InfluenceRequest,
    ) -> impl Future<Output = Result<InfluenceResponse, TransportError>> + Send;
}
