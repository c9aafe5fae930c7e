//! Error types for selection, batching and the annotation pipeline.

use layered_annotation::AnnotationId;
use layered_annotation_merge::MergeError;
use thiserror::Error;

/// Errors selecting sentences from a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("segmentation not found: {0}")]
    SegmentationNotFound(AnnotationId),

    /// A sentence span does not fit the document text.
    #[error("sentence {sentence} span {start}..{end} is outside the document text ({text_len} chars)")]
    SpanOutOfBounds {
        sentence: AnnotationId,
        start: usize,
        end: usize,
        text_len: usize,
    },
}

/// Result type for selection operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// Errors from [`annotate_document`](crate::annotate_document).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    /// The annotation engine itself failed.
    #[error("annotation engine failed on batch {batch}: {source}")]
    Engine {
        batch: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The engine did not return one bundle per submitted sentence.
    #[error("annotation engine returned {returned} sentence annotations for the {submitted} sentences of batch {batch}")]
    BundleCountMismatch {
        batch: usize,
        submitted: usize,
        returned: usize,
    },

    /// A chain mention points past the sentences of its own batch.
    #[error("coreference chain {chain}, mention {mention} of batch {batch}: sentence {sentence} is outside the batch of {batch_len} sentences")]
    ChainOutOfBatch {
        batch: usize,
        chain: usize,
        mention: usize,
        sentence: usize,
        batch_len: usize,
    },
}
