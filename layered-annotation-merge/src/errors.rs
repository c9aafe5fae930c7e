//! Error types for merging annotations into a document.
//!
//! Every variant is an integration-contract violation between the merge
//! engine and whoever prepared its inputs. None are retryable, and none leave
//! a partially rebuilt document behind.

use layered_annotation::AnnotationId;
use thiserror::Error;

/// Which level of the document tree a lookup failed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Segmentation,
    Section,
    Grouping,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::Segmentation => "segmentation",
            NodeKind::Section => "section",
            NodeKind::Grouping => "sentence grouping",
        };
        f.write_str(name)
    }
}

/// Errors that abort a merge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// Section and grouping target lists are not one-to-one.
    #[error("invalid argument: {sections} target sections but {groupings} sentence grouping ids")]
    InvalidArgument { sections: usize, groupings: usize },

    /// A requested id is absent where exactly one match is required.
    #[error("{kind} not found: {id}")]
    NotFound { kind: NodeKind, id: AnnotationId },

    /// A target section exists but was not reached in document order.
    #[error("target section {id} (target #{position}) is out of document order")]
    OutOfOrder { id: AnnotationId, position: usize },

    /// More than one alternative grouping in a section carries the requested id.
    #[error("section {section} has {matches} sentence groupings with id {grouping}")]
    AmbiguousGrouping {
        section: AnnotationId,
        grouping: AnnotationId,
        matches: usize,
    },

    /// Fewer annotation bundles than targeted sentences.
    #[error("ran out of sentence annotations after {consumed} while filling grouping {grouping} of section {section}")]
    ExhaustedInput {
        consumed: usize,
        section: AnnotationId,
        grouping: AnnotationId,
    },

    /// More annotation bundles than targeted sentences.
    #[error("only {consumed} of {supplied} sentence annotations were attached")]
    UnconsumedInput { consumed: usize, supplied: usize },

    /// A coreference mention points past the merged sentences.
    #[error("coreference chain {chain}, mention {mention}: sentence {sentence} is outside the {available} merged sentences")]
    IndexOutOfRange {
        chain: usize,
        mention: usize,
        sentence: usize,
        available: usize,
    },
}

/// Result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors loading a [`MergeConfig`](crate::MergeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid merge configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
