#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Sentence selection, batching and end-to-end annotation.
//!
//! [`flatten`] picks the sentences of a segmentation to annotate,
//! [`group_by_leading_number`] splits them into engine batches, and
//! [`annotate_document`] drives an [`AnnotationEngine`] over the batches and
//! merges the results back with a single
//! [`Reattacher::merge`](layered_annotation_merge::Reattacher::merge).
//!
//! ## Modules
//!
//! - [`selection`] - Flattening policy and selected sentence list
//! - [`grouping`] - Batch heuristics
//! - [`adapter`] - Annotation engine contract
//! - [`pipeline`] - End-to-end annotation
//! - [`errors`] - Error types

pub mod adapter;
pub mod errors;
pub mod grouping;
pub mod pipeline;
pub mod selection;

pub use adapter::{AnnotationEngine, EngineOutput};
pub use errors::{BatchError, BatchResult, PipelineError};
pub use grouping::group_by_leading_number;
pub use pipeline::annotate_document;
pub use selection::{
    flatten, FlatSelection, GroupingChoice, SectionSelection, SelectionPolicy, SentenceText,
};
