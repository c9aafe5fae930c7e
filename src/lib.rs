#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Immutable segmented document model for layering external NLP annotations.
//!
//! A [`Document`] holds alternative [`Segmentation`]s of its text; each
//! segmentation holds [`Section`]s, each section alternative
//! [`SentenceGrouping`]s, each grouping [`Sentence`]s, and each sentence the
//! [`Tokenization`]s produced for it by an external analysis engine.
//! Coreference results live next to the tree as [`EntityMentionSet`] /
//! [`EntitySet`] collections whose mentions point at tokenizations by id.
//!
//! Values are never mutated in place. The [`rebuild`] helpers express
//! "replace exactly this child" once, for every level of the tree.
//!
//! ## Example
//!
//! ```
//! use layered_annotation::{
//!     AnnotationId, AnnotationMetadata, Document, Section, Segmentation, Sentence,
//!     SentenceGrouping, TextSpan,
//! };
//!
//! let id = AnnotationId::from_u128;
//! let doc = Document::new(id(1), "John left.").with_segmentation(Segmentation::new(
//!     id(2),
//!     AnnotationMetadata::new("splitter", 0),
//!     vec![Section::new(
//!         id(3),
//!         vec![SentenceGrouping::new(id(4), vec![Sentence::new(id(5), TextSpan::new(0, 10))])],
//!     )],
//! ));
//!
//! let sentence = &doc.segmentations[0].sections[0].groupings[0].sentences[0];
//! assert_eq!(doc.sentence_text(sentence), Some("John left."));
//! ```

mod annotations;
mod document;
mod entity;
mod identity;
mod provenance;
pub mod rebuild;

pub use annotations::{Dependency, DependencyKind, DependencyParse, SentenceAnnotations, Token};
pub use document::{
    Document, DocumentDisplay, Section, SectionKind, Segmentation, Sentence, SentenceGrouping,
    TextSpan, Tokenization,
};
pub use entity::{
    CorefChain, CorefMention, Entity, EntityMention, EntityMentionSet, EntitySet,
    TokenRefSequence,
};
pub use identity::{AnnotationId, IdGenerator, RandomIds, SequentialIds};
pub use provenance::{AnnotationMetadata, Clock, FixedClock, Provenance, SystemClock, DEFAULT_TOOL};
