#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Reattach externally computed annotations to a [`layered_annotation::Document`].
//!
//! An external engine is handed the text of a selection of sentences, flattened
//! across several sections, and returns one annotation bundle per sentence plus
//! coreference chains that address sentences by their flat index. This crate
//! puts those results back where they belong.
//!
//! ## Modules
//!
//! - [`reattach`] - The merge itself
//! - [`entities`] - Coreference chains to entity and mention collections
//! - [`fresh`] - Id allocation that never reuses an id of the input document
//! - [`config`] - TOML-loadable merge configuration
//! - [`errors`] - Error types
//!
//! ## Example
//!
//! ```
//! use layered_annotation::{
//!     AnnotationId, AnnotationMetadata, CorefChain, Document, FixedClock, Section,
//!     Segmentation, Sentence, SentenceAnnotations, SentenceGrouping, SequentialIds, TextSpan,
//! };
//! use layered_annotation_merge::{MergeRequest, Reattacher};
//!
//! let id = AnnotationId::from_u128;
//! let doc = Document::new(id(1), "John left. He ran.").with_segmentation(Segmentation::new(
//!     id(2),
//!     AnnotationMetadata::new("splitter", 0),
//!     vec![Section::new(
//!         id(3),
//!         vec![SentenceGrouping::new(
//!             id(4),
//!             vec![
//!                 Sentence::new(id(5), TextSpan::new(0, 10)),
//!                 Sentence::new(id(6), TextSpan::new(11, 18)),
//!             ],
//!         )],
//!     )],
//! ));
//!
//! let reattacher = Reattacher::new()
//!     .with_clock(FixedClock(1_400_000_000))
//!     .with_id_generator(SequentialIds::starting_at(100));
//! let merged = reattacher
//!     .merge(
//!         &doc,
//!         MergeRequest::new(id(2))
//!             .target(id(3), id(4))
//!             .with_sentences(vec![
//!                 SentenceAnnotations::from_words(["John", "left", "."]),
//!                 SentenceAnnotations::from_words(["He", "ran", "."]),
//!             ])
//!             .with_chains(vec![CorefChain::from_triples(&[(0, 0, 1), (1, 0, 1)])]),
//!     )
//!     .unwrap();
//!
//! assert_eq!(merged.tokenization_count(), 2);
//! assert_eq!(merged.entity_sets[0].entities.len(), 1);
//! assert_eq!(doc.tokenization_count(), 0);
//! ```

pub mod config;
pub mod entities;
pub mod errors;
pub mod fresh;
pub mod reattach;

pub use config::{IdStrategy, MergeConfig};
pub use entities::{build_entities, EntityBuilder};
pub use errors::{ConfigError, MergeError, MergeResult, NodeKind};
pub use fresh::FreshIds;
pub use reattach::{merge, MergeRequest, Reattacher};
