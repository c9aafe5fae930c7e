//! The reattachment engine.
//!
//! Given a document, one of its segmentations, an ordered selection of
//! (section, sentence grouping) targets, and the flat stream of annotation
//! bundles an external engine produced for exactly those sentences, build a
//! new document in which:
//!
//! - each targeted sentence gains one new [`Tokenization`], taken from the
//!   bundle stream in document traversal order;
//! - coreference chains become a new [`EntityMentionSet`]/[`EntitySet`] pair
//!   pointing at those tokenizations;
//! - everything not on a targeted path is carried over unchanged.
//!
//! [`EntityMentionSet`]: layered_annotation::EntityMentionSet
//! [`EntitySet`]: layered_annotation::EntitySet

use layered_annotation::rebuild::{rebuild_all, replace_each_matching, replace_in_order};
use layered_annotation::{
    AnnotationId, AnnotationMetadata, Clock, CorefChain, Document, FixedClock, IdGenerator,
    Provenance, RandomIds, Section, Segmentation, Sentence, SentenceAnnotations,
    SentenceGrouping, SequentialIds, SystemClock, Tokenization, DEFAULT_TOOL,
};

use crate::{build_entities, FreshIds, IdStrategy, MergeConfig, MergeError, MergeResult, NodeKind};

/// Everything one merge call needs besides the document.
///
/// `section_ids[i]` is annotated through its grouping `grouping_ids[i]`.
/// Sections must be listed in document order. `sentences` holds one bundle
/// per targeted sentence, in traversal order; chain mentions index into that
/// same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    pub segmentation_id: AnnotationId,
    pub section_ids: Vec<AnnotationId>,
    pub grouping_ids: Vec<AnnotationId>,
    pub sentences: Vec<SentenceAnnotations>,
    pub chains: Vec<CorefChain>,
}

impl MergeRequest {
    pub fn new(segmentation_id: AnnotationId) -> Self {
        Self {
            segmentation_id,
            section_ids: Vec::new(),
            grouping_ids: Vec::new(),
            sentences: Vec::new(),
            chains: Vec::new(),
        }
    }

    /// Append a (section, grouping) target.
    pub fn target(mut self, section_id: AnnotationId, grouping_id: AnnotationId) -> Self {
        self.section_ids.push(section_id);
        self.grouping_ids.push(grouping_id);
        self
    }

    pub fn with_sentences(mut self, sentences: Vec<SentenceAnnotations>) -> Self {
        self.sentences = sentences;
        self
    }

    pub fn with_chains(mut self, chains: Vec<CorefChain>) -> Self {
        self.chains = chains;
        self
    }
}

/// Merges annotation batches into documents.
///
/// Holds configuration only. All traversal state lives inside a single
/// [`merge`](Self::merge) call, so one `Reattacher` can serve any number of
/// concurrent merges.
pub struct Reattacher {
    provenance: Provenance<Box<dyn Clock>>,
    ids: Box<dyn IdGenerator>,
}

impl Reattacher {
    /// Default tool name, system clock, random ids.
    pub fn new() -> Self {
        let clock: Box<dyn Clock> = Box::new(SystemClock);
        Self {
            provenance: Provenance::with_clock(DEFAULT_TOOL, clock),
            ids: Box::new(RandomIds),
        }
    }

    pub fn from_config(config: &MergeConfig) -> Self {
        let clock: Box<dyn Clock> = match config.fixed_timestamp {
            Some(timestamp) => Box::new(FixedClock(timestamp)),
            None => Box::new(SystemClock),
        };
        let ids: Box<dyn IdGenerator> = match config.ids {
            IdStrategy::Random => Box::new(RandomIds),
            IdStrategy::Sequential { start } => Box::new(SequentialIds::starting_at(start)),
        };
        Self {
            provenance: Provenance::with_clock(config.tool.clone(), clock),
            ids,
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.provenance = self.provenance.with_tool(tool);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        let clock: Box<dyn Clock> = Box::new(clock);
        self.provenance = self.provenance.replace_clock(clock);
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn tool(&self) -> &str {
        self.provenance.tool()
    }

    /// Build a new document with `request` merged into `doc`.
    ///
    /// `doc` is never modified. On error nothing is produced. Every id the
    /// call allocates is absent from `doc`.
    ///
    /// An empty target list returns a copy of `doc` and logs a warning.
    pub fn merge(&self, doc: &Document, request: MergeRequest) -> MergeResult<Document> {
        let MergeRequest {
            segmentation_id,
            section_ids,
            grouping_ids,
            sentences,
            chains,
        } = request;

        if section_ids.len() != grouping_ids.len() {
            return Err(MergeError::InvalidArgument {
                sections: section_ids.len(),
                groupings: grouping_ids.len(),
            });
        }
        if section_ids.is_empty() {
            log::warn!(
                "merge into document {} called with no target sections; returning it unchanged",
                doc.id
            );
            return Ok(doc.clone());
        }

        log::debug!(
            "merging {} sentence annotations and {} coreference chains into segmentation {}",
            sentences.len(),
            chains.len(),
            segmentation_id
        );
        for (i, (section, grouping)) in section_ids.iter().zip(&grouping_ids).enumerate() {
            log::debug!("target {}: section {} grouping {}", i, section, grouping);
        }

        let supplied = sentences.len();
        let mut pass = MergePass {
            metadata: self.provenance.stamp(),
            ids: FreshIds::for_document(self.ids.as_ref(), doc),
            bundles: sentences.into_iter(),
            tokenization_ids: Vec::with_capacity(supplied),
        };

        // Only the first segmentation with this id is rebuilt.
        let segmentations = replace_in_order(
            &doc.segmentations,
            &[segmentation_id],
            |s| s.id,
            |_, segmentation| pass.segmentation(segmentation, &section_ids, &grouping_ids),
        )?;
        if segmentations.matched == 0 {
            return Err(MergeError::NotFound {
                kind: NodeKind::Segmentation,
                id: segmentation_id,
            });
        }

        let leftover = pass.bundles.len();
        if leftover > 0 {
            return Err(MergeError::UnconsumedInput {
                consumed: supplied - leftover,
                supplied,
            });
        }

        let (mention_set, entity_set) =
            build_entities(&chains, &pass.tokenization_ids, &pass.metadata, &mut pass.ids)?;

        let mut entity_mention_sets = doc.entity_mention_sets.clone();
        entity_mention_sets.push(mention_set);
        let mut entity_sets = doc.entity_sets.clone();
        entity_sets.push(entity_set);

        Ok(Document {
            id: doc.id,
            text: doc.text.clone(),
            segmentations: segmentations.items,
            entity_mention_sets,
            entity_sets,
        })
    }
}

impl Default for Reattacher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Reattacher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reattacher").field("tool", &self.tool()).finish()
    }
}

/// Merge with a default [`Reattacher`].
pub fn merge(
    doc: &Document,
    segmentation_id: AnnotationId,
    section_ids: &[AnnotationId],
    grouping_ids: &[AnnotationId],
    sentences: Vec<SentenceAnnotations>,
    chains: Vec<CorefChain>,
) -> MergeResult<Document> {
    Reattacher::new().merge(
        doc,
        MergeRequest {
            segmentation_id,
            section_ids: section_ids.to_vec(),
            grouping_ids: grouping_ids.to_vec(),
            sentences,
            chains,
        },
    )
}

/// State of one merge call.
struct MergePass<'r> {
    /// Captured once per call and shared by everything the call produces
    metadata: AnnotationMetadata,
    /// Skips every id already in the input document
    ids: FreshIds<'r>,
    /// Bundle cursor, shared across all targeted groupings
    bundles: std::vec::IntoIter<SentenceAnnotations>,
    /// Id of the tokenization attached to each flattened sentence
    tokenization_ids: Vec<AnnotationId>,
}

impl<'r> MergePass<'r> {
    fn segmentation(
        &mut self,
        segmentation: &Segmentation,
        section_ids: &[AnnotationId],
        grouping_ids: &[AnnotationId],
    ) -> MergeResult<Segmentation> {
        let sections = replace_in_order(
            &segmentation.sections,
            section_ids,
            |s| s.id,
            |cursor, section| {
                log::debug!("rebuilding section {} (target #{})", section.id, cursor);
                self.section(section, grouping_ids[cursor])
            },
        )?;

        if let Some(&stuck) = section_ids.get(sections.matched) {
            return Err(if segmentation.section(stuck).is_some() {
                MergeError::OutOfOrder {
                    id: stuck,
                    position: sections.matched,
                }
            } else {
                MergeError::NotFound {
                    kind: NodeKind::Section,
                    id: stuck,
                }
            });
        }

        Ok(Segmentation {
            id: segmentation.id,
            metadata: segmentation.metadata.clone(),
            sections: sections.items,
        })
    }

    fn section(&mut self, section: &Section, grouping_id: AnnotationId) -> MergeResult<Section> {
        let matches = section.groupings.iter().filter(|g| g.id == grouping_id).count();
        match matches {
            0 => {
                return Err(MergeError::NotFound {
                    kind: NodeKind::Grouping,
                    id: grouping_id,
                })
            }
            1 => {}
            _ => {
                return Err(MergeError::AmbiguousGrouping {
                    section: section.id,
                    grouping: grouping_id,
                    matches,
                })
            }
        }

        let groupings = replace_each_matching(
            &section.groupings,
            |g| g.id == grouping_id,
            |grouping| self.grouping(section.id, grouping),
        )?;

        Ok(Section {
            id: section.id,
            kind: section.kind,
            number: section.number,
            span: section.span,
            groupings: groupings.items,
        })
    }

    fn grouping(&mut self, section_id: AnnotationId, grouping: &SentenceGrouping) -> MergeResult<SentenceGrouping> {
        let sentences = rebuild_all(&grouping.sentences, |sentence| {
            self.attach(section_id, grouping.id, sentence)
        })?;

        Ok(SentenceGrouping {
            id: grouping.id,
            metadata: grouping.metadata.clone(),
            sentences,
        })
    }

    fn attach(
        &mut self,
        section_id: AnnotationId,
        grouping_id: AnnotationId,
        sentence: &Sentence,
    ) -> MergeResult<Sentence> {
        let annotations = self.bundles.next().ok_or(MergeError::ExhaustedInput {
            consumed: self.tokenization_ids.len(),
            section: section_id,
            grouping: grouping_id,
        })?;

        let tokenization = Tokenization::new(self.ids.next_id(), self.metadata.clone(), annotations);
        self.tokenization_ids.push(tokenization.id);
        Ok(sentence.with_tokenization(tokenization))
    }
}
