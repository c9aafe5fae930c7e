//! Flattening a segmentation into the ordered sentence list an engine sees.
//!
//! The walk visits sections in document order, keeps the ones the
//! [`SelectionPolicy`] accepts, picks one sentence grouping per section and
//! pulls the text of each of its sentences out of the document. The result
//! is also exactly the target list a merge expects back.

use layered_annotation::{
    AnnotationId, CorefChain, Document, Section, SentenceAnnotations, SentenceGrouping,
};
use layered_annotation_merge::MergeRequest;
use serde::{Deserialize, Serialize};

use crate::{BatchError, BatchResult};

/// Which of a section's alternative sentence groupings to use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupingChoice {
    /// The first grouping listed
    #[default]
    First,
    /// The first grouping produced by the named tool; sections without one are skipped
    Tool(String),
}

/// Which sections and groupings a flattening walk selects.
///
/// The default takes passage sections only, through their first grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    /// Skip sections whose kind is set to anything but `Passage`
    pub passages_only: bool,
    pub grouping: GroupingChoice,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            passages_only: true,
            grouping: GroupingChoice::default(),
        }
    }
}

impl SelectionPolicy {
    /// Select sections of every kind.
    pub fn all_sections(mut self) -> Self {
        self.passages_only = false;
        self
    }

    pub fn grouping_from_tool(mut self, tool: impl Into<String>) -> Self {
        self.grouping = GroupingChoice::Tool(tool.into());
        self
    }

    /// The grouping to annotate in `section`, if the section is selected at all.
    pub fn pick<'d>(&self, section: &'d Section) -> Option<&'d SentenceGrouping> {
        if self.passages_only && !section.is_passage() {
            return None;
        }
        match &self.grouping {
            GroupingChoice::First => section.groupings.first(),
            GroupingChoice::Tool(tool) => section
                .groupings
                .iter()
                .find(|g| g.metadata.as_ref().map_or(false, |m| &m.tool == tool)),
        }
    }
}

/// One selected sentence and its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceText {
    pub sentence_id: AnnotationId,
    pub text: String,
}

/// A selected section and the sentences of its chosen grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSelection {
    pub section_id: AnnotationId,
    pub grouping_id: AnnotationId,
    pub number: Option<u32>,
    pub sentences: Vec<SentenceText>,
}

/// Ordered sentence selection over one segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatSelection {
    pub segmentation_id: AnnotationId,
    pub sections: Vec<SectionSelection>,
}

impl FlatSelection {
    pub fn new(segmentation_id: AnnotationId) -> Self {
        Self {
            segmentation_id,
            sections: Vec::new(),
        }
    }

    pub fn section_ids(&self) -> Vec<AnnotationId> {
        self.sections.iter().map(|s| s.section_id).collect()
    }

    pub fn grouping_ids(&self) -> Vec<AnnotationId> {
        self.sections.iter().map(|s| s.grouping_id).collect()
    }

    /// Sentence texts in flattened order.
    pub fn sentence_texts(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|s| &s.sentences)
            .map(|s| s.text.as_str())
            .collect()
    }

    pub fn sentence_count(&self) -> usize {
        self.sections.iter().map(|s| s.sentences.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Merge request targeting exactly this selection.
    pub fn to_request(
        &self,
        sentences: Vec<SentenceAnnotations>,
        chains: Vec<CorefChain>,
    ) -> MergeRequest {
        let mut request = MergeRequest::new(self.segmentation_id);
        request.section_ids = self.section_ids();
        request.grouping_ids = self.grouping_ids();
        request.with_sentences(sentences).with_chains(chains)
    }
}

/// Walk `segmentation_id` of `doc` and collect what `policy` selects.
///
/// Sections without any grouping are skipped. A selected sentence whose span
/// does not fit the document text fails the whole walk.
pub fn flatten(
    doc: &Document,
    segmentation_id: AnnotationId,
    policy: &SelectionPolicy,
) -> BatchResult<FlatSelection> {
    let segmentation = doc
        .segmentation(segmentation_id)
        .ok_or(BatchError::SegmentationNotFound(segmentation_id))?;

    let mut selection = FlatSelection::new(segmentation_id);
    for section in &segmentation.sections {
        let grouping = match policy.pick(section) {
            Some(grouping) => grouping,
            None => {
                log::debug!("skipping section {}", section.id);
                continue;
            }
        };

        let mut sentences = Vec::with_capacity(grouping.sentences.len());
        for sentence in &grouping.sentences {
            let text = doc
                .sentence_text(sentence)
                .ok_or(BatchError::SpanOutOfBounds {
                    sentence: sentence.id,
                    start: sentence.span.start,
                    end: sentence.span.end,
                    text_len: doc.text.chars().count(),
                })?;
            sentences.push(SentenceText {
                sentence_id: sentence.id,
                text: text.to_string(),
            });
        }

        selection.sections.push(SectionSelection {
            section_id: section.id,
            grouping_id: grouping.id,
            number: section.number,
            sentences,
        });
    }

    log::debug!(
        "selected {} sentences from {} sections of segmentation {}",
        selection.sentence_count(),
        selection.sections.len(),
        segmentation_id
    );
    Ok(selection)
}
