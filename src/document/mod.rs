//! The immutable segmented document tree.
//!
//! ```text
//! Document
//! ├─ Segmentation (one complete way of carving the text into sections)
//! │  └─ Section
//! │     └─ SentenceGrouping (one alternative sentence split)
//! │        └─ Sentence
//! │           └─ Tokenization (external annotations for that sentence)
//! ├─ EntityMentionSet
//! └─ EntitySet
//! ```
//!
//! Nothing here is mutated in place. Code that "changes" a document builds
//! new values and splices them into freshly built parents, see
//! [`crate::rebuild`].

mod display;

pub use display::DocumentDisplay;

use serde::{Deserialize, Serialize};

use crate::{AnnotationId, AnnotationMetadata, EntityMentionSet, EntitySet, SentenceAnnotations};

/// Exclusive character range into [`Document::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The covered text, or `None` if the span is reversed or runs past the end.
    ///
    /// Offsets count `char`s, not bytes.
    pub fn slice<'t>(&self, text: &'t str) -> Option<&'t str> {
        if self.start > self.end {
            return None;
        }
        let mut boundaries = text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(text.len()));
        let start_byte = boundaries.nth(self.start)?;
        let end_byte = if self.end == self.start {
            start_byte
        } else {
            boundaries.nth(self.end - self.start - 1)?
        };
        text.get(start_byte..end_byte)
    }
}

/// A document and every annotation layered onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: AnnotationId,
    /// Full source text; all spans index into it
    pub text: String,
    #[serde(default)]
    pub segmentations: Vec<Segmentation>,
    #[serde(default)]
    pub entity_mention_sets: Vec<EntityMentionSet>,
    #[serde(default)]
    pub entity_sets: Vec<EntitySet>,
}

impl Document {
    pub fn new(id: AnnotationId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            segmentations: Vec::new(),
            entity_mention_sets: Vec::new(),
            entity_sets: Vec::new(),
        }
    }

    pub fn with_segmentation(mut self, segmentation: Segmentation) -> Self {
        self.segmentations.push(segmentation);
        self
    }

    /// First segmentation with the given id.
    pub fn segmentation(&self, id: AnnotationId) -> Option<&Segmentation> {
        self.segmentations.iter().find(|s| s.id == id)
    }

    /// Total tokenizations attached anywhere in the document.
    pub fn tokenization_count(&self) -> usize {
        self.segmentations
            .iter()
            .flat_map(|s| &s.sections)
            .flat_map(|s| &s.groupings)
            .flat_map(|g| &g.sentences)
            .map(|s| s.tokenizations.len())
            .sum()
    }

    /// Every id used anywhere in the document, in tree order.
    pub fn ids(&self) -> Vec<AnnotationId> {
        let mut ids = vec![self.id];
        for segmentation in &self.segmentations {
            ids.push(segmentation.id);
            for section in &segmentation.sections {
                ids.push(section.id);
                for grouping in &section.groupings {
                    ids.push(grouping.id);
                    for sentence in &grouping.sentences {
                        ids.push(sentence.id);
                        ids.extend(sentence.tokenizations.iter().map(|t| t.id));
                    }
                }
            }
        }
        for set in &self.entity_mention_sets {
            ids.push(set.id);
            ids.extend(set.mentions.iter().map(|m| m.id));
        }
        for set in &self.entity_sets {
            ids.push(set.id);
            ids.extend(set.entities.iter().map(|e| e.id));
        }
        ids
    }

    pub fn contains_id(&self, id: AnnotationId) -> bool {
        self.ids().contains(&id)
    }

    /// Text covered by a sentence, if its span fits the document.
    pub fn sentence_text(&self, sentence: &Sentence) -> Option<&str> {
        sentence.span.slice(&self.text)
    }

    pub fn display(&self) -> DocumentDisplay<'_> {
        DocumentDisplay::new(self)
    }
}

/// One complete way of dividing the document into sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub id: AnnotationId,
    pub metadata: AnnotationMetadata,
    pub sections: Vec<Section>,
}

impl Segmentation {
    pub fn new(id: AnnotationId, metadata: AnnotationMetadata, sections: Vec<Section>) -> Self {
        Self {
            id,
            metadata,
            sections,
        }
    }

    pub fn section(&self, id: AnnotationId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}

/// What a section holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Passage,
    Metadata,
    List,
    Table,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: AnnotationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SectionKind>,
    /// Leading numeric label, e.g. the `3` in "3. Obligations"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<TextSpan>,
    /// Alternative sentence splits of this section
    pub groupings: Vec<SentenceGrouping>,
}

impl Section {
    pub fn new(id: AnnotationId, groupings: Vec<SentenceGrouping>) -> Self {
        Self {
            id,
            kind: None,
            number: None,
            span: None,
            groupings,
        }
    }

    pub fn with_kind(mut self, kind: SectionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Untagged sections count as passages.
    pub fn is_passage(&self) -> bool {
        matches!(self.kind, None | Some(SectionKind::Passage))
    }

    pub fn grouping(&self, id: AnnotationId) -> Option<&SentenceGrouping> {
        self.groupings.iter().find(|g| g.id == id)
    }
}

/// One alternative way of splitting a section into sentences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceGrouping {
    pub id: AnnotationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AnnotationMetadata>,
    pub sentences: Vec<Sentence>,
}

impl SentenceGrouping {
    pub fn new(id: AnnotationId, sentences: Vec<Sentence>) -> Self {
        Self {
            id,
            metadata: None,
            sentences,
        }
    }

    pub fn with_metadata(mut self, metadata: AnnotationMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: AnnotationId,
    pub span: TextSpan,
    #[serde(default)]
    pub tokenizations: Vec<Tokenization>,
}

impl Sentence {
    pub fn new(id: AnnotationId, span: TextSpan) -> Self {
        Self {
            id,
            span,
            tokenizations: Vec::new(),
        }
    }

    /// Copy of this sentence with `tokenization` appended after any existing ones.
    pub fn with_tokenization(&self, tokenization: Tokenization) -> Self {
        let mut tokenizations = Vec::with_capacity(self.tokenizations.len() + 1);
        tokenizations.extend(self.tokenizations.iter().cloned());
        tokenizations.push(tokenization);
        Self {
            id: self.id,
            span: self.span,
            tokenizations,
        }
    }
}

/// External annotations attached to one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokenization {
    pub id: AnnotationId,
    pub metadata: AnnotationMetadata,
    pub annotations: SentenceAnnotations,
}

impl Tokenization {
    pub fn new(id: AnnotationId, metadata: AnnotationMetadata, annotations: SentenceAnnotations) -> Self {
        Self {
            id,
            metadata,
            annotations,
        }
    }
}
