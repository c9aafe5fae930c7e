//! Coreference input and the entity/mention collections built from it.

use serde::{Deserialize, Serialize};

use crate::{AnnotationId, AnnotationMetadata};

/// One mention in a coreference chain, as delivered by the analysis engine.
///
/// `sentence` is a position in the flattened sentence order of one merge
/// call (or batch-local, before a pipeline offsets it). `start..end` is an
/// exclusive token range in that sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorefMention {
    pub sentence: usize,
    pub start: usize,
    pub end: usize,
}

impl CorefMention {
    pub fn new(sentence: usize, start: usize, end: usize) -> Self {
        Self {
            sentence,
            start,
            end,
        }
    }
}

/// Mentions referring to the same real-world entity, in engine order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorefChain {
    pub mentions: Vec<CorefMention>,
}

impl CorefChain {
    pub fn new(mentions: Vec<CorefMention>) -> Self {
        Self { mentions }
    }

    /// Build from `(sentence, start, end)` triples.
    pub fn from_triples(triples: &[(usize, usize, usize)]) -> Self {
        Self::new(
            triples
                .iter()
                .map(|&(sentence, start, end)| CorefMention::new(sentence, start, end))
                .collect(),
        )
    }

    /// Same chain with every sentence index shifted by `base`.
    pub fn offset(&self, base: usize) -> Self {
        Self::new(
            self.mentions
                .iter()
                .map(|m| CorefMention::new(m.sentence + base, m.start, m.end))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }
}

/// A token range inside one specific tokenization.
///
/// References the tokenization by id only; the sentence owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenRefSequence {
    pub tokenization_id: AnnotationId,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMention {
    pub id: AnnotationId,
    pub tokens: TokenRefSequence,
}

/// All mentions derived from one coreference chain, by mention id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: AnnotationId,
    pub mention_ids: Vec<AnnotationId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMentionSet {
    pub id: AnnotationId,
    pub metadata: AnnotationMetadata,
    pub mentions: Vec<EntityMention>,
}

impl EntityMentionSet {
    pub fn mention(&self, id: AnnotationId) -> Option<&EntityMention> {
        self.mentions.iter().find(|m| m.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub id: AnnotationId,
    pub metadata: AnnotationMetadata,
    pub entities: Vec<Entity>,
}
