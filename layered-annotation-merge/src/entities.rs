//! Coreference chains to entity/mention collections.
//!
//! Chains arrive as mentions addressed by flattened sentence index and token
//! offsets. The builder resolves each sentence index to the tokenization that
//! the merge attached to that sentence, so every [`EntityMention`] references
//! annotations that actually exist in the new document.
//!
//! ```text
//! chain #0: (s0, 1..3) (s1, 0..1)
//!            │          │
//! tokenization ids: [t0, t1]
//!            │          │
//! Entity e0: [m0 -> t0 1..3, m1 -> t1 0..1]
//! ```

use layered_annotation::{
    AnnotationId, AnnotationMetadata, CorefChain, Entity, EntityMention, EntityMentionSet,
    EntitySet, TokenRefSequence,
};

use crate::{FreshIds, MergeError, MergeResult};

/// Accumulates entities chain by chain.
pub struct EntityBuilder<'a, 'g> {
    tokenization_ids: &'a [AnnotationId],
    metadata: &'a AnnotationMetadata,
    ids: &'a mut FreshIds<'g>,
    mention_set_id: AnnotationId,
    entity_set_id: AnnotationId,
    mentions: Vec<EntityMention>,
    entities: Vec<Entity>,
}

impl<'a, 'g> EntityBuilder<'a, 'g> {
    /// `tokenization_ids[i]` must be the tokenization attached to flattened sentence `i`.
    pub fn new(
        tokenization_ids: &'a [AnnotationId],
        metadata: &'a AnnotationMetadata,
        ids: &'a mut FreshIds<'g>,
    ) -> Self {
        let mention_set_id = ids.next_id();
        let entity_set_id = ids.next_id();
        Self {
            tokenization_ids,
            metadata,
            ids,
            mention_set_id,
            entity_set_id,
            mentions: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Add one chain as one entity; `chain_idx` is only used for error reporting.
    ///
    /// Nothing is recorded if any mention fails to resolve.
    pub fn add_chain(&mut self, chain_idx: usize, chain: &CorefChain) -> MergeResult<()> {
        let mut mentions = Vec::with_capacity(chain.len());
        for (mention_idx, mention) in chain.mentions.iter().enumerate() {
            let tokenization_id = self
                .tokenization_ids
                .get(mention.sentence)
                .copied()
                .ok_or(MergeError::IndexOutOfRange {
                    chain: chain_idx,
                    mention: mention_idx,
                    sentence: mention.sentence,
                    available: self.tokenization_ids.len(),
                })?;

            mentions.push(EntityMention {
                id: self.ids.next_id(),
                tokens: TokenRefSequence {
                    tokenization_id,
                    start: mention.start,
                    end: mention.end,
                },
            });
        }

        self.entities.push(Entity {
            id: self.ids.next_id(),
            mention_ids: mentions.iter().map(|m| m.id).collect(),
        });
        self.mentions.extend(mentions);
        Ok(())
    }

    pub fn build(self) -> (EntityMentionSet, EntitySet) {
        let mention_set = EntityMentionSet {
            id: self.mention_set_id,
            metadata: self.metadata.clone(),
            mentions: self.mentions,
        };
        let entity_set = EntitySet {
            id: self.entity_set_id,
            metadata: self.metadata.clone(),
            entities: self.entities,
        };
        (mention_set, entity_set)
    }
}

/// Build one entity per chain, in chain order.
///
/// Both collections carry their own fresh id and the same `metadata`.
pub fn build_entities(
    chains: &[CorefChain],
    tokenization_ids: &[AnnotationId],
    metadata: &AnnotationMetadata,
    ids: &mut FreshIds<'_>,
) -> MergeResult<(EntityMentionSet, EntitySet)> {
    let mut builder = EntityBuilder::new(tokenization_ids, metadata, ids);
    for (chain_idx, chain) in chains.iter().enumerate() {
        builder.add_chain(chain_idx, chain)?;
    }
    let (mention_set, entity_set) = builder.build();
    log::debug!(
        "built {} entities from {} mentions over {} tokenizations",
        entity_set.entities.len(),
        mention_set.mentions.len(),
        tokenization_ids.len()
    );
    Ok((mention_set, entity_set))
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_annotation::SequentialIds;

    fn fresh(ids: &SequentialIds) -> FreshIds<'_> {
        FreshIds::new(ids, [])
    }

    fn tokenizations(n: u128) -> Vec<AnnotationId> {
        (0..n).map(|i| AnnotationId::from_u128(100 + i)).collect()
    }

    #[test]
    fn test_chain_round_trip() {
        let toks = tokenizations(2);
        let metadata = AnnotationMetadata::new("stanford", 42);
        let ids = SequentialIds::starting_at(1_000);
        let chain = CorefChain::from_triples(&[(0, 1, 3), (1, 0, 1)]);

        let (mentions, entities) = build_entities(&[chain], &toks, &metadata, &mut fresh(&ids)).unwrap();

        assert_eq!(entities.entities.len(), 1);
        let entity = &entities.entities[0];
        assert_eq!(entity.mention_ids.len(), 2);

        let first = mentions.mention(entity.mention_ids[0]).unwrap();
        assert_eq!(first.tokens, TokenRefSequence { tokenization_id: toks[0], start: 1, end: 3 });
        let second = mentions.mention(entity.mention_ids[1]).unwrap();
        assert_eq!(second.tokens, TokenRefSequence { tokenization_id: toks[1], start: 0, end: 1 });

        assert_eq!(mentions.metadata, metadata);
        assert_eq!(entities.metadata, metadata);
        assert_ne!(mentions.id, entities.id);
    }

    #[test]
    fn test_entities_follow_chain_order() {
        let toks = tokenizations(3);
        let metadata = AnnotationMetadata::new("stanford", 0);
        let ids = SequentialIds::starting_at(1_000);
        let chains = vec![
            CorefChain::from_triples(&[(2, 0, 1)]),
            CorefChain::from_triples(&[(0, 0, 2), (1, 3, 4), (2, 5, 6)]),
        ];

        let (mentions, entities) = build_entities(&chains, &toks, &metadata, &mut fresh(&ids)).unwrap();

        assert_eq!(mentions.mentions.len(), 4);
        let sizes: Vec<usize> = entities.entities.iter().map(|e| e.mention_ids.len()).collect();
        assert_eq!(sizes, vec![1, 3]);

        // every mention belongs to exactly one entity
        let mut owned: Vec<AnnotationId> = entities
            .entities
            .iter()
            .flat_map(|e| e.mention_ids.iter().copied())
            .collect();
        owned.sort();
        let mut all: Vec<AnnotationId> = mentions.mentions.iter().map(|m| m.id).collect();
        all.sort();
        assert_eq!(owned, all);
    }

    #[test]
    fn test_sentence_index_out_of_range() {
        let toks = tokenizations(2);
        let metadata = AnnotationMetadata::new("stanford", 0);
        let ids = SequentialIds::starting_at(1_000);
        let chains = vec![
            CorefChain::from_triples(&[(0, 0, 1)]),
            CorefChain::from_triples(&[(1, 0, 1), (2, 0, 1)]),
        ];

        let err = build_entities(&chains, &toks, &metadata, &mut fresh(&ids)).unwrap_err();
        assert_eq!(
            err,
            MergeError::IndexOutOfRange { chain: 1, mention: 1, sentence: 2, available: 2 }
        );
    }

    #[test]
    fn test_no_chains_still_builds_sets() {
        let metadata = AnnotationMetadata::new("stanford", 0);
        let ids = SequentialIds::starting_at(1_000);
        let (mentions, entities) = build_entities(&[], &[], &metadata, &mut fresh(&ids)).unwrap();
        assert!(mentions.mentions.is_empty());
        assert!(entities.entities.is_empty());
        assert_eq!(mentions.id, AnnotationId::from_u128(1_000));
        assert_eq!(entities.id, AnnotationId::from_u128(1_001));
    }

    #[test]
    fn test_offsets_copied_literally() {
        // reversed and oversized ranges are not this builder's concern
        let toks = tokenizations(1);
        let metadata = AnnotationMetadata::new("stanford", 0);
        let ids = SequentialIds::starting_at(1_000);
        let chain = CorefChain::from_triples(&[(0, 9, 2)]);

        let (mentions, _) = build_entities(&[chain], &toks, &metadata, &mut fresh(&ids)).unwrap();
        assert_eq!(mentions.mentions[0].tokens.start, 9);
        assert_eq!(mentions.mentions[0].tokens.end, 2);
    }
}
