//! Unique identifiers for document nodes and annotation collections.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier carried by every addressable node in a [`Document`](crate::Document).
///
/// Segmentations, sections, sentence groupings, sentences, tokenizations,
/// mentions, entities and the entity collections are all keyed by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub Uuid);

impl AnnotationId {
    /// A fresh random (v4) id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// An id built from a plain integer. Handy for fixtures.
    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for AnnotationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Source of fresh ids.
///
/// Takes `&self` so a single generator can be shared by concurrent merges.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> AnnotationId;
}

/// Random v4 uuids. The default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> AnnotationId {
        AnnotationId::random()
    }
}

/// Deterministic ids from a counter.
///
/// Produces `AnnotationId::from_u128(n)`, `n + 1`, ... so rendered documents
/// are stable across runs. Pick a start well above any fixture ids to keep
/// generated ids from colliding with existing ones.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1_000)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> AnnotationId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        AnnotationId::from_u128(u128::from(n))
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&self) -> AnnotationId {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids_are_ordered() {
        let ids = SequentialIds::starting_at(7);
        assert_eq!(ids.next_id(), AnnotationId::from_u128(7));
        assert_eq!(ids.next_id(), AnnotationId::from_u128(8));
        assert_eq!(ids.next_id(), AnnotationId::from_u128(9));
    }

    #[test]
    fn test_random_ids_do_not_repeat() {
        let ids = RandomIds;
        let seen: HashSet<AnnotationId> = (0..256).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 256);
    }

    #[test]
    fn test_display_is_hyphenated_uuid() {
        let id = AnnotationId::from_u128(1);
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000001");
    }

    #[test]
    fn test_sequential_ids_shared_across_threads() {
        let ids = std::sync::Arc::new(SequentialIds::starting_at(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..100).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 400);
    }
}
