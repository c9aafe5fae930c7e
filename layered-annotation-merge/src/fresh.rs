//! Ids guaranteed unused in the document being merged into.

use std::collections::HashSet;

use layered_annotation::{AnnotationId, Document, IdGenerator};

/// Draws from an [`IdGenerator`], skipping every id already taken.
///
/// Seeded with the ids of the input document; every id it hands out is
/// recorded too, so one merge call never produces the same id twice even
/// when the generator restarts a sequence the document already contains.
pub struct FreshIds<'g> {
    source: &'g dyn IdGenerator,
    taken: HashSet<AnnotationId>,
}

impl<'g> FreshIds<'g> {
    pub fn new(source: &'g dyn IdGenerator, taken: impl IntoIterator<Item = AnnotationId>) -> Self {
        Self {
            source,
            taken: taken.into_iter().collect(),
        }
    }

    /// Fresh with respect to every id in `doc`.
    pub fn for_document(source: &'g dyn IdGenerator, doc: &Document) -> Self {
        Self::new(source, doc.ids())
    }

    pub fn next_id(&mut self) -> AnnotationId {
        loop {
            let id = self.source.next_id();
            if self.taken.insert(id) {
                return id;
            }
            log::debug!("skipping id {}, already in use", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_annotation::SequentialIds;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_skips_taken_ids() {
        let source = SequentialIds::starting_at(10);
        let taken = [11, 12, 14].map(AnnotationId::from_u128);
        let mut ids = FreshIds::new(&source, taken);

        let drawn: Vec<u128> = (0..3).map(|_| ids.next_id().0.as_u128()).collect();
        assert_eq!(drawn, vec![10, 13, 15]);
    }

    /// Yields 0, 0, 1, 1, 2, 2, ...
    struct Stutter(AtomicU64);

    impl IdGenerator for Stutter {
        fn next_id(&self) -> AnnotationId {
            AnnotationId::from_u128(u128::from(self.0.fetch_add(1, Ordering::SeqCst) / 2))
        }
    }

    #[test]
    fn test_never_issues_an_id_twice() {
        let source = Stutter(AtomicU64::new(0));
        let mut ids = FreshIds::new(&source, []);
        let drawn: Vec<u128> = (0..3).map(|_| ids.next_id().0.as_u128()).collect();
        assert_eq!(drawn, vec![0, 1, 2]);
    }
}
