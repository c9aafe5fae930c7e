use layered_annotation::{
    AnnotationId, AnnotationMetadata, Document, FixedClock, Section, Segmentation, Sentence,
    SentenceAnnotations, SentenceGrouping, SequentialIds, TextSpan,
};
use proptest::prelude::*;
use proptest::sample::Index;

use crate::{MergeError, MergeRequest, Reattacher};

/// Per section: sentence count of each alternative grouping, and which one (if any) to target.
type Shape = Vec<(Vec<usize>, Option<Index>)>;

fn shape() -> impl Strategy<Value = Shape> {
    prop::collection::vec(
        (
            prop::collection::vec(0usize..4, 1..4),
            prop::option::of(any::<Index>()),
        ),
        1..6,
    )
}

/// Build a document of the given shape plus a request targeting the chosen groupings.
fn build(shape: &Shape) -> (Document, MergeRequest, Vec<AnnotationId>) {
    let mut next = 10u128;
    let mut fresh = || {
        next += 1;
        AnnotationId::from_u128(next)
    };

    let segmentation_id = fresh();
    let mut request = MergeRequest::new(segmentation_id);
    let mut targeted_sentences = Vec::new();
    let mut sections = Vec::new();

    for (grouping_sizes, target) in shape {
        let section_id = fresh();
        let groupings: Vec<SentenceGrouping> = grouping_sizes
            .iter()
            .map(|&size| {
                let sentences = (0..size)
                    .map(|_| Sentence::new(fresh(), TextSpan::new(0, 0)))
                    .collect();
                SentenceGrouping::new(fresh(), sentences)
            })
            .collect();

        if let Some(index) = target {
            let grouping = &groupings[index.index(groupings.len())];
            request = request.target(section_id, grouping.id);
            targeted_sentences.extend(grouping.sentences.iter().map(|s| s.id));
        }
        sections.push(Section::new(section_id, groupings));
    }

    let doc = Document::new(fresh(), "").with_segmentation(Segmentation::new(
        segmentation_id,
        AnnotationMetadata::new("splitter", 0),
        sections,
    ));
    let sentences = (0..targeted_sentences.len())
        .map(|k| SentenceAnnotations::from_words([format!("w{}", k).as_str()]))
        .collect();
    (doc, request.with_sentences(sentences), targeted_sentences)
}

fn reattacher() -> Reattacher {
    Reattacher::new()
        .with_clock(FixedClock(0))
        .with_id_generator(SequentialIds::starting_at(1_000_000))
}

/// The document with every merge product removed.
fn without_merge_output(doc: &Document) -> Document {
    let mut doc = doc.clone();
    doc.entity_mention_sets.clear();
    doc.entity_sets.clear();
    for segmentation in &mut doc.segmentations {
        for section in &mut segmentation.sections {
            for grouping in &mut section.groupings {
                for sentence in &mut grouping.sentences {
                    sentence.tokenizations.clear();
                }
            }
        }
    }
    doc
}

proptest! {
    /// Only targeted sentences change, each gaining exactly one tokenization, in order.
    #[test]
    fn merge_preserves_structure(shape in shape()) {
        let (doc, request, targeted) = build(&shape);
        let no_targets = request.section_ids.is_empty();
        let merged = reattacher().merge(&doc, request).unwrap();

        if no_targets {
            prop_assert_eq!(merged, doc);
            return Ok(());
        }

        prop_assert_eq!(without_merge_output(&merged), doc);
        prop_assert_eq!(merged.tokenization_count(), targeted.len());

        let mut order = Vec::new();
        for sentence in merged.segmentations[0]
            .sections
            .iter()
            .flat_map(|s| &s.groupings)
            .flat_map(|g| &g.sentences)
        {
            let expected = usize::from(targeted.contains(&sentence.id));
            prop_assert_eq!(sentence.tokenizations.len(), expected);
            if let Some(tokenization) = sentence.tokenizations.first() {
                order.push(tokenization.annotations.tokens[0].text.clone());
            }
        }
        let expected_order: Vec<String> = (0..targeted.len()).map(|k| format!("w{}", k)).collect();
        prop_assert_eq!(order, expected_order);
    }

    /// Any bundle count other than the targeted sentence count is rejected.
    #[test]
    fn merge_consumes_exactly(shape in shape()) {
        let (doc, request, targeted) = build(&shape);
        prop_assume!(!request.section_ids.is_empty());

        let mut extra = request.clone();
        extra.sentences.push(SentenceAnnotations::from_words(["stray"]));
        prop_assert_eq!(
            reattacher().merge(&doc, extra).unwrap_err(),
            MergeError::UnconsumedInput { consumed: targeted.len(), supplied: targeted.len() + 1 }
        );

        if !targeted.is_empty() {
            let mut short = request;
            short.sentences.pop();
            let err = reattacher().merge(&doc, short).unwrap_err();
            prop_assert!(
                matches!(err, MergeError::ExhaustedInput { consumed, .. } if consumed + 1 == targeted.len()),
                "unexpected error: {:?}",
                err
            );
        }
    }
}
