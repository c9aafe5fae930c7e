//! Select, annotate in batches, merge once.

use layered_annotation::{AnnotationId, Document};
use layered_annotation_merge::{MergeRequest, Reattacher};

use crate::{
    flatten, group_by_leading_number, AnnotationEngine, PipelineError, SelectionPolicy,
};

/// Annotate the sentences `policy` selects in one segmentation of `doc`.
///
/// Sections are sent to `engine` in batches of equal leading number. Chain
/// mentions must stay within their own batch; they are then shifted onto the
/// flattened sentence order of the whole selection, and everything is merged
/// with a single call so the new annotations share one timestamp and one
/// entity collection.
pub fn annotate_document<E>(
    doc: &Document,
    segmentation_id: AnnotationId,
    policy: &SelectionPolicy,
    engine: &E,
    reattacher: &Reattacher,
) -> Result<Document, PipelineError>
where
    E: AnnotationEngine + ?Sized,
    E::Error: std::error::Error + Send + Sync + 'static,
{
    let selection = flatten(doc, segmentation_id, policy)?;
    if selection.is_empty() {
        return Ok(reattacher.merge(doc, MergeRequest::new(segmentation_id))?);
    }

    let mut sentences = Vec::with_capacity(selection.sentence_count());
    let mut chains = Vec::new();

    for (batch_idx, batch) in group_by_leading_number(&selection).iter().enumerate() {
        let texts = batch.sentence_texts();
        if texts.is_empty() {
            continue;
        }

        log::debug!("annotating batch {} ({} sentences)", batch_idx, texts.len());
        let output = engine
            .annotate(&texts)
            .map_err(|e| PipelineError::Engine {
                batch: batch_idx,
                source: Box::new(e),
            })?;
        if output.sentences.len() != texts.len() {
            return Err(PipelineError::BundleCountMismatch {
                batch: batch_idx,
                submitted: texts.len(),
                returned: output.sentences.len(),
            });
        }

        for (chain_idx, chain) in output.chains.iter().enumerate() {
            if let Some((mention_idx, mention)) = chain
                .mentions
                .iter()
                .enumerate()
                .find(|(_, m)| m.sentence >= texts.len())
            {
                return Err(PipelineError::ChainOutOfBatch {
                    batch: batch_idx,
                    chain: chain_idx,
                    mention: mention_idx,
                    sentence: mention.sentence,
                    batch_len: texts.len(),
                });
            }
        }

        chains.extend(output.offset_chains(sentences.len()));
        sentences.extend(output.sentences);
    }

    let request = selection.to_request(sentences, chains);
    Ok(reattacher.merge(doc, request)?)
}
