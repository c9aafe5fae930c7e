//! Splitting a selection into engine batches.

use crate::FlatSelection;

/// Batch consecutive sections that share a leading number.
///
/// Sections numbered `1, 1, 2, -, -, 2` become `[1, 1] [2] [-] [-] [2]`: a run
/// of equal `Some(n)` forms one batch, and every unnumbered section is a batch
/// of its own. Concatenating the batches gives back `selection`.
pub fn group_by_leading_number(selection: &FlatSelection) -> Vec<FlatSelection> {
    let mut batches: Vec<FlatSelection> = Vec::new();
    let mut current_number = None;

    for section in &selection.sections {
        let continues = section.number.is_some() && section.number == current_number;
        current_number = section.number;
        if continues {
            if let Some(batch) = batches.last_mut() {
                batch.sections.push(section.clone());
                continue;
            }
        }

        let mut batch = FlatSelection::new(selection.segmentation_id);
        batch.sections.push(section.clone());
        batches.push(batch);
    }

    log::debug!(
        "split {} sections into {} batches",
        selection.sections.len(),
        batches.len()
    );
    batches
}
