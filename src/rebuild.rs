//! Copy-with-replacement helpers over ordered children.
//!
//! Every level of the document tree is "changed" the same way: walk the
//! children in order, rebuild the ones that are targeted, clone the rest, and
//! hand the new list to a freshly built parent. These helpers do the walk once
//! so each level only supplies its predicate and its child rebuild function.

/// Output of a replacement walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced<T> {
    /// The new children, same length and order as the input
    pub items: Vec<T>,
    /// How many children were rebuilt (for cursor walks: targets consumed)
    pub matched: usize,
}

/// Rebuild every child matching `is_target`; clone the others.
///
/// The caller decides what a match count other than the expected one means.
pub fn replace_each_matching<T, E>(
    items: &[T],
    mut is_target: impl FnMut(&T) -> bool,
    mut rebuild: impl FnMut(&T) -> Result<T, E>,
) -> Result<Replaced<T>, E>
where
    T: Clone,
{
    let mut matched = 0;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if is_target(item) {
            out.push(rebuild(item)?);
            matched += 1;
        } else {
            out.push(item.clone());
        }
    }
    Ok(Replaced {
        items: out,
        matched,
    })
}

/// Cursor walk over `items` against an ordered list of target keys.
///
/// A child is rebuilt when its key equals the target under the cursor; the
/// cursor then moves to the next target. Targets must therefore appear in the
/// same order as the children. `rebuild` receives the cursor position of the
/// target it is satisfying. `matched` reports how far the cursor got.
pub fn replace_in_order<T, K, E>(
    items: &[T],
    targets: &[K],
    mut key: impl FnMut(&T) -> K,
    mut rebuild: impl FnMut(usize, &T) -> Result<T, E>,
) -> Result<Replaced<T>, E>
where
    T: Clone,
    K: PartialEq,
{
    let mut cursor = 0;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if targets.get(cursor).map_or(false, |target| key(item) == *target) {
            out.push(rebuild(cursor, item)?);
            cursor += 1;
        } else {
            out.push(item.clone());
        }
    }
    Ok(Replaced {
        items: out,
        matched: cursor,
    })
}

/// Rebuild every child in order.
pub fn rebuild_all<T, U, E>(
    items: &[T],
    rebuild: impl FnMut(&T) -> Result<U, E>,
) -> Result<Vec<U>, E> {
    items.iter().map(rebuild).collect()
}
