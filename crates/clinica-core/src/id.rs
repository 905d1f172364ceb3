// Gap-filling identifier allocation for appointments.

/// Returns the smallest positive identifier not present in `existing`.
///
/// Identifiers are scanned in ascending order with a candidate starting at 1;
/// the first time the candidate falls below an identifier in use, that gap is
/// returned. Non-positive and repeated identifiers never hold a slot.
///
/// The result is only valid for the snapshot it was computed from, so it has
/// to be recomputed right before every insert.
pub fn next_free_id<I>(existing: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    let mut ids: Vec<i64> = existing.into_iter().filter(|id| *id > 0).collect();
    ids.sort_unstable();

    let mut candidate = 1;
    for id in ids {
        if candidate < id {
            return candidate;
        }
        candidate = candidate.max(id + 1);
    }
    candidate
}
