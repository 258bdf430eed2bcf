//! Position and identifier derivation for ordered board collections.
//!
//! Lanes are ordered within a pipeline and tickets within a lane. New rows
//! are appended to the end of their parent's sequence unless the caller
//! supplies a position. Supplied positions are stored as given: nothing here
//! checks them against siblings, and nothing renumbers siblings after a
//! delete or a move.

/// Pick the `order` value to persist for an upsert.
///
/// * explicit position: used verbatim
/// * no position, row already exists: keep the stored position
/// * no position, new row: append after the current siblings
pub fn resolve_order(explicit: Option<i64>, existing: Option<i64>, sibling_count: i64) -> i64 {
    match (explicit, existing) {
        (Some(order), _) => order,
        (None, Some(current)) => current,
        (None, None) => sibling_count,
    }
}

/// Return the caller's id, or a fresh UUID when none (or an empty one) was given.
pub fn resolve_id(id: Option<&str>) -> String {
    match id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    }
}
