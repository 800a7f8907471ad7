//! Sibling ordering inside a container.
//!
//! # Responsibility
//! - Pick the `order` of an entity appended to a container.
//! - Rewrite sibling orders from an explicit id sequence (drag reorder).
//! - List a container's members in display order.
//!
//! # Invariants
//! - Only entities whose `container()` equals the target key are read or
//!   written; other containers in the same table are never touched.
//! - Order values are relative within one container and need not be
//!   contiguous.

use crate::model::entity::{ContainerKey, Ordered, Table};
use std::cmp::Ordering;

/// Order for a new last member: `max + 1`, or `0` for an empty container.
pub fn append_order<E: Ordered>(table: &Table<E>, container: &ContainerKey) -> f64 {
    table
        .iter()
        .filter(|entity| entity.container() == *container)
        .map(Ordered::order)
        .fold(None, |max: Option<f64>, order| {
            Some(max.map_or(order, |max| max.max(order)))
        })
        .map_or(0.0, |max| max + 1.0)
}

/// Rewrites `order` to the index in `ordered_ids` for every listed member of
/// `container`.
///
/// Ids that are absent, or that belong to another container, are ignored.
/// Returns how many entities were rewritten.
pub fn apply_order<E: Ordered>(
    table: &mut Table<E>,
    container: &ContainerKey,
    ordered_ids: &[String],
) -> usize {
    let mut rewritten = 0;
    for (index, id) in ordered_ids.iter().enumerate() {
        let Some(entity) = table.get_mut(id) else {
            continue;
        };
        if entity.container() != *container {
            continue;
        }
        entity.set_order(index as f64);
        rewritten += 1;
    }
    rewritten
}

/// Members of `container` sorted by `order`, ties kept in table order.
pub fn sorted_members<'a, E: Ordered>(table: &'a Table<E>, container: &ContainerKey) -> Vec<&'a E> {
    let mut members = table
        .iter()
        .filter(|entity| entity.container() == *container)
        .collect::<Vec<_>>();
    members.sort_by(|left, right| {
        left.order()
            .partial_cmp(&right.order())
            .unwrap_or(Ordering::Equal)
    });
    members
}
