//! The identity contract every stored value satisfies.

use std::fmt;
use std::hash::Hash;

/// A value that can live in a [`crate::Repository`].
///
/// Entities are treated as immutable values: a change is expressed by
/// building a new value and replacing the stored one wholesale.
pub trait Entity: Clone {
    /// Identity type. Ordered so snapshots come out in a stable order.
    type Id: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display;

    /// Label used in error messages (`"item"`, `"patient"`, ...).
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
}
