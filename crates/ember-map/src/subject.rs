//! Subject layer vocabulary and queued cell mutations.

use ember_core::Coordinates;
use std::fmt;

/// Identifies a subject instance placed on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(pub u32);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SubjectId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Opaque descriptor of one subject occupying a cell.
///
/// The full subject contract lives with the service layer; the map only
/// stores, replaces, and clears descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subject {
    /// Stable identity.
    pub id: SubjectId,
}

impl Subject {
    /// Descriptor for the given id.
    pub const fn new(id: u32) -> Self {
        Self { id: SubjectId(id) }
    }
}

/// What a [`SubjectQuery`] does to its addressed cell.
///
/// Deliberately small; this enum is the extension point for the richer
/// query kinds the service layer may add later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubjectMutation {
    /// Place or replace the subject at the addressed cell.
    Place(Subject),
    /// Remove the subject at the addressed cell, if any.
    Clear,
}

/// One externally authored request against one cell.
///
/// Owned exclusively by the interface queue until drained, then by the
/// mutation pipeline while it is applied, then discarded. The service
/// layer validates `coordinates` against the current dimension before
/// enqueueing; the pipeline never re-checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubjectQuery {
    /// Addressed cell.
    pub coordinates: Coordinates,
    /// The mutation to apply there.
    pub mutation: SubjectMutation,
}

impl SubjectQuery {
    /// Request placing `subject` at `coordinates`.
    pub const fn place(coordinates: Coordinates, subject: Subject) -> Self {
        Self {
            coordinates,
            mutation: SubjectMutation::Place(subject),
        }
    }

    /// Request clearing the subject at `coordinates`.
    pub const fn clear(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            mutation: SubjectMutation::Clear,
        }
    }
}
