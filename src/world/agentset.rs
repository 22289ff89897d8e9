//! Source sets: the candidate pool a neighbor query draws from.

use fixedbitset::FixedBitSet;
use rustc_hash::FxHashSet;

use super::agents::{AgentKind, BreedId, PatchId, Turtle, TurtleId};

/// Which agents a query may return.
///
/// The whole-kind and breed variants are canonical sets compared by tag;
/// the explicit variants list specific agents.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceSet {
    AllPatches,
    AllTurtles,
    Breed(BreedId),
    Patches(Vec<PatchId>),
    Turtles(Vec<TurtleId>),
}

impl SourceSet {
    pub fn kind(&self) -> AgentKind {
        match self {
            SourceSet::AllPatches | SourceSet::Patches(_) => AgentKind::Patch,
            SourceSet::AllTurtles | SourceSet::Breed(_) | SourceSet::Turtles(_) => AgentKind::Turtle,
        }
    }

    /// Resolve the descriptor for a single query. Explicit sets are copied
    /// into an id set sized for O(1) lookups; it is dropped with the query.
    pub(crate) fn membership(&self, patch_count: usize) -> Membership {
        match self {
            SourceSet::AllPatches | SourceSet::AllTurtles => Membership::AllOfKind,
            SourceSet::Breed(breed) => Membership::Breed(*breed),
            SourceSet::Patches(ids) => {
                let mut bits = FixedBitSet::with_capacity(patch_count);
                for id in ids.iter().filter(|id| id.0 < patch_count) {
                    bits.insert(id.0);
                }
                Membership::Explicit(ExplicitIds::Patches(bits))
            }
            SourceSet::Turtles(ids) => {
                let set: FxHashSet<TurtleId> = ids.iter().copied().collect();
                Membership::Explicit(ExplicitIds::Turtles(set))
            }
        }
    }
}

#[derive(Debug)]
pub(crate) enum ExplicitIds {
    /// Patch ids are dense, so a bitset over the patch array.
    Patches(FixedBitSet),
    Turtles(FxHashSet<TurtleId>),
}

/// Per-query resolution of a [`SourceSet`].
#[derive(Debug)]
pub(crate) enum Membership {
    AllOfKind,
    Breed(BreedId),
    Explicit(ExplicitIds),
}

impl Membership {
    pub(crate) fn admits_patch(&self, id: PatchId) -> bool {
        match self {
            Membership::AllOfKind => true,
            Membership::Breed(_) => false,
            Membership::Explicit(ExplicitIds::Patches(bits)) => bits.contains(id.0),
            Membership::Explicit(ExplicitIds::Turtles(_)) => false,
        }
    }

    pub(crate) fn admits_turtle(&self, turtle: &Turtle) -> bool {
        match self {
            Membership::AllOfKind => true,
            Membership::Breed(breed) => turtle.breed == *breed,
            Membership::Explicit(ExplicitIds::Turtles(ids)) => ids.contains(&turtle.id),
            Membership::Explicit(ExplicitIds::Patches(_)) => false,
        }
    }
}
