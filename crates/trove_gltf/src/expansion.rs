//! Expansion of multi-part source entities into flat index spaces.
//!
//! Meshes are imported one primitive at a time, so a mesh with k primitives
//! occupies k consecutive mesh indices. Nodes referencing such a mesh occupy
//! k consecutive object indices. The first index of every sequence is the
//! canonical one: it carries the name and is what other entities point to.

use std::ops::Range;

use crate::document::Root;

/// Flat index space over (source index, part index) pairs, in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expansion {
    entries: Vec<(usize, usize)>,
    /// `offsets[i]` is the first flat index of source `i`, with one extra
    /// trailing entry equal to the total length
    offsets: Vec<usize>,
}

impl Expansion {
    /// Build from the number of parts of each source entity.
    pub fn from_counts<I: IntoIterator<Item = usize>>(counts: I) -> Self {
        let mut entries = Vec::new();
        let mut offsets = vec![0];

        for (source, count) in counts.into_iter().enumerate() {
            entries.extend((0..count).map(|part| (source, part)));
            offsets.push(entries.len());
        }

        Self { entries, offsets }
    }

    /// Total number of flat entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (source index, part index) of a flat entry.
    pub fn entry(&self, index: usize) -> Option<(usize, usize)> {
        self.entries.get(index).copied()
    }

    /// Flat indices belonging to a source entity.
    pub fn sequence(&self, source: usize) -> Range<usize> {
        match (self.offsets.get(source), self.offsets.get(source + 1)) {
            (Some(&start), Some(&end)) => start..end,
            _ => 0..0,
        }
    }

    /// Canonical flat index of a source entity, `None` if it has no parts.
    pub fn first(&self, source: usize) -> Option<usize> {
        let sequence = self.sequence(source);
        (!sequence.is_empty()).then_some(sequence.start)
    }
}

/// One entry per mesh primitive.
pub fn primitive_expansion(root: &Root) -> Expansion {
    Expansion::from_counts(root.meshes.iter().map(|mesh| mesh.primitives.len()))
}

/// One entry per node, plus one per extra primitive of the node's mesh.
pub fn node_expansion(root: &Root) -> Expansion {
    Expansion::from_counts(root.nodes.iter().map(|node| {
        node.mesh
            .as_ref()
            .and_then(|mesh| root.meshes.get(mesh.value()))
            .map_or(1, |mesh| mesh.primitives.len().max(1))
    }))
}
