//! Weak back-references from imported data to the source document.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::document::Document;

/// Which source record an imported entity was produced from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Animation(usize),
    Camera(usize),
    Light(usize),
    Scene(usize),
    Node(usize),
    Mesh { mesh: usize, primitive: usize },
    Material(usize),
    Texture(usize),
    Image(usize),
}

/// Opaque, non-owning handle to the document record behind an imported
/// entity.
///
/// Intended for debugging and introspection. It never keeps the document
/// alive: once the importer is closed or reopened, [`Provenance::document`]
/// returns `None`.
#[derive(Clone)]
pub struct Provenance {
    document: Weak<Document>,
    entity: EntityRef,
}

impl Provenance {
    pub(crate) fn new(document: &Arc<Document>, entity: EntityRef) -> Self {
        Self {
            document: Arc::downgrade(document),
            entity,
        }
    }

    /// The source record this entity was converted from.
    pub fn entity(&self) -> EntityRef {
        self.entity
    }

    /// The source document, if it is still open.
    pub fn document(&self) -> Option<Arc<Document>> {
        self.document.upgrade()
    }
}

impl PartialEq for Provenance {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity && Weak::ptr_eq(&self.document, &other.document)
    }
}

impl fmt::Debug for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provenance")
            .field("entity", &self.entity)
            .field("alive", &(self.document.strong_count() > 0))
            .finish()
    }
}
