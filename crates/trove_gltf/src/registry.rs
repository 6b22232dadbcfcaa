//! Name lookup tables built once per opened document.

use std::collections::HashMap;

/// Forward (name to index) and reverse (index to name) map for one entity
/// category.
///
/// Unnamed entities have an empty name and can't be looked up. If several
/// entities share a name, lookup returns the first one.
#[derive(Clone, Debug, Default)]
pub struct NameMap {
    forward: HashMap<String, usize>,
    reverse: Vec<String>,
}

impl NameMap {
    /// Build from names in index order.
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut map = NameMap::default();
        for name in names {
            let name = name.unwrap_or_default();
            let index = map.reverse.len();
            if !name.is_empty() {
                map.forward.entry(name.to_string()).or_insert(index);
            }
            map.reverse.push(name.to_string());
        }
        map
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// Index of the first entity with given name.
    pub fn index_for(&self, name: &str) -> Option<usize> {
        self.forward.get(name).copied()
    }

    /// Name of an entity, empty if it has none. `None` if out of range.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.reverse.get(index).map(String::as_str)
    }
}

/// Mapping between custom vertex attribute names and numeric IDs.
///
/// IDs are handed out in registration order and never change or go away
/// while the registry lives.
#[derive(Clone, Debug, Default)]
pub struct AttributeRegistry {
    ids: HashMap<String, u16>,
    names: Vec<String>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// ID of `name`, registering it if it's new. `None` once all IDs are
    /// used up.
    pub fn register(&mut self, name: &str) -> Option<u16> {
        if let Some(&id) = self.ids.get(name) {
            return Some(id);
        }

        let id = u16::try_from(self.names.len()).ok()?;
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        Some(id)
    }

    pub fn id(&self, name: &str) -> Option<u16> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: u16) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
