/// Semantic-name binding tables of a linked pipeline
///
/// Callers pick semantic names ("vertexPosition") independently of the
/// shader-side variable names ("aVertexPosition"), so one semantic name can be
/// reused across pipelines whose shaders name their inputs differently.

use std::fmt;
use rustc_hash::FxHashMap;

/// Attribute slot resolved against a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeSlot(u32);

impl AttributeSlot {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Attribute index on the program
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AttributeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mapping from semantic name to a resolved handle
#[derive(Debug, Clone)]
pub struct BindingTable<H> {
    entries: FxHashMap<String, H>,
}

impl<H: Copy> BindingTable<H> {
    pub fn new() -> Self {
        Self { entries: FxHashMap::default() }
    }

    /// Store `handle` under `semantic`, returning the handle it replaced
    pub fn insert(&mut self, semantic: &str, handle: H) -> Option<H> {
        self.entries.insert(semantic.to_string(), handle)
    }

    pub fn get(&self, semantic: &str) -> Option<H> {
        self.entries.get(semantic).copied()
    }

    pub fn contains(&self, semantic: &str) -> bool {
        self.entries.contains_key(semantic)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, H)> + '_ {
        self.entries.iter().map(|(name, handle)| (name.as_str(), *handle))
    }
}

impl<H: Copy> Default for BindingTable<H> {
    fn default() -> Self {
        Self::new()
    }
}
