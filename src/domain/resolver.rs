//! Path resolution over the element hierarchies.
//!
//! A [`PathResolver`] turns a delimited path string like
//! `"Passives->Resistors->SMD"` into the chain of elements it names,
//! optionally creating the segments that do not exist yet. Created elements
//! are only held in the resolver's cache; persisting them is the caller's
//! decision, via [`PathResolver::into_created`].

use std::collections::BTreeMap;

use crate::{
    domain::{ElementId, ElementKind, Name, StructuralElement},
    storage::{CaseMatch, ElementStore, NameField, NameLookup, ParentScope},
};

/// Separator used inside cache keys.
///
/// Names reject control characters, so a joined path key can never collide
/// with a single name that happens to contain the separator.
const KEY_SEPARATOR: char = '\u{1f}';

/// Options controlling how path segments match existing elements.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Delimiter splitting a path into segments.
    ///
    /// An empty delimiter treats the whole trimmed path as one segment.
    pub delimiter: String,
    /// Name comparison mode.
    pub case: CaseMatch,
    /// Whether lookups retry against alternative names after a primary-name
    /// miss.
    pub allow_alternative_names: bool,
    /// Whether unmatched segments are created.
    pub allow_creation: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            delimiter: "->".to_string(),
            case: CaseMatch::Sensitive,
            allow_alternative_names: false,
            allow_creation: false,
        }
    }
}

/// Memo of freshly created, not-yet-persisted elements.
///
/// Keyed by the element's full path so that resolving the same path twice
/// within one operation reuses the first call's element instead of creating
/// a duplicate that would collide once persisted.
#[derive(Debug, Default)]
pub struct NewElementCache {
    entries: BTreeMap<String, StructuralElement>,
}

impl NewElementCache {
    /// Returns the cached element for `key`, provided its name and parent
    /// still match the request. A stale entry is never reused.
    #[must_use]
    pub fn get(&self, key: &str, name: &str, parent: Option<ElementId>) -> Option<&StructuralElement> {
        let entry = self.entries.get(key)?;
        if entry.name.as_str() == name && entry.parent == parent {
            Some(entry)
        } else {
            tracing::debug!(key, "cached element no longer matches requested name and parent");
            None
        }
    }

    /// Stores an element under its full-path key.
    pub fn put(&mut self, key: String, element: StructuralElement) {
        self.entries.insert(key, element);
    }

    /// Number of cached elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key_of(&self, id: ElementId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, element)| element.id == id)
            .map(|(key, _)| key.as_str())
    }

    fn elements(&self) -> impl Iterator<Item = &StructuralElement> {
        self.entries.values()
    }

    // BTreeMap orders a parent's key strictly before its children's keys,
    // so this yields parents first.
    fn into_elements(self) -> Vec<StructuralElement> {
        self.entries.into_values().collect()
    }
}

/// Resolves delimited paths against one hierarchy of a store.
///
/// A resolver is scoped to a single operation: it owns a [`NewElementCache`]
/// that must not outlive the operation or be shared across operations.
#[derive(Debug)]
pub struct PathResolver<'a, S> {
    store: &'a S,
    kind: ElementKind,
    cache: NewElementCache,
}

impl<'a, S: ElementStore> PathResolver<'a, S> {
    /// Creates a resolver for one hierarchy with a fresh cache.
    #[must_use]
    pub fn new(store: &'a S, kind: ElementKind) -> Self {
        Self {
            store,
            kind,
            cache: NewElementCache::default(),
        }
    }

    /// The hierarchy this resolver operates on.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Resolves a delimited path into the chain of elements it names.
    ///
    /// Segments are trimmed; empty segments are skipped. Each segment
    /// resolves against the previous segment's element as parent. A segment
    /// that matches nothing (and may not be created) aborts the whole walk:
    /// the result is then empty. An empty result is a negative answer, not
    /// an error.
    #[must_use]
    pub fn resolve_path(&mut self, path: &str, options: &ResolveOptions) -> Vec<StructuralElement> {
        let segments = split_segments(path, &options.delimiter);

        let mut resolved: Vec<StructuralElement> = Vec::with_capacity(segments.len());
        let mut parent: Option<ElementId> = None;
        let mut parent_key: Option<String> = None;

        for segment in segments {
            let Some(element) =
                self.resolve_with_key(segment, parent, true, parent_key.as_deref(), options)
            else {
                return Vec::new();
            };

            parent = Some(element.id);
            parent_key = Some(child_key(parent_key.as_deref(), element.name.as_str()));
            resolved.push(element);
        }

        resolved
    }

    /// Strict-case, primary-name-only path resolution.
    #[must_use]
    pub fn resolve_path_strict(
        &mut self,
        path: &str,
        delimiter: &str,
        allow_creation: bool,
    ) -> Vec<StructuralElement> {
        let options = ResolveOptions {
            delimiter: delimiter.to_string(),
            case: CaseMatch::Sensitive,
            allow_alternative_names: false,
            allow_creation,
        };
        self.resolve_path(path, &options)
    }

    /// Resolves a single name against an explicit parent.
    ///
    /// With `respect_parent` set, only children of `parent` (or roots when
    /// `parent` is `None`) are candidates; otherwise the whole hierarchy is
    /// searched. The primary name is tried first, then the alternative
    /// names if the options allow. An unmatched name is created when the
    /// options allow creation, reusing a cached element if this resolver
    /// already created one for the same path.
    #[must_use]
    pub fn resolve_single(
        &mut self,
        name: &str,
        parent: Option<ElementId>,
        respect_parent: bool,
        options: &ResolveOptions,
    ) -> Option<StructuralElement> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let parent_key = self.parent_key(parent);
        self.resolve_with_key(name, parent, respect_parent, parent_key.as_deref(), options)
    }

    /// Case-folded single-name lookup across the whole hierarchy, allowing
    /// alternative names and ignoring parents.
    #[must_use]
    pub fn resolve_single_lax(
        &mut self,
        name: &str,
        allow_creation: bool,
    ) -> Option<StructuralElement> {
        let options = ResolveOptions {
            case: CaseMatch::Folded,
            allow_alternative_names: true,
            allow_creation,
            ..ResolveOptions::default()
        };
        self.resolve_single(name, None, false, &options)
    }

    /// The elements this resolver created, parents before children.
    pub fn created(&self) -> impl Iterator<Item = &StructuralElement> {
        self.cache.elements()
    }

    /// Consumes the resolver, yielding the created elements (parents before
    /// children) for the caller to persist.
    #[must_use]
    pub fn into_created(self) -> Vec<StructuralElement> {
        self.cache.into_elements()
    }

    fn resolve_with_key(
        &mut self,
        name: &str,
        parent: Option<ElementId>,
        respect_parent: bool,
        parent_key: Option<&str>,
        options: &ResolveOptions,
    ) -> Option<StructuralElement> {
        let parent_scope = if respect_parent {
            ParentScope::Exactly(parent)
        } else {
            ParentScope::Any
        };

        let primary = NameLookup {
            name,
            field: NameField::Primary,
            case: options.case,
            parent: parent_scope,
        };
        if let Some(found) = self.store.lookup(self.kind, &primary) {
            return Some(found.clone());
        }

        if options.allow_alternative_names {
            let alternative = NameLookup {
                field: NameField::Alternative,
                ..primary
            };
            if let Some(found) = self.store.lookup(self.kind, &alternative) {
                return Some(found.clone());
            }
        }

        if !options.allow_creation {
            return None;
        }

        let key = child_key(parent_key, name);
        if let Some(cached) = self.cache.get(&key, name, parent) {
            tracing::debug!(name, "reusing cached unpersisted element");
            return Some(cached.clone());
        }

        let validated = Name::new(name).ok()?;
        let mut element = StructuralElement::new(self.kind, validated.clone(), parent);
        element.add_alternative_name(validated);
        tracing::debug!(name, id = %element.id, "created element for unmatched segment");

        self.cache.put(key, element.clone());
        Some(element)
    }

    /// Cache-key prefix for an explicit parent: the parent's own cache key
    /// if this resolver created it, else its stored path.
    fn parent_key(&self, parent: Option<ElementId>) -> Option<String> {
        let id = parent?;

        if let Some(key) = self.cache.key_of(id) {
            return Some(key.to_string());
        }

        if let Ok(chain) = self.store.path_from_root(id) {
            let mut key: Option<String> = None;
            for element in chain {
                key = Some(child_key(key.as_deref(), element.name.as_str()));
            }
            return key;
        }

        // Dangling parent reference: key by id so nothing can collide.
        Some(id.to_string())
    }
}

fn child_key(parent_key: Option<&str>, name: &str) -> String {
    match parent_key {
        Some(prefix) => format!("{prefix}{KEY_SEPARATOR}{name}"),
        None => name.to_string(),
    }
}

fn split_segments<'p>(path: &'p str, delimiter: &str) -> Vec<&'p str> {
    if delimiter.is_empty() {
        let trimmed = path.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed]
        };
    }

    path.split(delimiter)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}
