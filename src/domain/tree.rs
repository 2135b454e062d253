//! Tree views over the element hierarchies.
//!
//! A hierarchy is stored flat, as elements with parent references. This
//! module materializes it: [`build_tree`] produces an owned nested view,
//! [`flatten`] a depth-first listing. Both walk children in natural name
//! order and fail loudly when a parent chain loops instead of recursing
//! forever. [`find_cycles`] is the global audit for loops, including those
//! no root can reach.

use std::collections::HashSet;

use nonempty::NonEmpty;
use petgraph::{
    algo::{is_cyclic_directed, tarjan_scc},
    graphmap::DiGraphMap,
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    domain::{ElementId, ElementKind, NameOrdering, StructuralElement, redirect::UrlGenerator},
    storage::ElementStore,
};

/// One node of a materialized tree.
///
/// The node owns its children; it stays valid after the store moves on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// Display label, the element's name.
    pub label: String,
    /// Link target for renderers that make nodes navigable. `None` unless
    /// the tree was built with links.
    pub href: Option<String>,
    /// Id of the underlying element.
    pub id: ElementId,
    /// Child nodes in natural name order.
    pub children: Vec<TreeNode>,
}

/// A hierarchy that cannot be materialized as a tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsistencyError {
    /// An element was reached twice in one walk, so its parent chain loops.
    #[error("hierarchy contains a cycle through element {0}")]
    Cycle(ElementId),
}

/// Root elements of a hierarchy, natural-sorted by name.
#[must_use]
pub fn roots<S: ElementStore>(
    store: &S,
    kind: ElementKind,
    order: NameOrdering,
) -> Vec<&StructuralElement> {
    store.children_of(kind, None, order)
}

/// Materializes the subtrees below `parent` (the whole hierarchy for
/// `None`) as owned nodes without links.
///
/// # Errors
///
/// Returns [`ConsistencyError::Cycle`] when the walk meets an element
/// twice.
pub fn build_tree<S: ElementStore>(
    store: &S,
    kind: ElementKind,
    parent: Option<ElementId>,
    order: NameOrdering,
) -> Result<Vec<TreeNode>, ConsistencyError> {
    build_with(store, kind, parent, order, &|_| None)
}

/// Like [`build_tree`], with each node linking to its element's part list.
///
/// # Errors
///
/// Returns [`ConsistencyError::Cycle`] when the walk meets an element
/// twice.
pub fn build_tree_with_links<S: ElementStore, U: UrlGenerator>(
    store: &S,
    kind: ElementKind,
    parent: Option<ElementId>,
    order: NameOrdering,
    urls: &U,
) -> Result<Vec<TreeNode>, ConsistencyError> {
    build_with(store, kind, parent, order, &|element| {
        Some(urls.part_list(kind, element.id))
    })
}

/// Depth-first listing of all elements below `parent` (the whole hierarchy
/// for `None`), each element preceding its descendants.
///
/// # Errors
///
/// Returns [`ConsistencyError::Cycle`] when the walk meets an element
/// twice.
pub fn flatten<S: ElementStore>(
    store: &S,
    kind: ElementKind,
    parent: Option<ElementId>,
    order: NameOrdering,
) -> Result<Vec<&StructuralElement>, ConsistencyError> {
    let mut list = Vec::new();
    let mut visited = HashSet::new();
    for element in store.children_of(kind, parent, order) {
        flatten_into(store, kind, element, order, &mut visited, &mut list)?;
    }
    Ok(list)
}

/// Whether the hierarchy's parent references contain any loop.
#[must_use]
pub fn has_cycles<S: ElementStore>(store: &S, kind: ElementKind) -> bool {
    is_cyclic_directed(&parent_graph(store, kind))
}

/// All loops in the hierarchy's parent references, as groups of element
/// ids. Unlike the tree walks this sees every element, reachable from a
/// root or not.
#[must_use]
pub fn find_cycles<S: ElementStore>(store: &S, kind: ElementKind) -> Vec<NonEmpty<ElementId>> {
    let graph = parent_graph(store, kind);

    let mut cycles = Vec::new();
    for component in tarjan_scc(&graph) {
        if component.len() > 1 {
            let mut ids = component;
            ids.sort_unstable();
            if let Some(cycle) = NonEmpty::from_vec(ids) {
                cycles.push(cycle);
            }
            continue;
        }

        let Some(&node) = component.first() else {
            continue;
        };

        if graph.contains_edge(node, node) {
            cycles.push(NonEmpty::new(node));
        }
    }

    cycles.sort_by_key(|cycle| *cycle.first());
    cycles
}

/// Child-to-parent reference graph of one hierarchy.
fn parent_graph<S: ElementStore>(store: &S, kind: ElementKind) -> DiGraphMap<ElementId, ()> {
    let mut graph = DiGraphMap::new();
    for element in store.all_of_kind(kind) {
        graph.add_node(element.id);
        if let Some(parent) = element.parent {
            graph.add_edge(element.id, parent, ());
        }
    }
    graph
}

fn build_with<S: ElementStore>(
    store: &S,
    kind: ElementKind,
    parent: Option<ElementId>,
    order: NameOrdering,
    link: &dyn Fn(&StructuralElement) -> Option<String>,
) -> Result<Vec<TreeNode>, ConsistencyError> {
    let mut visited = HashSet::new();
    store
        .children_of(kind, parent, order)
        .into_iter()
        .map(|element| subtree(store, kind, element, order, link, &mut visited))
        .collect()
}

// Every element has one parent reference, so a correct hierarchy visits
// each element at most once; a second visit proves a loop.
fn subtree<S: ElementStore>(
    store: &S,
    kind: ElementKind,
    element: &StructuralElement,
    order: NameOrdering,
    link: &dyn Fn(&StructuralElement) -> Option<String>,
    visited: &mut HashSet<ElementId>,
) -> Result<TreeNode, ConsistencyError> {
    if !visited.insert(element.id) {
        return Err(ConsistencyError::Cycle(element.id));
    }

    let children = store
        .children_of(kind, Some(element.id), order)
        .into_iter()
        .map(|child| subtree(store, kind, child, order, link, visited))
        .collect::<Result<_, _>>()?;

    Ok(TreeNode {
        label: element.name.to_string(),
        href: link(element),
        id: element.id,
        children,
    })
}

fn flatten_into<'s, S: ElementStore>(
    store: &'s S,
    kind: ElementKind,
    element: &'s StructuralElement,
    order: NameOrdering,
    visited: &mut HashSet<ElementId>,
    list: &mut Vec<&'s StructuralElement>,
) -> Result<(), ConsistencyError> {
    if !visited.insert(element.id) {
        return Err(ConsistencyError::Cycle(element.id));
    }

    list.push(element);
    for child in store.children_of(kind, Some(element.id), order) {
        flatten_into(store, kind, child, order, visited, list)?;
    }
    Ok(())
}
