use std::collections::{BTreeMap, BTreeSet, VecDeque};

// ---------------------------------------------------------------------------
// Graph vocabulary
// ---------------------------------------------------------------------------

/// Inputs written from outside the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    Dataset,
    SelectedAttribute,
    PlotlyBinCount,
    SeabornBinCount,
    SelectedSpecies,
}

/// Memoized computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    FilteredData,
    Table,
    Grid,
    SpeciesHistogram,
    Scatter,
    PlotlyHistogram,
    SeabornHistogram,
}

impl Node {
    /// Every node, upstream first.
    pub const ALL: [Node; 7] = [
        Node::FilteredData,
        Node::Table,
        Node::Grid,
        Node::SpeciesHistogram,
        Node::Scatter,
        Node::PlotlyHistogram,
        Node::SeabornHistogram,
    ];
}

/// An entry in a node's read-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dep {
    Source(Source),
    Node(Node),
}

// ---------------------------------------------------------------------------
// Dependency graph
// ---------------------------------------------------------------------------

/// Explicit dependency graph: nodes register what they read, writers call
/// [`DependencyGraph::notify`]. Invalidation is eager and transitive,
/// recomputation is left to whoever pulls the node next.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    read_sets: BTreeMap<Node, BTreeSet<Dep>>,
    dependents: BTreeMap<Dep, BTreeSet<Node>>,
    dirty: BTreeSet<Node>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the read-set of `node`. The node and everything
    /// downstream of it start out dirty.
    pub fn register(&mut self, node: Node, reads: impl IntoIterator<Item = Dep>) {
        if let Some(old) = self.read_sets.remove(&node) {
            for dep in old {
                if let Some(set) = self.dependents.get_mut(&dep) {
                    set.remove(&node);
                }
            }
        }
        let reads: BTreeSet<Dep> = reads.into_iter().collect();
        for dep in &reads {
            self.dependents.entry(*dep).or_default().insert(node);
        }
        self.read_sets.insert(node, reads);
        self.invalidate(node);
    }

    pub fn reads(&self, node: Node) -> impl Iterator<Item = Dep> + '_ {
        self.read_sets.get(&node).into_iter().flatten().copied()
    }

    /// Whether `node` currently reads `dep`.
    pub fn depends_on(&self, node: Node, dep: Dep) -> bool {
        self.read_sets.get(&node).is_some_and(|set| set.contains(&dep))
    }

    /// A source was written. Returns the nodes that went from clean to dirty.
    pub fn notify(&mut self, source: Source) -> Vec<Node> {
        let direct: Vec<Node> = self
            .dependents
            .get(&Dep::Source(source))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();

        let mut invalidated = Vec::new();
        for node in direct {
            invalidated.extend(self.invalidate(node));
        }
        if !invalidated.is_empty() {
            log::debug!("{source:?} changed, invalidated {invalidated:?}");
        }
        invalidated
    }

    /// Mark `node` and every transitive dependent dirty. Returns the nodes
    /// that were clean before, in breadth-first order.
    pub fn invalidate(&mut self, node: Node) -> Vec<Node> {
        let mut newly_dirty = Vec::new();
        let mut queue = VecDeque::from([node]);
        let mut seen = BTreeSet::new();

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            if self.dirty.insert(current) {
                newly_dirty.push(current);
            }
            if let Some(next) = self.dependents.get(&Dep::Node(current)) {
                queue.extend(next.iter().copied());
            }
        }
        newly_dirty
    }

    pub fn is_dirty(&self, node: Node) -> bool {
        self.dirty.contains(&node)
    }

    pub fn mark_clean(&mut self, node: Node) {
        self.dirty.remove(&node);
    }
}

// ---------------------------------------------------------------------------
// Memo cell
// ---------------------------------------------------------------------------

/// Cached value of one graph node plus a count of how often it was computed.
#[derive(Debug)]
pub struct Memo<T> {
    value: Option<T>,
    computations: usize,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Memo {
            value: None,
            computations: 0,
        }
    }
}

impl<T: Clone> Memo<T> {
    /// Return the cached value, or run `compute` when `node` is dirty or
    /// nothing has been computed yet.
    pub fn get_or_compute(
        &mut self,
        graph: &mut DependencyGraph,
        node: Node,
        compute: impl FnOnce() -> T,
    ) -> T {
        if let Some(value) = &self.value {
            if !graph.is_dirty(node) {
                return value.clone();
            }
        }
        let value = compute();
        self.computations += 1;
        log::debug!("recomputed {node:?} (#{})", self.computations);
        self.value = Some(value.clone());
        graph.mark_clean(node);
        value
    }

    pub fn computations(&self) -> usize {
        self.computations
    }
}
