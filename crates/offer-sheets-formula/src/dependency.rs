//! Dependency tracking for formula calculation

use crate::formula_map::FormulaMap;
use crate::references::scan_references;
use ahash::{AHashMap, AHashSet};
use offer_sheets_core::CellKey;
use std::collections::VecDeque;

/// Dependency graph for formula cells
///
/// An edge from X to Y means "X's formula reads Y". Ranges expand to
/// every contained cell. A formula that references nothing has no entry.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// Cell → Cells it reads (precedents)
    precedents: AHashMap<CellKey, AHashSet<CellKey>>,
    /// Cell → Cells that read it (dependents)
    dependents: AHashMap<CellKey, AHashSet<CellKey>>,
    /// Formula cells with at least one range too large to expand
    skipped: AHashSet<CellKey>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for every formula in the map
    ///
    /// Ranges covering more than `max_range_cells` cells are left out and
    /// the graph is marked partial (see [`DependencyGraph::is_partial`]).
    pub fn build(formulas: &FormulaMap, max_range_cells: u64) -> Self {
        let mut graph = Self::new();
        for (key, formula) in formulas.iter() {
            graph.set_formula(key, formula, max_range_cells);
        }
        graph
    }

    /// Replace the outgoing edges of one cell with those of `formula`
    pub fn set_formula(&mut self, cell: CellKey, formula: &str, max_range_cells: u64) {
        self.clear_precedents(cell);

        for m in scan_references(formula) {
            let range = m.token.range();
            if range.cell_count() > max_range_cells {
                log::warn!(
                    "range {} in {} covers {} cells, not tracking its dependencies",
                    m.text,
                    cell,
                    range.cell_count()
                );
                self.skipped.insert(cell);
                continue;
            }
            for addr in range.cells() {
                self.add_dependency(CellKey::from(addr), cell);
            }
        }
    }

    /// Add a dependency: dependent reads precedent
    pub fn add_dependency(&mut self, precedent: CellKey, dependent: CellKey) {
        self.dependents
            .entry(precedent)
            .or_default()
            .insert(dependent);
        self.precedents
            .entry(dependent)
            .or_default()
            .insert(precedent);
    }

    /// Remove every edge going out of a cell (what it reads)
    pub fn clear_precedents(&mut self, cell: CellKey) {
        self.skipped.remove(&cell);
        if let Some(precedents) = self.precedents.remove(&cell) {
            for precedent in precedents {
                if let Some(deps) = self.dependents.get_mut(&precedent) {
                    deps.remove(&cell);
                    if deps.is_empty() {
                        self.dependents.remove(&precedent);
                    }
                }
            }
        }
    }

    /// Direct precedents of a cell, if it has an entry
    pub fn dependencies_of(&self, cell: CellKey) -> Option<&AHashSet<CellKey>> {
        self.precedents.get(&cell)
    }

    /// Cells whose formulas read the given cell directly
    pub fn direct_dependents(&self, cell: CellKey) -> impl Iterator<Item = CellKey> + '_ {
        self.dependents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Every cell that reads `cell`, directly or transitively
    ///
    /// `cell` itself is included only when it reads itself through a cycle.
    pub fn dependents_of(&self, cell: CellKey) -> AHashSet<CellKey> {
        let mut found = AHashSet::new();
        let mut queue: VecDeque<CellKey> = self.direct_dependents(cell).collect();

        while let Some(next) = queue.pop_front() {
            if found.insert(next) {
                queue.extend(self.direct_dependents(next));
            }
        }

        found
    }

    /// Changed cells followed by everything that depends on them, with
    /// each cell placed after the cells it reads
    ///
    /// Cells on a cycle are still listed once; their relative order is
    /// unspecified.
    pub fn recalc_order(&self, changed: &[CellKey]) -> Vec<CellKey> {
        let mut order = Vec::new();
        let mut visited = AHashSet::new();

        for &root in changed {
            if visited.contains(&root) {
                continue;
            }
            visited.insert(root);
            let mut work = vec![Frame::new(root, self.sorted_dependents(root))];

            // Post-order DFS over dependents
            while let Some(frame) = work.last_mut() {
                match frame.next_successor() {
                    Some(next) => {
                        if visited.insert(next) {
                            work.push(Frame::new(next, self.sorted_dependents(next)));
                        }
                    }
                    None => {
                        order.push(frame.node);
                        work.pop();
                    }
                }
            }
        }

        order.reverse();
        order
    }

    fn sorted_dependents(&self, cell: CellKey) -> Vec<CellKey> {
        let mut deps: Vec<CellKey> = self.direct_dependents(cell).collect();
        deps.sort_unstable();
        deps
    }

    fn sorted_precedents(&self, cell: CellKey) -> Vec<CellKey> {
        let mut precs: Vec<CellKey> = self
            .precedents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
            .collect();
        precs.sort_unstable();
        precs
    }

    /// Find every cell that lies on a cycle
    ///
    /// Uses Tarjan's strongly connected components: a component with more
    /// than one cell, or a single cell that reads itself, is circular.
    pub fn detect_circular(&self) -> CircularSet {
        let mut tarjan = Tarjan::default();
        let mut roots: Vec<CellKey> = self.precedents.keys().copied().collect();
        roots.sort_unstable();

        for root in roots {
            if !tarjan.index.contains_key(&root) {
                tarjan.run(self, root);
            }
        }

        CircularSet(tarjan.circular)
    }

    /// Whether a range was left out during construction
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Number of formula cells with at least one precedent
    pub fn len(&self) -> usize {
        self.precedents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.precedents.is_empty()
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.precedents.values().map(|set| set.len()).sum()
    }

    /// Clear the entire graph
    pub fn clear(&mut self) {
        self.dependents.clear();
        self.precedents.clear();
        self.skipped.clear();
    }
}

struct Frame {
    node: CellKey,
    successors: Vec<CellKey>,
    next: usize,
}

impl Frame {
    fn new(node: CellKey, successors: Vec<CellKey>) -> Self {
        Self {
            node,
            successors,
            next: 0,
        }
    }

    fn next_successor(&mut self) -> Option<CellKey> {
        let next = self.successors.get(self.next).copied();
        self.next += 1;
        next
    }
}

#[derive(Default)]
struct Tarjan {
    index: AHashMap<CellKey, usize>,
    lowlink: AHashMap<CellKey, usize>,
    stack: Vec<CellKey>,
    on_stack: AHashSet<CellKey>,
    circular: AHashSet<CellKey>,
}

impl Tarjan {
    fn visit(&mut self, node: CellKey) {
        let index = self.index.len();
        self.index.insert(node, index);
        self.lowlink.insert(node, index);
        self.stack.push(node);
        self.on_stack.insert(node);
    }

    fn lower(&mut self, node: CellKey, candidate: usize) {
        if let Some(low) = self.lowlink.get_mut(&node) {
            *low = (*low).min(candidate);
        }
    }

    fn run(&mut self, graph: &DependencyGraph, root: CellKey) {
        self.visit(root);
        let mut work = vec![Frame::new(root, graph.sorted_precedents(root))];

        while let Some(frame) = work.last_mut() {
            let node = frame.node;
            match frame.next_successor() {
                Some(next) => {
                    if !self.index.contains_key(&next) {
                        self.visit(next);
                        work.push(Frame::new(next, graph.sorted_precedents(next)));
                    } else if self.on_stack.contains(&next) {
                        let next_index = self.index[&next];
                        self.lower(node, next_index);
                    }
                }
                None => {
                    work.pop();
                    let low = self.lowlink[&node];
                    if let Some(parent) = work.last() {
                        self.lower(parent.node, low);
                    }
                    if low == self.index[&node] {
                        self.pop_component(graph, node);
                    }
                }
            }
        }
    }

    fn pop_component(&mut self, graph: &DependencyGraph, root: CellKey) {
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack.remove(&member);
            component.push(member);
            if member == root {
                break;
            }
        }

        let self_loop = graph
            .dependencies_of(root)
            .map_or(false, |deps| deps.contains(&root));
        if component.len() > 1 || self_loop {
            self.circular.extend(component);
        }
    }
}

/// Cells that lie on at least one dependency cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircularSet(AHashSet<CellKey>);

impl CircularSet {
    pub fn contains(&self, key: CellKey) -> bool {
        self.0.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.0.iter().copied()
    }

    /// Members sorted by row then column
    pub fn to_sorted_vec(&self) -> Vec<CellKey> {
        let mut keys: Vec<CellKey> = self.iter().collect();
        keys.sort_unstable();
        keys
    }
}

impl FromIterator<CellKey> for CircularSet {
    fn from_iter<I: IntoIterator<Item = CellKey>>(iter: I) -> Self {
        CircularSet(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(s: &str) -> CellKey {
        s.parse().unwrap()
    }

    fn graph_of(formulas: &[(&str, &str)]) -> DependencyGraph {
        let map: FormulaMap = formulas
            .iter()
            .map(|(k, f)| (key(k), f.to_string()))
            .collect();
        DependencyGraph::build(&map, 1_000_000)
    }

    #[test]
    fn test_build_expands_ranges() {
        let graph = graph_of(&[("3-0", "=SUM(A1:A3)+$B$1"), ("0-5", "=1+2")]);

        let mut deps: Vec<_> = graph.dependencies_of(key("3-0")).unwrap().iter().copied().collect();
        deps.sort();
        assert_eq!(deps, vec![key("0-0"), key("0-1"), key("1-0"), key("2-0")]);

        // No references, no entry
        assert!(graph.dependencies_of(key("0-5")).is_none());
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_add_dependency() {
        let mut graph = DependencyGraph::new();
        let a1 = key("0-0");
        let b1 = key("0-1");

        graph.add_dependency(a1, b1);

        assert!(graph.direct_dependents(a1).any(|c| c == b1));
        assert!(graph.dependencies_of(b1).unwrap().contains(&a1));
    }

    #[test]
    fn test_dependents_are_transitive() {
        // B1 reads A1, C1 reads B1, D1 reads A1 and C1
        let graph = graph_of(&[("0-1", "=A1*2"), ("0-2", "=B1+1"), ("0-3", "=A1+C1")]);

        let mut deps: Vec<_> = graph.dependents_of(key("0-0")).into_iter().collect();
        deps.sort();
        assert_eq!(deps, vec![key("0-1"), key("0-2"), key("0-3")]);
        assert!(graph.dependents_of(key("0-3")).is_empty());
    }

    #[test]
    fn test_recalc_order_respects_dependencies() {
        let graph = graph_of(&[("0-1", "=A1*2"), ("0-2", "=B1+1"), ("0-3", "=A1+C1")]);
        let order = graph.recalc_order(&[key("0-0")]);

        assert_eq!(order.len(), 4);
        assert_eq!(order[0], key("0-0"));
        let pos = |k: &str| order.iter().position(|c| *c == key(k)).unwrap();
        assert!(pos("0-1") < pos("0-2"));
        assert!(pos("0-2") < pos("0-3"));
    }

    #[test]
    fn test_circular_reference() {
        // A1 -> B1 -> C1 -> A1 (circular), D1 only reads the cycle
        let graph = graph_of(&[
            ("0-0", "=B1"),
            ("0-1", "=C1"),
            ("0-2", "=A1"),
            ("0-3", "=A1+1"),
        ]);

        let circular = graph.detect_circular();
        assert_eq!(circular.to_sorted_vec(), vec![key("0-0"), key("0-1"), key("0-2")]);
        assert!(!circular.contains(key("0-3")));

        // Terminates and lists the cycle once
        let order = graph.recalc_order(&[key("0-0")]);
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn test_self_reference_is_circular() {
        let graph = graph_of(&[("0-0", "=A1+1"), ("1-0", "=A1")]);
        let circular = graph.detect_circular();
        assert_eq!(circular.to_sorted_vec(), vec![key("0-0")]);
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let formulas: Vec<(CellKey, String)> = (1..20_000u32)
            .map(|row| (CellKey::new(row, 0), format!("=A{}+1", row)))
            .collect();
        let graph = DependencyGraph::build(&formulas.into_iter().collect(), 1_000_000);

        assert!(graph.detect_circular().is_empty());
        assert_eq!(graph.recalc_order(&[key("0-0")]).len(), 20_000);
    }

    #[test]
    fn test_oversized_range_marks_graph_partial() {
        let map: FormulaMap = [(key("0-3"), "=SUM(A1:B10)+C1".to_string())]
            .into_iter()
            .collect();
        let graph = DependencyGraph::build(&map, 5);

        assert!(graph.is_partial());
        let deps: Vec<_> = graph.dependencies_of(key("0-3")).unwrap().iter().copied().collect();
        assert_eq!(deps, vec![key("0-2")]);
    }

    #[test]
    fn test_set_formula_replaces_edges() {
        let mut graph = graph_of(&[("0-1", "=A1")]);
        graph.set_formula(key("0-1"), "=C1", 100);

        assert!(graph.direct_dependents(key("0-0")).next().is_none());
        assert_eq!(graph.direct_dependents(key("0-2")).collect::<Vec<_>>(), vec![key("0-1")]);
    }
}
