//! Mermaid diagram rendering.
//!
//! Output is deterministic: nodes follow catalog order, edges follow source
//! then target catalog order, and ids come from a fresh [`IdAllocator`] per
//! render. Rendering the same graph twice gives byte-identical text.

use crate::sanitize::IdAllocator;
use grove_core::{Category, Direction, FilterSpec, Importance, Node};
use grove_graph::{DependencyGraph, NodeId};
use std::fmt;
use std::fmt::Write;
use std::sync::Arc;

/// Style class definitions, one per retained importance tier.
const CLASS_DEFS: &[(&str, &str)] = &[
    ("critical", "fill:#fde2e1,stroke:#c0392b,stroke-width:2px"),
    ("important", "fill:#fff3d6,stroke:#d68910"),
    ("optional", "fill:#eef2f7,stroke:#7f8c8d,stroke-dasharray:3 3"),
];

/// Style class for an importance tier.
pub fn style_class(importance: Importance) -> &'static str {
    match importance {
        Importance::Critical => "critical",
        Importance::Important => "important",
        // Excluded nodes never reach the graph.
        Importance::Optional | Importance::Excluded => "optional",
    }
}

/// A curated cross-category edge for rollup diagrams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyEdge {
    pub from: Category,
    pub to: Category,
    pub label: String,
}

impl PolicyEdge {
    pub fn new(from: Category, to: Category, label: impl Into<String>) -> Self {
        Self {
            from,
            to,
            label: label.into(),
        }
    }
}

/// The fixed table of cross-category edges a rollup diagram may draw.
///
/// Edges are drawn when both categories have nodes in the graph; they are
/// never derived from the graph's actual edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupPolicy {
    pub edges: Vec<PolicyEdge>,
}

impl Default for RollupPolicy {
    fn default() -> Self {
        use Category::*;
        Self {
            edges: vec![
                PolicyEdge::new(Source, Package, "imports"),
                PolicyEdge::new(Service, Package, "uses"),
                PolicyEdge::new(Source, Service, "calls"),
                PolicyEdge::new(Tooling, Source, "validates"),
                PolicyEdge::new(Testing, Source, "tests"),
                PolicyEdge::new(Documentation, Source, "documents"),
                PolicyEdge::new(Configuration, Service, "configures"),
                PolicyEdge::new(Infrastructure, Service, "deploys"),
                PolicyEdge::new(Experimental, Package, "prototypes"),
            ],
        }
    }
}

/// A node predicate for filtered diagrams.
#[derive(Clone)]
pub struct NodeFilter {
    predicate: Arc<dyn Fn(&Node) -> bool + Send + Sync>,
    description: String,
}

impl NodeFilter {
    /// Keeps nodes for which `predicate` returns true.
    pub fn from_fn<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Node) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            description: description.into(),
        }
    }

    /// Keeps nodes at or above `tier`.
    pub fn min_importance(tier: Importance) -> Self {
        Self::from_fn(format!("importance >= {}", tier), move |node| {
            node.importance >= tier
        })
    }

    /// Keeps nodes in any of `categories`.
    pub fn categories(categories: Vec<Category>) -> Self {
        let names: Vec<&str> = categories.iter().map(Category::as_str).collect();
        let description = format!("category in [{}]", names.join(", "));
        Self::from_fn(description, move |node| categories.contains(&node.category))
    }

    /// Builds the filter a config file describes.
    pub fn from_spec(spec: &FilterSpec) -> Self {
        let tier = spec.min_importance;
        if spec.categories.is_empty() {
            return Self::min_importance(tier);
        }

        let categories = spec.categories.clone();
        let names: Vec<&str> = categories.iter().map(Category::as_str).collect();
        let description = format!("importance >= {}, category in [{}]", tier, names.join(", "));
        Self::from_fn(description, move |node| {
            node.importance >= tier && categories.contains(&node.category)
        })
    }

    pub fn matches(&self, node: &Node) -> bool {
        (self.predicate)(node)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for NodeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeFilter")
            .field("description", &self.description)
            .finish()
    }
}

/// What to draw.
#[derive(Debug, Clone)]
pub enum DiagramMode {
    /// Every node and edge.
    Full,
    /// Categories and subcategories only, with curated cross-category edges.
    CategoryRollup(RollupPolicy),
    /// Only nodes matching the filter, and edges between them.
    FilteredSubset(NodeFilter),
}

impl DiagramMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::CategoryRollup(_) => "category-rollup",
            Self::FilteredSubset(_) => "filtered-subset",
        }
    }

    /// File name used when the diagram is exported.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Full => "dependency-graph.mmd",
            Self::CategoryRollup(_) => "dependency-rollup.mmd",
            Self::FilteredSubset(_) => "dependency-filtered.mmd",
        }
    }
}

/// Renders the graph top-down.
pub fn render(graph: &DependencyGraph, mode: &DiagramMode) -> String {
    render_with(graph, mode, Direction::TD)
}

/// Renders the graph with an explicit layout direction.
pub fn render_with(graph: &DependencyGraph, mode: &DiagramMode, direction: Direction) -> String {
    let mut out = String::with_capacity(4096);
    let mut ids = IdAllocator::new();

    match mode {
        DiagramMode::Full => {
            let _ = writeln!(
                out,
                "%% dependency graph: full ({} nodes, {} edges)",
                graph.node_count(),
                graph.edge_count()
            );
            write_header(&mut out, direction);
            write_nodes_and_edges(&mut out, &mut ids, graph, |_| true);
        }
        DiagramMode::FilteredSubset(filter) => {
            let _ = writeln!(
                out,
                "%% dependency graph: filtered ({})",
                filter.description()
            );
            write_header(&mut out, direction);
            write_nodes_and_edges(&mut out, &mut ids, graph, |node| filter.matches(node));
        }
        DiagramMode::CategoryRollup(policy) => {
            let _ = writeln!(out, "%% dependency graph: category rollup");
            write_header(&mut out, direction);
            write_rollup(&mut out, &mut ids, graph, policy);
        }
    }

    out
}

fn write_header(out: &mut String, direction: Direction) {
    let _ = writeln!(out, "graph {}", direction.as_str());
    for (class, style) in CLASS_DEFS {
        let _ = writeln!(out, "    classDef {} {}", class, style);
    }
}

/// Makes a label safe inside `["..."]`.
fn escape_label(label: &str) -> String {
    label
        .replace('"', "#quot;")
        .replace(|c: char| c == '\n' || c == '\r', " ")
}

fn write_nodes_and_edges<F>(out: &mut String, ids: &mut IdAllocator, graph: &DependencyGraph, keep: F)
where
    F: Fn(&Node) -> bool,
{
    let kept: Vec<bool> = graph
        .node_indexes()
        .map(|index| graph.get(index).map(&keep).unwrap_or(false))
        .collect();
    let is_kept = |index: NodeId| kept.get(index.index()).copied().unwrap_or(false);

    let _ = writeln!(out);
    for index in graph.node_indexes().filter(|&i| is_kept(i)) {
        let Some(node) = graph.get(index) else {
            continue;
        };
        let _ = writeln!(
            out,
            "    {}[\"{}\"]:::{}",
            ids.id_for(&node.id),
            escape_label(&node.label),
            style_class(node.importance)
        );
    }

    let edges: Vec<_> = graph
        .edges()
        .into_iter()
        .filter(|(source, target, _)| is_kept(*source) && is_kept(*target))
        .collect();
    if edges.is_empty() {
        return;
    }

    let _ = writeln!(out);
    for (source, target, edge) in edges {
        let (Some(from), Some(to)) = (graph.get(source), graph.get(target)) else {
            continue;
        };
        let _ = writeln!(
            out,
            "    {} -->|{}| {}",
            ids.id_for(&from.id),
            edge.kind,
            ids.id_for(&to.id)
        );
    }
}

/// Members of one subcategory inside a category.
struct Group<'a> {
    name: &'a str,
    count: usize,
    top: Importance,
}

struct CategoryGroup<'a> {
    category: Category,
    count: usize,
    top: Importance,
    groups: Vec<Group<'a>>,
}

/// Groups nodes by category and subcategory in first-seen catalog order.
fn group_nodes(graph: &DependencyGraph) -> Vec<CategoryGroup<'_>> {
    let mut categories: Vec<CategoryGroup<'_>> = Vec::new();

    for node in graph.nodes() {
        let position = match categories.iter().position(|c| c.category == node.category) {
            Some(position) => position,
            None => {
                categories.push(CategoryGroup {
                    category: node.category,
                    count: 0,
                    top: node.importance,
                    groups: Vec::new(),
                });
                categories.len() - 1
            }
        };
        let category = &mut categories[position];
        category.count += 1;
        category.top = category.top.max(node.importance);

        match category
            .groups
            .iter_mut()
            .find(|g| g.name == node.subcategory)
        {
            Some(group) => {
                group.count += 1;
                group.top = group.top.max(node.importance);
            }
            None => category.groups.push(Group {
                name: &node.subcategory,
                count: 1,
                top: node.importance,
            }),
        }
    }

    categories
}

fn write_rollup(out: &mut String, ids: &mut IdAllocator, graph: &DependencyGraph, policy: &RollupPolicy) {
    let categories = group_nodes(graph);
    let root = ids.id_for("rollup:root");

    let _ = writeln!(out);
    let _ = writeln!(out, "    {}([\"Codebase ({} nodes)\"])", root, graph.node_count());

    for category in &categories {
        let category_id = ids.id_for(&format!("category:{}", category.category));
        let _ = writeln!(
            out,
            "    {}[\"{} ({})\"]:::{}",
            category_id,
            category.category,
            category.count,
            style_class(category.top)
        );
        let _ = writeln!(out, "    {} --> {}", root, category_id);

        for group in &category.groups {
            let group_id = ids.id_for(&format!("group:{}/{}", category.category, group.name));
            let _ = writeln!(
                out,
                "    {}[\"{} ({})\"]:::{}",
                group_id,
                escape_label(group.name),
                group.count,
                style_class(group.top)
            );
            let _ = writeln!(out, "    {} --> {}", category_id, group_id);
        }
    }

    let present = |category: Category| categories.iter().any(|c| c.category == category);
    let drawn: Vec<&PolicyEdge> = policy
        .edges
        .iter()
        .filter(|e| e.from != e.to && present(e.from) && present(e.to))
        .collect();
    if drawn.is_empty() {
        return;
    }

    let _ = writeln!(out);
    for edge in drawn {
        let _ = writeln!(
            out,
            "    {} -.->|{}| {}",
            ids.id_for(&format!("category:{}", edge.from)),
            escape_label(&edge.label),
            ids.id_for(&format!("category:{}", edge.to))
        );
    }
}
