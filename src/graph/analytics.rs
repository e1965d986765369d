use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

use super::model::{NodeType, Snapshot};

/// Summary figures for a snapshot
#[derive(Debug, Clone)]
pub struct GraphStats {
    pub node_count: usize,
    pub link_count: usize,
    /// Links whose source or target names no node
    pub dangling_links: usize,
    pub connected_components: usize,
    pub isolated_nodes: usize,
    pub type_counts: Vec<(NodeType, usize)>,
    pub link_type_counts: Vec<(String, usize)>,
    pub top_degree: Vec<(String, usize)>,
}

/// Build an undirected petgraph view of the snapshot, skipping dangling links.
pub fn to_petgraph(snapshot: &Snapshot) -> (UnGraph<String, String>, HashMap<String, NodeIndex>) {
    let mut graph = UnGraph::new_undirected();
    let mut indices = HashMap::new();

    for node in &snapshot.nodes {
        indices
            .entry(node.id.clone())
            .or_insert_with(|| graph.add_node(node.name.clone()));
    }

    for link in &snapshot.links {
        if let (Some(&s), Some(&t)) = (indices.get(&link.source), indices.get(&link.target)) {
            graph.add_edge(s, t, link.link_type.clone());
        }
    }

    (graph, indices)
}

pub fn compute_stats(snapshot: &Snapshot, top_n: usize) -> GraphStats {
    let (graph, indices) = to_petgraph(snapshot);

    let dangling_links = snapshot
        .links
        .iter()
        .filter(|l| !indices.contains_key(&l.source) || !indices.contains_key(&l.target))
        .count();

    let mut type_counts: Vec<(NodeType, usize)> = NodeType::ALL
        .iter()
        .map(|t| (*t, snapshot.nodes_of_type(*t).count()))
        .filter(|(_, count)| *count > 0)
        .collect();
    type_counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut link_types: HashMap<&str, usize> = HashMap::new();
    for link in &snapshot.links {
        *link_types.entry(link.link_type.as_str()).or_insert(0) += 1;
    }
    let mut link_type_counts: Vec<(String, usize)> = link_types
        .into_iter()
        .map(|(t, c)| (t.to_string(), c))
        .collect();
    link_type_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut degrees: Vec<(String, usize)> = graph
        .node_indices()
        .map(|ni| (graph[ni].clone(), graph.edges(ni).count()))
        .collect();
    let isolated_nodes = degrees.iter().filter(|(_, d)| *d == 0).count();
    degrees.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    degrees.truncate(top_n);

    GraphStats {
        node_count: graph.node_count(),
        link_count: snapshot.links.len(),
        dangling_links,
        connected_components: connected_components(&graph),
        isolated_nodes,
        type_counts,
        link_type_counts,
        top_degree: degrees,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::fixtures::*;

    #[test]
    fn test_stats_on_universe() {
        let stats = compute_stats(&universe(), 3);
        assert_eq!(stats.node_count, 12);
        assert_eq!(stats.link_count, 16);
        assert_eq!(stats.dangling_links, 0);
        assert_eq!(stats.connected_components, 1);
        assert_eq!(stats.isolated_nodes, 0);
        assert_eq!(stats.top_degree[0].0, "Pluribus");
        assert_eq!(stats.top_degree.len(), 3);
    }

    #[test]
    fn test_dangling_links_counted_not_drawn() {
        let mut snapshot = universe();
        snapshot.links.push(link("pluribus", "nowhere", "related"));
        let (graph, _) = to_petgraph(&snapshot);
        assert_eq!(graph.edge_count(), 16);
        assert_eq!(compute_stats(&snapshot, 5).dangling_links, 1);
    }

    #[test]
    fn test_isolated_node_is_own_component() {
        let mut snapshot = universe();
        snapshot
            .nodes
            .push(node("lonely", "Lonely", NodeType::CulturalRef));
        let stats = compute_stats(&snapshot, 5);
        assert_eq!(stats.connected_components, 2);
        assert_eq!(stats.isolated_nodes, 1);
    }

    #[test]
    fn test_type_counts_sorted_desc() {
        let stats = compute_stats(&universe(), 5);
        assert_eq!(stats.type_counts[0], (NodeType::Show, 3));
        assert!(stats.type_counts.windows(2).all(|w| w[0].1 >= w[1].1));
    }
}
