use crate::province::Province;
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::{Bfs, NodeFiltered};
use std::collections::HashSet;

/// Граф смежности провинций; индекс узла совпадает с `Province::id`.
pub fn build_province_graph(provinces: &[Province]) -> UnGraph<u32, ()> {
    let mut graph = UnGraph::with_capacity(provinces.len(), provinces.len() * 3);
    let nodes: Vec<_> = provinces.iter().map(|p| graph.add_node(p.id)).collect();
    let mut edges = HashSet::new();

    for province in provinces {
        for &n_id in &province.neighbors {
            let (a, b) = if province.id < n_id {
                (province.id, n_id)
            } else {
                (n_id, province.id)
            };
            if let (Some(&na), Some(&nb)) = (nodes.get(a as usize), nodes.get(b as usize))
                && edges.insert((a, b))
            {
                graph.add_edge(na, nb, ());
            }
        }
    }
    graph
}

/// Число компонент связности графа провинций.
pub fn count_components(provinces: &[Province]) -> usize {
    if provinces.is_empty() {
        return 0;
    }
    connected_components(&build_province_graph(provinces))
}

/// Связен ли подграф, натянутый на `members` (id провинций).
pub fn is_connected_subset(provinces: &[Province], members: &[u32]) -> bool {
    let subset: HashSet<u32> = members.iter().copied().collect();
    let Some(&start) = members.first() else {
        return true;
    };
    let graph = build_province_graph(provinces);
    if start as usize >= graph.node_count() {
        return false;
    }

    let filtered = NodeFiltered::from_fn(&graph, |n| subset.contains(&graph[n]));
    let mut bfs = Bfs::new(&filtered, NodeIndex::new(start as usize));
    let mut reached = 0;
    while bfs.next(&filtered).is_some() {
        reached += 1;
    }
    reached == subset.len()
}
