//! Box/arrow graph derivation for flow layout.
//!
//! Adjacency is restricted to known box ids: arrow endpoints that are not
//! boxes (containers, or ids without specs) are ignored for layering, though
//! they still resolve for anchor lookup elsewhere.

use std::collections::{BTreeMap, HashMap, HashSet};

/// Topological order via Kahn's algorithm. Nodes left over by cycles are
/// appended in input order rather than rejected.
pub fn topological_order(box_ids: &[String], edges: &[(String, String)]) -> Vec<String> {
    let known: HashSet<&str> = box_ids.iter().map(String::as_str).collect();
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = box_ids.iter().map(|id| (id.as_str(), 0)).collect();

    for (src, tgt) in edges {
        if known.contains(src.as_str()) && known.contains(tgt.as_str()) {
            successors.entry(src.as_str()).or_default().push(tgt.as_str());
            *in_degree.entry(tgt.as_str()).or_default() += 1;
        }
    }

    let mut queue: Vec<&str> = box_ids
        .iter()
        .map(String::as_str)
        .filter(|id| in_degree[id] == 0)
        .collect();
    let mut sorted: Vec<String> = Vec::with_capacity(box_ids.len());
    let mut visited: HashSet<&str> = HashSet::new();

    let mut head = 0;
    while head < queue.len() {
        let node = queue[head];
        head += 1;
        sorted.push(node.to_string());
        visited.insert(node);
        if let Some(succs) = successors.get(node) {
            for succ in succs {
                let deg = in_degree.get_mut(succ).expect("successor is a known box");
                *deg -= 1;
                if *deg == 0 {
                    queue.push(succ);
                }
            }
        }
    }

    // Residual cyclic nodes, appended in input order.
    for id in box_ids {
        if !visited.contains(id.as_str()) {
            sorted.push(id.clone());
        }
    }
    sorted
}

/// Layer of each node: 0 without predecessors, otherwise 1 + the maximum
/// predecessor layer. Predecessors not yet assigned (cycle residue) count
/// as layer 0.
pub fn assign_layers(
    sorted_ids: &[String],
    edges: &[(String, String)],
) -> HashMap<String, usize> {
    let known: HashSet<&str> = sorted_ids.iter().map(String::as_str).collect();
    let mut predecessors: HashMap<&str, Vec<&str>> = HashMap::new();
    for (src, tgt) in edges {
        if known.contains(src.as_str()) && known.contains(tgt.as_str()) {
            predecessors.entry(tgt.as_str()).or_default().push(src.as_str());
        }
    }

    let mut layers: HashMap<String, usize> = HashMap::new();
    for id in sorted_ids {
        let layer = match predecessors.get(id.as_str()) {
            None => 0,
            Some(preds) if preds.is_empty() => 0,
            Some(preds) => {
                preds
                    .iter()
                    .map(|p| layers.get(*p).copied().unwrap_or(0))
                    .max()
                    .unwrap_or(0)
                    + 1
            }
        };
        layers.insert(id.clone(), layer);
    }
    layers
}

/// Group ids by layer, members in topological order, groups ordered by
/// layer index.
pub fn layer_groups(
    sorted_ids: &[String],
    layers: &HashMap<String, usize>,
) -> BTreeMap<usize, Vec<String>> {
    let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for id in sorted_ids {
        let layer = layers.get(id).copied().unwrap_or(0);
        groups.entry(layer).or_default().push(id.clone());
    }
    groups
}
