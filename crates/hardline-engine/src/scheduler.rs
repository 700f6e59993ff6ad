//! Dependency scheduler - orders rules into parallelizable layers
//!
//! Rules may declare `depends_on` edges to other rules. The scheduler
//! deduplicates IDs, prunes edges whose target is absent, and emits layers
//! via Kahn's algorithm: each layer only depends on earlier layers, so its
//! members can run concurrently.

use hardline_core::{Error, Result, Rule};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Order rules into execution layers.
///
/// Duplicate IDs keep the first occurrence; broken dependency edges are
/// dropped. Both are warnings, not errors. A cycle in the remaining graph
/// is a hard error that fails the entire schedule.
pub fn schedule(rules: &[Rule]) -> Result<Vec<Vec<Rule>>> {
    // Deduplicate by ID, keeping the first occurrence
    let mut seen = HashSet::new();
    let mut unique: Vec<Rule> = Vec::new();
    for rule in rules {
        if !seen.insert(rule.id.clone()) {
            warn!("Duplicate rule ID found and skipped: {}", rule.id);
            continue;
        }
        unique.push(rule.clone());
    }

    let index: HashMap<&str, usize> = unique
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.as_str(), i))
        .collect();

    // Build adjacency (parent -> children) and in-degrees
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); unique.len()];
    let mut in_degree: Vec<usize> = vec![0; unique.len()];

    for (child, rule) in unique.iter().enumerate() {
        for dep in &rule.depends_on {
            match index.get(dep.as_str()) {
                Some(&parent) => {
                    children[parent].push(child);
                    in_degree[child] += 1;
                }
                None => {
                    warn!(
                        "Rule {} depends on missing rule {}. Dependency ignored.",
                        rule.id, dep
                    );
                }
            }
        }
    }

    // Kahn's algorithm; frontiers kept in input order for determinism
    let mut frontier: Vec<usize> = (0..unique.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut layers: Vec<Vec<Rule>> = Vec::new();
    let mut processed = 0;

    while !frontier.is_empty() {
        let mut next: Vec<usize> = Vec::new();
        let mut layer: Vec<Rule> = Vec::with_capacity(frontier.len());

        for &i in &frontier {
            layer.push(unique[i].clone());
            processed += 1;

            for &child in &children[i] {
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    next.push(child);
                }
            }
        }

        next.sort_unstable();
        layers.push(layer);
        frontier = next;
    }

    if processed != unique.len() {
        return Err(Error::CyclicDependency {
            processed,
            total: unique.len(),
        });
    }

    Ok(layers)
}
