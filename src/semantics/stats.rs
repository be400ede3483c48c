use super::{DefeatGraph, GroundedLabelling, Justification};
use crate::aspic::{ArgumentSet, Literal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Structural statistics about a defeat graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefeatGraphStats {
    /// The number of arguments.
    pub n_nodes: usize,
    /// The number of edges.
    pub n_edges: usize,
    /// The highest number of defeaters of an argument.
    pub max_in_degree: usize,
    /// The highest number of arguments defeated by an argument.
    pub max_out_degree: usize,
    /// The number of edges per argument.
    pub average_degree: f64,
    /// Whether the graph contains a cycle.
    pub has_cycles: bool,
}

/// Computes the statistics of a defeat graph.
pub fn defeat_graph_stats(graph: &DefeatGraph) -> DefeatGraphStats {
    let n = graph.n_arguments();
    DefeatGraphStats {
        n_nodes: n,
        n_edges: graph.n_defeats(),
        max_in_degree: (0..n).map(|i| graph.in_degree(i)).max().unwrap_or(0),
        max_out_degree: (0..n).map(|i| graph.out_degree(i)).max().unwrap_or(0),
        average_degree: if n == 0 {
            0.
        } else {
            graph.n_defeats() as f64 / n as f64
        },
        has_cycles: has_cycles(graph),
    }
}

// Kahn's algorithm: the graph is acyclic iff every node can be removed.
fn has_cycles(graph: &DefeatGraph) -> bool {
    let n = graph.n_arguments();
    let mut in_degrees = (0..n).map(|i| graph.in_degree(i)).collect::<Vec<usize>>();
    let mut queue = (0..n).filter(|i| in_degrees[*i] == 0).collect::<Vec<usize>>();
    let mut n_removed = 0;
    while let Some(i) = queue.pop() {
        n_removed += 1;
        for j in graph.iter_defeated_by(i) {
            in_degrees[j] -= 1;
            if in_degrees[j] == 0 {
                queue.push(j);
            }
        }
    }
    n_removed < n
}

/// A summary of a grounded labelling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabellingSummary {
    /// The number of in arguments.
    pub n_in: usize,
    /// The number of out arguments.
    pub n_out: usize,
    /// The number of undecided arguments.
    pub n_undecided: usize,
    /// The conclusions of the in arguments.
    pub justified_conclusions: BTreeSet<Literal>,
}

/// Summarizes a labelling.
pub fn summarize_labelling(arguments: &ArgumentSet, labelling: &GroundedLabelling) -> LabellingSummary {
    let in_args = labelling.in_arguments();
    LabellingSummary {
        n_in: in_args.len(),
        n_out: labelling.out_arguments().len(),
        n_undecided: labelling.undecided_arguments().len(),
        justified_conclusions: in_args
            .iter()
            .map(|a| arguments.get_argument_by_id(*a).conclusion().to_string())
            .collect(),
    }
}

/// Checks a labelling is complete: an argument is in iff all its defeaters are out,
/// and out iff one of its defeaters is in.
pub fn is_complete_labelling(graph: &DefeatGraph, labels: &[Justification]) -> bool {
    if labels.len() != graph.n_arguments() {
        return false;
    }
    (0..labels.len()).all(|i| {
        let all_out = graph
            .iter_defeaters_of(i)
            .all(|d| labels[d] == Justification::Out);
        let one_in = graph
            .iter_defeaters_of(i)
            .any(|d| labels[d] == Justification::In);
        match labels[i] {
            Justification::In => all_out,
            Justification::Out => one_in,
            Justification::Undecided => !all_out && !one_in,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::grounded_labelling;

    fn graph(n: usize, edges: &[(usize, usize)]) -> DefeatGraph {
        let mut g = DefeatGraph::new(n);
        for (a, b) in edges.iter() {
            g.new_defeat(*a, *b).unwrap();
        }
        g
    }

    #[test]
    fn test_stats_acyclic() {
        let stats = defeat_graph_stats(&graph(4, &[(0, 1), (0, 2), (3, 2)]));
        assert_eq!(4, stats.n_nodes);
        assert_eq!(3, stats.n_edges);
        assert_eq!(2, stats.max_in_degree);
        assert_eq!(2, stats.max_out_degree);
        assert!((stats.average_degree - 0.75).abs() < 1e-9);
        assert!(!stats.has_cycles);
    }

    #[test]
    fn test_stats_cyclic() {
        let stats = defeat_graph_stats(&graph(3, &[(0, 1), (1, 2), (2, 0)]));
        assert!(stats.has_cycles);
    }

    #[test]
    fn test_stats_empty() {
        let stats = defeat_graph_stats(&DefeatGraph::new(0));
        assert_eq!(0., stats.average_degree);
        assert!(!stats.has_cycles);
    }

    #[test]
    fn test_grounded_is_complete() {
        let g = graph(5, &[(0, 1), (1, 2), (3, 4), (4, 3)]);
        let l = grounded_labelling(&g);
        assert!(is_complete_labelling(&g, l.labels()));
    }

    #[test]
    fn test_not_complete() {
        let g = graph(2, &[(0, 1)]);
        assert!(!is_complete_labelling(&g, &[Justification::In, Justification::In]));
        assert!(!is_complete_labelling(&g, &[Justification::In]));
    }
}
