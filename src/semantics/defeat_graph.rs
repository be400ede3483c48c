use crate::aspic::Defeat;
use anyhow::{anyhow, Result};

/// The abstract graph of the defeats between arguments.
///
/// Nodes are argument identifiers (from `0` to `n_arguments - 1`); edges are defeats.
/// Several defeats between the same pair of arguments (for instance a rebut and an undercut) give a single edge.
#[derive(Clone, Debug, Default)]
pub struct DefeatGraph {
    edges: Vec<(usize, usize)>,
    edges_from: Vec<Vec<usize>>,
    edges_to: Vec<Vec<usize>>,
}

impl DefeatGraph {
    /// Builds a graph with the given number of arguments and no defeat.
    pub fn new(n_arguments: usize) -> Self {
        DefeatGraph {
            edges: vec![],
            edges_from: (0..n_arguments).map(|_| vec![]).collect(),
            edges_to: (0..n_arguments).map(|_| vec![]).collect(),
        }
    }

    /// Builds the graph of a set of defeats.
    ///
    /// An error is returned if a defeat involves an argument out of the range.
    pub fn new_with_defeats(n_arguments: usize, defeats: &[Defeat]) -> Result<Self> {
        let mut graph = DefeatGraph::new(n_arguments);
        for d in defeats.iter() {
            graph.new_defeat(d.defeater(), d.defeated())?;
        }
        Ok(graph)
    }

    /// Adds an edge; nothing happens if it already exists.
    pub fn new_defeat(&mut self, from: usize, to: usize) -> Result<()> {
        let n = self.n_arguments();
        if from >= n || to >= n {
            return Err(anyhow!(
                "cannot add the defeat ({}, {}) in a graph with {} arguments",
                from,
                to,
                n
            ));
        }
        if self.edges_from[from].iter().any(|e| self.edges[*e].1 == to) {
            return Ok(());
        }
        self.edges.push((from, to));
        self.edges_from[from].push(self.edges.len() - 1);
        self.edges_to[to].push(self.edges.len() - 1);
        Ok(())
    }

    /// Returns the number of arguments.
    pub fn n_arguments(&self) -> usize {
        self.edges_from.len()
    }

    /// Returns the number of edges.
    pub fn n_defeats(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over the edges.
    pub fn iter_defeats(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied()
    }

    /// Iterates over the arguments defeated by an argument.
    pub fn iter_defeated_by(&self, arg: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges_from[arg].iter().map(move |e| self.edges[*e].1)
    }

    /// Iterates over the defeaters of an argument.
    pub fn iter_defeaters_of(&self, arg: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges_to[arg].iter().map(move |e| self.edges[*e].0)
    }

    /// Returns the number of arguments defeated by an argument.
    pub fn out_degree(&self, arg: usize) -> usize {
        self.edges_from[arg].len()
    }

    /// Returns the number of defeaters of an argument.
    pub fn in_degree(&self, arg: usize) -> usize {
        self.edges_to[arg].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defeat() {
        let mut g = DefeatGraph::new(3);
        g.new_defeat(0, 1).unwrap();
        g.new_defeat(0, 1).unwrap();
        g.new_defeat(2, 1).unwrap();
        assert_eq!(2, g.n_defeats());
        assert_eq!(vec![0, 2], g.iter_defeaters_of(1).collect::<Vec<usize>>());
        assert_eq!(vec![1], g.iter_defeated_by(0).collect::<Vec<usize>>());
        assert_eq!(2, g.in_degree(1));
        assert_eq!(0, g.out_degree(1));
    }

    #[test]
    fn test_out_of_range() {
        let mut g = DefeatGraph::new(2);
        assert!(g.new_defeat(0, 2).is_err());
    }
}
