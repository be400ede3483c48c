use crate::aspic::Preference;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Completes a set of preference pairs by transitivity.
///
/// The input pairs come first (duplicates removed), followed by the inferred ones.
/// Reachability is computed with the Floyd-Warshall algorithm.
/// A reflexive pair is only produced when the input contains a cycle.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::Preference;
/// # use crustaspic::preferences::transitive_closure;
/// let prefs = vec![Preference::new("A", "B"), Preference::new("B", "C")];
/// let closure = transitive_closure(&prefs);
/// assert_eq!(3, closure.len());
/// assert!(closure.contains(&Preference::new("A", "C")));
/// ```
pub fn transitive_closure(preferences: &[Preference]) -> Vec<Preference> {
    let mut indices: BTreeMap<&str, usize> = BTreeMap::new();
    let mut names: Vec<&str> = vec![];
    for p in preferences.iter() {
        for e in [p.preferred(), p.dispreferred()] {
            if !indices.contains_key(e) {
                indices.insert(e, names.len());
                names.push(e);
            }
        }
    }
    let n = names.len();
    let mut reach = vec![vec![false; n]; n];
    for p in preferences.iter() {
        reach[indices[p.preferred()]][indices[p.dispreferred()]] = true;
    }
    for k in 0..n {
        for i in 0..n {
            if !reach[i][k] {
                continue;
            }
            for j in 0..n {
                if reach[k][j] {
                    reach[i][j] = true;
                }
            }
        }
    }
    let mut closure: Vec<Preference> = vec![];
    let mut seen = BTreeSet::new();
    for p in preferences.iter() {
        if seen.insert((indices[p.preferred()], indices[p.dispreferred()])) {
            closure.push(p.clone());
        }
    }
    for (i, row) in reach.iter().enumerate() {
        for (j, reachable) in row.iter().enumerate() {
            if *reachable && seen.insert((i, j)) {
                closure.push(Preference::new(names[i], names[j]));
            }
        }
    }
    closure
}

/// Returns one cycle for each strongly connected component of a set of preference pairs that contains a cycle.
///
/// An edge goes from the preferred element to the dispreferred one.
/// The components are computed with an iterative version of Tarjan's algorithm, in linear time.
/// For each component, the reported cycle is a shortest cycle through its smallest element, starting at this element;
/// a self-loop on an element alone in its component is a cycle of length one.
/// The cycles are sorted by their first element.
///
/// # Example
///
/// ```
/// # use crustaspic::aspic::Preference;
/// # use crustaspic::preferences::detect_cycles;
/// let prefs = vec![Preference::new("A", "B"), Preference::new("B", "C"), Preference::new("C", "A")];
/// assert_eq!(vec![vec!["A", "B", "C"]], detect_cycles(&prefs));
/// ```
pub fn detect_cycles(preferences: &[Preference]) -> Vec<Vec<String>> {
    let mut successors: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for p in preferences.iter() {
        successors.entry(p.preferred()).or_default().insert(p.dispreferred());
        successors.entry(p.dispreferred()).or_default();
    }
    let names = successors.keys().copied().collect::<Vec<&str>>();
    let indices = names
        .iter()
        .enumerate()
        .map(|(i, n)| (*n, i))
        .collect::<BTreeMap<&str, usize>>();
    let adjacency = successors
        .values()
        .map(|succ| succ.iter().map(|s| indices[s]).collect::<Vec<usize>>())
        .collect::<Vec<Vec<usize>>>();
    let mut cycles = strongly_connected_components(&adjacency)
        .iter()
        .filter_map(|component| witness_cycle(&adjacency, component))
        .collect::<Vec<Vec<usize>>>();
    cycles.sort_unstable_by_key(|c| c[0]);
    cycles
        .into_iter()
        .map(|c| c.into_iter().map(|i| names[i].to_string()).collect())
        .collect()
}

fn strongly_connected_components(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut index: Vec<Option<usize>> = vec![None; n];
    let mut low = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack = vec![];
    let mut next_index = 0;
    let mut components = vec![];
    for root in 0..n {
        if index[root].is_some() {
            continue;
        }
        index[root] = Some(next_index);
        low[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;
        // (node, index of the next successor to visit)
        let mut visits = vec![(root, 0)];
        while let Some((v, i)) = visits.pop() {
            if let Some(&w) = adjacency[v].get(i) {
                visits.push((v, i + 1));
                match index[w] {
                    None => {
                        index[w] = Some(next_index);
                        low[w] = next_index;
                        next_index += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        visits.push((w, 0));
                    }
                    Some(w_index) if on_stack[w] => low[v] = usize::min(low[v], w_index),
                    Some(_) => {}
                }
                continue;
            }
            if let Some(&(parent, _)) = visits.last() {
                low[parent] = usize::min(low[parent], low[v]);
            }
            if Some(low[v]) == index[v] {
                let mut component = vec![];
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }
    components
}

fn witness_cycle(adjacency: &[Vec<usize>], component: &[usize]) -> Option<Vec<usize>> {
    let start = *component.iter().min()?;
    if component.len() == 1 {
        return if adjacency[start].contains(&start) {
            Some(vec![start])
        } else {
            None
        };
    }
    let in_component = component.iter().copied().collect::<BTreeSet<usize>>();
    let mut parents = BTreeMap::new();
    let mut queue = VecDeque::from([start]);
    while let Some(u) = queue.pop_front() {
        for &w in adjacency[u].iter() {
            if w == start && u != start {
                let mut cycle = vec![u];
                while let Some(&p) = parents.get(cycle.last()?) {
                    cycle.push(p);
                }
                cycle.reverse();
                return Some(cycle);
            }
            if w != start && in_component.contains(&w) && !parents.contains_key(&w) {
                parents.insert(w, u);
                queue.push_back(w);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs(pairs: &[(&str, &str)]) -> Vec<Preference> {
        pairs.iter().map(|(a, b)| Preference::new(a, b)).collect()
    }

    #[test]
    fn test_closure_simple_chain() {
        let closure = transitive_closure(&prefs(&[("A", "B"), ("B", "C")]));
        assert_eq!(
            prefs(&[("A", "B"), ("B", "C"), ("A", "C")]),
            closure
        );
    }

    #[test]
    fn test_closure_long_chain() {
        let closure = transitive_closure(&prefs(&[("A", "B"), ("B", "C"), ("C", "D")]));
        assert_eq!(6, closure.len());
        assert!(closure.contains(&Preference::new("A", "D")));
        assert!(closure.contains(&Preference::new("B", "D")));
    }

    #[test]
    fn test_closure_empty() {
        assert!(transitive_closure(&[]).is_empty());
    }

    #[test]
    fn test_closure_single_pair() {
        assert_eq!(1, transitive_closure(&prefs(&[("A", "B")])).len());
    }

    #[test]
    fn test_closure_disconnected() {
        assert_eq!(2, transitive_closure(&prefs(&[("A", "B"), ("C", "D")])).len());
    }

    #[test]
    fn test_closure_duplicates() {
        assert_eq!(1, transitive_closure(&prefs(&[("A", "B"), ("A", "B")])).len());
    }

    #[test]
    fn test_closure_no_reflexive_pair_when_acyclic() {
        let closure = transitive_closure(&prefs(&[("A", "B"), ("B", "C"), ("A", "C"), ("C", "D")]));
        assert!(closure.iter().all(|p| p.preferred() != p.dispreferred()));
    }

    #[test]
    fn test_closure_cycle_is_reflexive() {
        let closure = transitive_closure(&prefs(&[("A", "B"), ("B", "A")]));
        assert!(closure.contains(&Preference::new("A", "A")));
        assert!(closure.contains(&Preference::new("B", "B")));
    }

    #[test]
    fn test_cycles_triangle() {
        let cycles = detect_cycles(&prefs(&[("B", "C"), ("C", "A"), ("A", "B")]));
        assert_eq!(1, cycles.len());
        assert_eq!(vec!["A", "B", "C"], cycles[0]);
    }

    #[test]
    fn test_cycles_acyclic() {
        assert!(detect_cycles(&prefs(&[("A", "B"), ("B", "C"), ("A", "C")])).is_empty());
    }

    #[test]
    fn test_cycles_empty() {
        assert!(detect_cycles(&[]).is_empty());
    }

    #[test]
    fn test_cycles_self_loop() {
        assert_eq!(vec![vec!["A".to_string()]], detect_cycles(&prefs(&[("A", "A")])));
    }

    #[test]
    fn test_cycles_shared_node() {
        let cycles = detect_cycles(&prefs(&[("A", "B"), ("B", "A"), ("B", "C"), ("C", "B")]));
        assert_eq!(vec![vec!["A", "B"]], cycles);
    }

    #[test]
    fn test_cycles_distinct_components() {
        let cycles = detect_cycles(&prefs(&[("A", "B"), ("B", "A"), ("B", "C"), ("C", "D"), ("D", "C"), ("E", "E")]));
        assert_eq!(vec![vec!["A", "B"], vec!["C", "D"], vec!["E"]], cycles);
    }

    #[test]
    fn test_cycles_of_closed_cycle() {
        let names = (0..30).map(|i| format!("e{:02}", i)).collect::<Vec<String>>();
        let cycle = (0..names.len())
            .map(|i| Preference::new(&names[i], &names[(i + 1) % names.len()]))
            .collect::<Vec<Preference>>();
        let closure = transitive_closure(&cycle);
        assert_eq!(names.len() * names.len(), closure.len());
        let cycles = detect_cycles(&closure);
        assert_eq!(1, cycles.len());
        assert_eq!(vec!["e00", "e01"], cycles[0]);
    }

    #[test]
    fn test_cycles_long_cycle() {
        let names = (0..2000).map(|i| format!("e{:04}", i)).collect::<Vec<String>>();
        let cycle = (0..names.len())
            .map(|i| Preference::new(&names[i], &names[(i + 1) % names.len()]))
            .collect::<Vec<Preference>>();
        let cycles = detect_cycles(&cycle);
        assert_eq!(1, cycles.len());
        assert_eq!(names, cycles[0]);
    }
}
