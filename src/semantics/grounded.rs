use super::DefeatGraph;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The justification status of an argument.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
pub enum Justification {
    /// The argument belongs to the grounded extension.
    #[serde(rename = "in")]
    #[strum(serialize = "in")]
    In,
    /// The argument is defeated by an argument of the grounded extension.
    #[serde(rename = "out")]
    #[strum(serialize = "out")]
    Out,
    /// The argument is neither in nor out.
    #[serde(rename = "undec")]
    #[strum(serialize = "undec")]
    Undecided,
}

/// The grounded labelling of a defeat graph.
///
/// Each argument gets exactly one [`Justification`] status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroundedLabelling {
    labels: Vec<Justification>,
}

impl GroundedLabelling {
    /// Returns the status of an argument.
    pub fn justification(&self, arg: usize) -> Justification {
        self.labels[arg]
    }

    /// Returns the statuses, indexed by argument identifiers.
    pub fn labels(&self) -> &[Justification] {
        &self.labels
    }

    fn with_status(&self, status: Justification) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(i, l)| if *l == status { Some(i) } else { None })
            .collect()
    }

    /// Returns the arguments of the grounded extension, in increasing order.
    pub fn in_arguments(&self) -> Vec<usize> {
        self.with_status(Justification::In)
    }

    /// Returns the arguments defeated by the grounded extension, in increasing order.
    pub fn out_arguments(&self) -> Vec<usize> {
        self.with_status(Justification::Out)
    }

    /// Returns the undecided arguments, in increasing order.
    pub fn undecided_arguments(&self) -> Vec<usize> {
        self.with_status(Justification::Undecided)
    }
}

/// Computes the grounded labelling of a defeat graph.
///
/// Arguments without defeaters are in; an argument defeated by an in argument is out;
/// an argument whose defeaters are all out is in. The remaining arguments are undecided.
///
/// # Example
///
/// ```
/// # use crustaspic::semantics::{grounded_labelling, DefeatGraph, Justification};
/// let mut graph = DefeatGraph::new(3);
/// graph.new_defeat(0, 1).unwrap();
/// graph.new_defeat(1, 2).unwrap();
/// let labelling = grounded_labelling(&graph);
/// assert_eq!(vec![0, 2], labelling.in_arguments());
/// assert_eq!(Justification::Out, labelling.justification(1));
/// ```
pub fn grounded_labelling(graph: &DefeatGraph) -> GroundedLabelling {
    let mut labels = vec![Justification::Undecided; graph.n_arguments()];
    let mut ext = vec![];
    let mut n_processed_args = 0;
    let mut defeated_by = (0..graph.n_arguments())
        .map(|i| {
            let n = graph.in_degree(i);
            if n == 0 {
                labels[i] = Justification::In;
                ext.push(i);
            }
            n
        })
        .collect::<Vec<usize>>();
    while n_processed_args < ext.len() {
        let id = ext[n_processed_args];
        for defeated in graph.iter_defeated_by(id) {
            if labels[defeated] != Justification::Undecided {
                continue;
            }
            labels[defeated] = Justification::Out;
            for next in graph.iter_defeated_by(defeated) {
                defeated_by[next] -= 1;
                if defeated_by[next] == 0 && labels[next] == Justification::Undecided {
                    labels[next] = Justification::In;
                    ext.push(next);
                }
            }
        }
        n_processed_args += 1;
    }
    GroundedLabelling { labels }
}
