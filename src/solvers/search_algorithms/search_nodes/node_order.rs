use super::NodeId;
use ordered_float::OrderedFloat;

/// Priority of a node in a frontier.
///
/// Smaller keys are popped first. Ties on the primary value prefer higher g, then earlier nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrontierKey {
    primary: OrderedFloat<f64>,
    secondary: OrderedFloat<f64>,
    id: NodeId,
}

/// Order of nodes in a frontier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeOrder {
    /// Ascending f.
    AStar,
    /// Descending potential `(U - g) / h` where `U` is the incumbent cost.
    ///
    /// Without an incumbent, nodes are ordered by ascending h.
    Potential,
    /// Descending potential `(T - g) / h` for a fixed cost threshold `T`.
    BoundedCost { threshold: f64 },
}

impl NodeOrder {
    /// Returns the frontier key of a node given the current incumbent cost.
    pub fn key(&self, g: f64, h: f64, id: NodeId, incumbent: f64) -> FrontierKey {
        let primary = match *self {
            Self::AStar => g + h,
            Self::Potential => Self::potential_key(incumbent, g, h),
            Self::BoundedCost { threshold } => Self::potential_key(threshold, g, h),
        };

        FrontierKey {
            primary: OrderedFloat(primary),
            secondary: OrderedFloat(-g),
            id,
        }
    }

    /// Returns whether keys change when the incumbent improves.
    pub fn depends_on_incumbent(&self) -> bool {
        matches!(self, Self::Potential)
    }

    fn potential_key(bound: f64, g: f64, h: f64) -> f64 {
        if bound.is_infinite() {
            h
        } else if h > 0.0 {
            -(bound - g) / h
        } else if bound > g {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        }
    }
}
