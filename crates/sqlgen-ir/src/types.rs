//! Fixed-order enumerations of the structured query format
//!
//! Consumers depend on the numeric indices, so variant order is part of
//! the wire contract.

use serde::{Deserialize, Serialize};

use crate::IrError;

/// Aggregation applied to the selected column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Aggregator {
    #[default]
    None,
    Max,
    Min,
    Count,
    Sum,
    Avg,
}

impl Aggregator {
    /// Aggregators that have a keyword, in prefix-matching order.
    pub const KEYWORDS: [Aggregator; 5] = [
        Aggregator::Max,
        Aggregator::Min,
        Aggregator::Count,
        Aggregator::Sum,
        Aggregator::Avg,
    ];

    pub fn index(self) -> usize {
        match self {
            Aggregator::None => 0,
            Aggregator::Max => 1,
            Aggregator::Min => 2,
            Aggregator::Count => 3,
            Aggregator::Sum => 4,
            Aggregator::Avg => 5,
        }
    }

    pub fn from_index(index: usize) -> Result<Self, IrError> {
        match index {
            0 => Ok(Aggregator::None),
            1 => Ok(Aggregator::Max),
            2 => Ok(Aggregator::Min),
            3 => Ok(Aggregator::Count),
            4 => Ok(Aggregator::Sum),
            5 => Ok(Aggregator::Avg),
            _ => Err(IrError::InvalidIndex {
                kind: "aggregator",
                index,
            }),
        }
    }

    /// Keyword as it appears in the human-readable dialect, empty for `None`.
    pub fn keyword(self) -> &'static str {
        match self {
            Aggregator::None => "",
            Aggregator::Max => "MAX",
            Aggregator::Min => "MIN",
            Aggregator::Count => "COUNT",
            Aggregator::Sum => "SUM",
            Aggregator::Avg => "AVG",
        }
    }
}

impl From<Aggregator> for u8 {
    fn from(agg: Aggregator) -> Self {
        agg.index() as u8
    }
}

impl TryFrom<u8> for Aggregator {
    type Error = IrError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Aggregator::from_index(value as usize)
    }
}

/// Comparison operator of a WHERE condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CondOp {
    Eq,
    Gt,
    Lt,
}

impl CondOp {
    pub const ALL: [CondOp; 3] = [CondOp::Eq, CondOp::Gt, CondOp::Lt];

    pub fn index(self) -> usize {
        match self {
            CondOp::Eq => 0,
            CondOp::Gt => 1,
            CondOp::Lt => 2,
        }
    }

    pub fn from_index(index: usize) -> Result<Self, IrError> {
        CondOp::ALL
            .get(index)
            .copied()
            .ok_or(IrError::InvalidIndex {
                kind: "operator",
                index,
            })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CondOp::Eq => "=",
            CondOp::Gt => ">",
            CondOp::Lt => "<",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        CondOp::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl From<CondOp> for u8 {
    fn from(op: CondOp) -> Self {
        op.index() as u8
    }
}

impl TryFrom<u8> for CondOp {
    type Error = IrError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CondOp::from_index(value as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregator_indices_follow_keyword_order() {
        let indices: Vec<usize> = Aggregator::KEYWORDS.iter().map(|a| a.index()).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        assert_eq!(Aggregator::None.index(), 0);

        for i in 0..6 {
            assert_eq!(Aggregator::from_index(i).unwrap().index(), i);
        }
        assert!(Aggregator::from_index(6).is_err());
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(CondOp::from_symbol("="), Some(CondOp::Eq));
        assert_eq!(CondOp::from_symbol(">"), Some(CondOp::Gt));
        assert_eq!(CondOp::from_symbol("<"), Some(CondOp::Lt));
        assert_eq!(CondOp::from_symbol("!="), None);
        assert_eq!(CondOp::Lt.index(), 2);
    }

    #[test]
    fn test_serialized_as_index() {
        assert_eq!(serde_json::to_string(&Aggregator::Count).unwrap(), "3");
        assert_eq!(serde_json::to_string(&CondOp::Gt).unwrap(), "1");

        let agg: Aggregator = serde_json::from_str("5").unwrap();
        assert_eq!(agg, Aggregator::Avg);
        assert!(serde_json::from_str::<CondOp>("3").is_err());
    }
}
