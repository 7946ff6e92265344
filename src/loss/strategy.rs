use serde::{Serialize, Deserialize};

/// Selects how the softmax loss is evaluated.
///
/// - `Naive`      — explicit per-example, per-class loops. Slow, but written
///   independently of the matrix path so it can serve as a reference.
/// - `Vectorized` — whole-matrix evaluation: scores, probabilities and the
///   gradient each come from a single matrix expression.
///
/// Both produce the same loss and gradient up to floating-point rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossStrategy {
    Naive,
    Vectorized,
}

impl LossStrategy {
    /// The other strategy; handy for cross-checking one against the other.
    pub fn counterpart(self) -> LossStrategy {
        match self {
            LossStrategy::Naive => LossStrategy::Vectorized,
            LossStrategy::Vectorized => LossStrategy::Naive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&LossStrategy::Naive).unwrap(), "\"naive\"");
        let s: LossStrategy = serde_json::from_str("\"vectorized\"").unwrap();
        assert_eq!(s, LossStrategy::Vectorized);
    }

    #[test]
    fn counterpart_flips() {
        assert_eq!(LossStrategy::Naive.counterpart(), LossStrategy::Vectorized);
        assert_eq!(LossStrategy::Vectorized.counterpart(), LossStrategy::Naive);
    }
}
