use serde::{Serialize, Deserialize};

use quorum_common::error::{QuorumError, Result};

/// Decides whether a number of distinct voters is enough under a committee of `set_size`.
///
/// Injected into the pool so that the threshold can change (simple majority,
/// BFT 2f+1, stake fractions) without touching the tally bookkeeping.
pub trait QuorumThreshold: Send + Sync {
    fn is_reached(&self, voters: usize, set_size: usize) -> bool;
}

impl<F> QuorumThreshold for F
where
    F: Fn(usize, usize) -> bool + Send + Sync,
{
    fn is_reached(&self, voters: usize, set_size: usize) -> bool {
        self(voters, set_size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuorumPolicy {
    /// `voters > n / 2` (integer division).
    StrictMajority,
    /// `f = (n - 1) / 3`, quorum = `2f + 1`.
    Byzantine,
    /// `voters >= max(ceil(fraction * n), min_voters)`.
    Fraction { fraction: f64, min_voters: usize },
}

impl Default for QuorumPolicy {
    fn default() -> Self {
        Self::StrictMajority
    }
}

impl QuorumPolicy {
    /// Minimum number of distinct voters needed for a committee of `set_size`.
    /// `None` for an empty committee, which can never reach quorum.
    pub fn required(&self, set_size: usize) -> Option<usize> {
        if set_size == 0 {
            return None;
        }
        let needed = match self {
            QuorumPolicy::StrictMajority => set_size / 2 + 1,
            QuorumPolicy::Byzantine => {
                let f = (set_size - 1) / 3;
                2 * f + 1
            }
            QuorumPolicy::Fraction { fraction, min_voters } => {
                let by_fraction = (fraction * set_size as f64).ceil() as usize;
                by_fraction.max(*min_voters).max(1)
            }
        };
        Some(needed)
    }

    pub fn validate(&self) -> Result<()> {
        if let QuorumPolicy::Fraction { fraction, .. } = self {
            if !(*fraction > 0.0 && *fraction <= 1.0) {
                return Err(QuorumError::Config(format!(
                    "quorum fraction must be in (0, 1], got {}",
                    fraction
                )));
            }
        }
        Ok(())
    }
}

impl QuorumThreshold for QuorumPolicy {
    fn is_reached(&self, voters: usize, set_size: usize) -> bool {
        self.required(set_size)
            .map(|needed| voters >= needed)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_majority() {
        let policy = QuorumPolicy::StrictMajority;

        // 3 nodes -> floor(3/2) = 1 -> need 2
        assert!(!policy.is_reached(1, 3));
        assert!(policy.is_reached(2, 3));

        // 4 nodes -> need 3, a 2/2 split is not a majority
        assert!(!policy.is_reached(2, 4));
        assert!(policy.is_reached(3, 4));

        // 5 nodes -> floor(5/2) = 2 -> need 3
        assert_eq!(policy.required(5), Some(3));
        assert_eq!(policy.required(1), Some(1));
    }

    #[test]
    fn test_bft_quorum_calculation() {
        let policy = QuorumPolicy::Byzantine;

        // 4 nodes -> f=1 -> quorum=3
        assert_eq!(policy.required(4), Some(3));
        assert!(!policy.is_reached(2, 4));
        assert!(policy.is_reached(3, 4));

        // 7 nodes -> f=2 -> quorum=5
        assert_eq!(policy.required(7), Some(5));
        // 1 node -> f=0 -> quorum=1
        assert_eq!(policy.required(1), Some(1));
    }

    #[test]
    fn test_fraction_with_floor() {
        let policy = QuorumPolicy::Fraction { fraction: 0.7, min_voters: 3 };

        // ceil(0.7 * 10) = 7
        assert_eq!(policy.required(10), Some(7));
        // ceil(0.7 * 2) = 2, raised to min_voters
        assert_eq!(policy.required(2), Some(3));
        assert!(!policy.is_reached(2, 2));
    }

    #[test]
    fn test_empty_committee_never_reaches_quorum() {
        for policy in [
            QuorumPolicy::StrictMajority,
            QuorumPolicy::Byzantine,
            QuorumPolicy::Fraction { fraction: 0.5, min_voters: 0 },
        ] {
            assert_eq!(policy.required(0), None);
            assert!(!policy.is_reached(0, 0));
            assert!(!policy.is_reached(10, 0));
        }
    }

    #[test]
    fn test_validate_rejects_bad_fraction() {
        assert!(QuorumPolicy::Fraction { fraction: 0.0, min_voters: 1 }.validate().is_err());
        assert!(QuorumPolicy::Fraction { fraction: 1.5, min_voters: 1 }.validate().is_err());
        assert!(QuorumPolicy::Fraction { fraction: 1.0, min_voters: 1 }.validate().is_ok());
        assert!(QuorumPolicy::Byzantine.validate().is_ok());
    }

    #[test]
    fn test_closure_threshold() {
        let everyone = |voters: usize, n: usize| n > 0 && voters == n;
        assert!(!everyone.is_reached(2, 3));
        assert!(everyone.is_reached(3, 3));
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&QuorumPolicy::Byzantine).unwrap();
        assert_eq!(json, r#"{"kind":"byzantine"}"#);

        let parsed: QuorumPolicy =
            serde_json::from_str(r#"{"kind":"fraction","fraction":0.7,"min_voters":1}"#).unwrap();
        assert_eq!(parsed, QuorumPolicy::Fraction { fraction: 0.7, min_voters: 1 });
    }
}
