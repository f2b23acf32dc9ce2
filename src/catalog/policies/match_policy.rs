use crate::catalog::domain::MatchKind;

/// Components compared when resolving a laptop template:
/// cpu, ram, vga, display, storage and color.
pub const TEMPLATE_COMPONENT_COUNT: usize = 6;

/// Minimum agreeing components for a non-exact template match.
///
/// Tolerates near-duplicate specs. Nothing documents why 4 rather than 5;
/// keep it configurable and confirm with the catalog owner before tightening.
pub const DEFAULT_PARTIAL_MATCH_THRESHOLD: usize = 4;

/// MatchPolicy decides which configuration a parsed template selects.
///
/// Selection order:
/// 1. the first configuration agreeing on every component
/// 2. otherwise the first configuration (stored order) reaching the threshold
///
/// Which of several threshold-passing configurations should win is
/// unspecified; stored order is what operators currently rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    partial_threshold: usize,
}

impl MatchPolicy {
    /// Creates a policy; the threshold is clamped to `1..=TEMPLATE_COMPONENT_COUNT`.
    pub fn new(partial_threshold: usize) -> Self {
        Self {
            partial_threshold: partial_threshold.clamp(1, TEMPLATE_COMPONENT_COUNT),
        }
    }

    pub fn partial_threshold(&self) -> usize {
        self.partial_threshold
    }

    /// Picks a candidate from `(index, matched)` scores in stored order.
    pub fn select(&self, scores: &[(usize, usize)]) -> Option<(usize, MatchKind)> {
        if let Some((index, _)) = scores
            .iter()
            .find(|(_, matched)| *matched == TEMPLATE_COMPONENT_COUNT)
        {
            return Some((*index, MatchKind::Exact));
        }

        scores
            .iter()
            .find(|(_, matched)| *matched >= self.partial_threshold)
            .map(|(index, matched)| {
                (
                    *index,
                    MatchKind::Partial {
                        matched: *matched,
                        compared: TEMPLATE_COMPONENT_COUNT,
                    },
                )
            })
    }
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PARTIAL_MATCH_THRESHOLD)
    }
}
