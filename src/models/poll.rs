//! Poll board vote distribution and answer-label classification.

use serde::{Deserialize, Serialize};

/// Known answer labels, matched after lower-casing.
const EXACT_LABELS: &[(&str, Sentiment)] = &[
    ("положительное", Sentiment::Up),
    ("хорошо", Sentiment::Up),
    ("отрицательное", Sentiment::Down),
    ("плохо", Sentiment::Down),
    ("нейтральное", Sentiment::Neutral),
];

/// Stems tried in order when no exact label matches.
const LABEL_STEMS: &[(&str, Sentiment)] = &[
    ("пол", Sentiment::Up),
    ("хор", Sentiment::Up),
    ("отр", Sentiment::Down),
    ("пло", Sentiment::Down),
    ("нейтр", Sentiment::Neutral),
];

/// Meaning of a single poll answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Up,
    Down,
    Neutral,
}

impl Sentiment {
    /// Classify a free-text answer label.
    ///
    /// Exact phrases are checked first, then substring stems. Returns `None`
    /// when neither tier matches.
    pub fn classify(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();

        if let Some((_, sentiment)) = EXACT_LABELS.iter().find(|(known, _)| *known == label) {
            return Some(*sentiment);
        }

        LABEL_STEMS
            .iter()
            .find(|(stem, _)| label.contains(stem))
            .map(|(_, sentiment)| *sentiment)
    }
}

/// Vote breakdown of one teacher's poll.
///
/// Shares are percentages as reported by the board and need not sum to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PollDistribution {
    pub total: u64,
    pub up: f64,
    pub down: f64,
    pub neutral: f64,
}

impl PollDistribution {
    /// Record the share for a sentiment, replacing any earlier value.
    pub fn set(&mut self, sentiment: Sentiment, share: f64) {
        match sentiment {
            Sentiment::Up => self.up = share,
            Sentiment::Down => self.down = share,
            Sentiment::Neutral => self.neutral = share,
        }
    }

    /// Render as `up-down-neutral | total ` (trailing space included).
    pub fn formatted(&self) -> String {
        format!(
            "{:.1}-{:.1}-{:.1} | {} ",
            self.up, self.down, self.neutral, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_exact_labels() {
        assert_eq!(Sentiment::classify("положительное"), Some(Sentiment::Up));
        assert_eq!(Sentiment::classify("Плохо"), Some(Sentiment::Down));
        assert_eq!(Sentiment::classify("нейтральное"), Some(Sentiment::Neutral));
    }

    #[test]
    fn test_classify_by_stem() {
        assert_eq!(Sentiment::classify("отр"), Some(Sentiment::Down));
        assert_eq!(Sentiment::classify("Скорее хороший"), Some(Sentiment::Up));
        assert_eq!(Sentiment::classify("нейтрально"), Some(Sentiment::Neutral));
    }

    #[test]
    fn test_classify_unknown_label() {
        assert_eq!(Sentiment::classify("xyz"), None);
        assert_eq!(Sentiment::classify(""), None);
    }

    #[test]
    fn test_formatted() {
        let poll = PollDistribution {
            total: 42,
            up: 50.0,
            down: 33.33,
            neutral: 16.67,
        };
        assert_eq!(poll.formatted(), "50.0-33.3-16.7 | 42 ");
    }

    #[test]
    fn test_set_replaces_share() {
        let mut poll = PollDistribution::default();
        poll.set(Sentiment::Up, 10.0);
        poll.set(Sentiment::Up, 20.0);
        assert_eq!(poll.up, 20.0);
    }
}
