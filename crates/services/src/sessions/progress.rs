/// Final tally of a completed quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    pub score: usize,
    pub total: usize,
}

impl QuizSummary {
    /// Share of correct answers, 0 for an empty quiz.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.score.saturating_mul(100) / self.total;
        u32::try_from(pct).unwrap_or(100)
    }
}

/// How a session ended.
///
/// `Completed` with a total of 0 means the provider returned an empty batch;
/// leaving a session early (including after a load failure) is `Abandoned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizOutcome {
    Completed(QuizSummary),
    Abandoned,
}

impl QuizOutcome {
    /// `(score, total)` pair; an abandoned session reports `(0, 0)`.
    #[must_use]
    pub fn tally(&self) -> (usize, usize) {
        match self {
            QuizOutcome::Completed(summary) => (summary.score, summary.total),
            QuizOutcome::Abandoned => (0, 0),
        }
    }

    #[must_use]
    pub fn summary(&self) -> Option<QuizSummary> {
        match self {
            QuizOutcome::Completed(summary) => Some(*summary),
            QuizOutcome::Abandoned => None,
        }
    }

    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        matches!(self, QuizOutcome::Abandoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abandoned_and_empty_quiz_are_distinguishable() {
        let empty = QuizOutcome::Completed(QuizSummary { score: 0, total: 0 });
        assert_eq!(empty.tally(), QuizOutcome::Abandoned.tally());
        assert!(!empty.is_abandoned());
        assert!(QuizOutcome::Abandoned.is_abandoned());
        assert_eq!(QuizOutcome::Abandoned.summary(), None);
    }

    #[test]
    fn percent_rounds_down() {
        assert_eq!(QuizSummary { score: 1, total: 3 }.percent(), 33);
        assert_eq!(QuizSummary { score: 0, total: 0 }.percent(), 0);
        assert_eq!(QuizSummary { score: 10, total: 10 }.percent(), 100);
    }
}
