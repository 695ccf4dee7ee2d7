/// Run phase definitions for tracking the progress of one stitch run
///
/// A run moves strictly forward through the phases; no phase is skipped and
/// a finished run is never restarted.
use std::fmt;

/// Represents the current phase of a stitch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Nothing has happened yet
    Idle,

    /// The seed page is being scanned for candidate URLs
    Discovering,

    /// Batches of pages are being fetched and appended to the document
    Crawling,

    /// All batches have settled; the table of contents is being written
    Finalizing,

    /// Terminal phase
    Done,
}

impl RunPhase {
    /// Validates whether a transition from this phase to another is allowed
    ///
    /// # Valid Transitions
    ///
    /// - Idle → Discovering
    /// - Discovering → Crawling, Done (no URLs found)
    /// - Crawling → Finalizing
    /// - Finalizing → Done
    pub fn can_transition_to(&self, target: RunPhase) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Discovering)
                | (Self::Discovering, Self::Crawling)
                | (Self::Discovering, Self::Done)
                | (Self::Crawling, Self::Finalizing)
                | (Self::Finalizing, Self::Done)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering",
            Self::Crawling => "crawling",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RunPhase; 5] = [
        RunPhase::Idle,
        RunPhase::Discovering,
        RunPhase::Crawling,
        RunPhase::Finalizing,
        RunPhase::Done,
    ];

    #[test]
    fn test_forward_path_is_valid() {
        assert!(RunPhase::Idle.can_transition_to(RunPhase::Discovering));
        assert!(RunPhase::Discovering.can_transition_to(RunPhase::Crawling));
        assert!(RunPhase::Crawling.can_transition_to(RunPhase::Finalizing));
        assert!(RunPhase::Finalizing.can_transition_to(RunPhase::Done));
    }

    #[test]
    fn test_empty_discovery_short_circuit() {
        assert!(RunPhase::Discovering.can_transition_to(RunPhase::Done));
    }

    #[test]
    fn test_no_skipping_phases() {
        assert!(!RunPhase::Idle.can_transition_to(RunPhase::Crawling));
        assert!(!RunPhase::Idle.can_transition_to(RunPhase::Done));
        assert!(!RunPhase::Crawling.can_transition_to(RunPhase::Done));
        assert!(!RunPhase::Discovering.can_transition_to(RunPhase::Finalizing));
    }

    #[test]
    fn test_done_is_terminal() {
        for phase in ALL {
            assert!(!RunPhase::Done.can_transition_to(phase));
        }
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!RunPhase::Crawling.can_transition_to(RunPhase::Discovering));
        assert!(!RunPhase::Finalizing.can_transition_to(RunPhase::Crawling));
        assert!(!RunPhase::Discovering.can_transition_to(RunPhase::Idle));
    }

    #[test]
    fn test_display() {
        assert_eq!(RunPhase::Crawling.to_string(), "crawling");
        assert_eq!(format!("{}", RunPhase::Done), "done");
    }
}
