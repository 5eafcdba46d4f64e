//! The four views of the funnel and which moves between them are allowed.

use serde::{Deserialize, Serialize};

/// The views, in forward order: Landing → Registration → Simulation →
/// Dashboard. Each non-landing view can also step back to its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Landing,
    Registration,
    Simulation,
    Dashboard,
}

impl View {
    pub const ALL: [View; 4] = [
        View::Landing,
        View::Registration,
        View::Simulation,
        View::Dashboard,
    ];

    /// The next view in forward order, if any.
    pub fn next(&self) -> Option<View> {
        use View::*;
        match self {
            Landing => Some(Registration),
            Registration => Some(Simulation),
            Simulation => Some(Dashboard),
            Dashboard => None,
        }
    }

    /// The view the back control returns to, if any.
    pub fn predecessor(&self) -> Option<View> {
        use View::*;
        match self {
            Landing => None,
            Registration => Some(Landing),
            Simulation => Some(Registration),
            Dashboard => Some(Simulation),
        }
    }

    /// Check if moving from `self` to `target` is allowed.
    pub fn can_transition_to(&self, target: View) -> bool {
        self.next() == Some(target) || self.predecessor() == Some(target)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Registration => "registration",
            Self::Simulation => "simulation",
            Self::Dashboard => "dashboard",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
