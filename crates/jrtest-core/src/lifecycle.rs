//! Service module lifecycle state machine

use serde::{Deserialize, Serialize};

/// Lifecycle of a service module inside its host
///
/// State transitions:
/// ```text
/// Registered → Starting → Serving → Draining → Stopped
///                 ↑                               │
///                 └───────────────────────────────┘ (restart)
///            Any non-terminal state → Faulted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleState {
    /// Registered with the host but not started
    #[default]
    Registered,
    /// Acquiring the runtime and running `on_start`
    Starting,
    /// Accepting requests
    Serving,
    /// Refusing new requests while in-flight ones finish
    Draining,
    Stopped,
    /// A fatal error or panic took the module down
    Faulted,
}

impl ModuleState {
    /// Check if this state can transition to the target state
    pub fn can_transition_to(&self, target: ModuleState) -> bool {
        use ModuleState::*;
        matches!(
            (self, target),
            (Registered, Starting)
                | (Starting, Serving)
                | (Serving, Draining)
                | (Draining, Stopped)
                | (Stopped, Starting)
                | (Registered, Faulted)
                | (Starting, Faulted)
                | (Serving, Faulted)
                | (Draining, Faulted)
        )
    }

    pub fn can_serve_requests(&self) -> bool {
        matches!(self, ModuleState::Serving)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ModuleState::Stopped | ModuleState::Faulted)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ModuleState::Registered => "Module is registered but not started",
            ModuleState::Starting => "Module is starting up",
            ModuleState::Serving => "Module is serving requests",
            ModuleState::Draining => "Module is draining in-flight requests",
            ModuleState::Stopped => "Module has stopped",
            ModuleState::Faulted => "Module has faulted",
        }
    }

    /// Compact representation for atomic storage
    pub fn as_u8(self) -> u8 {
        match self {
            ModuleState::Registered => 0,
            ModuleState::Starting => 1,
            ModuleState::Serving => 2,
            ModuleState::Draining => 3,
            ModuleState::Stopped => 4,
            ModuleState::Faulted => 5,
        }
    }

    /// Inverse of [`ModuleState::as_u8`]; unknown values read as `Faulted`
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => ModuleState::Registered,
            1 => ModuleState::Starting,
            2 => ModuleState::Serving,
            3 => ModuleState::Draining,
            4 => ModuleState::Stopped,
            _ => ModuleState::Faulted,
        }
    }
}

impl std::fmt::Display for ModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleState::Registered => write!(f, "Registered"),
            ModuleState::Starting => write!(f, "Starting"),
            ModuleState::Serving => write!(f, "Serving"),
            ModuleState::Draining => write!(f, "Draining"),
            ModuleState::Stopped => write!(f, "Stopped"),
            ModuleState::Faulted => write!(f, "Faulted"),
        }
    }
}
