//! Fixed set of event names a sound can be bound to.

use std::fmt;
use std::str::FromStr;

use crate::PackError;

/// Trigger category an audio cue is bound to.
///
/// The set is closed: a pack directory may only contain subdirectories named
/// after one of these variants. Names are matched exactly (case-sensitive).
///
/// # Examples
///
/// ```
/// use cuepack_core::EventName;
///
/// assert_eq!(EventName::from_name("session-start"), Some(EventName::SessionStart));
/// assert_eq!(EventName::from_name("Session-Start"), None);
/// assert_eq!(EventName::ToolFailure.as_str(), "tool-failure");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventName {
    /// `session-start`
    SessionStart,
    /// `prompt-submit`
    PromptSubmit,
    /// `notification`
    Notification,
    /// `stop`
    Stop,
    /// `session-end`
    SessionEnd,
    /// `subagent-stop`
    SubagentStop,
    /// `tool-failure`
    ToolFailure,
}

impl EventName {
    /// All recognized events, in canonical order.
    pub const ALL: [Self; 7] = [
        Self::SessionStart,
        Self::PromptSubmit,
        Self::Notification,
        Self::Stop,
        Self::SessionEnd,
        Self::SubagentStop,
        Self::ToolFailure,
    ];

    /// Returns the directory name for this event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SessionStart => "session-start",
            Self::PromptSubmit => "prompt-submit",
            Self::Notification => "notification",
            Self::Stop => "stop",
            Self::SessionEnd => "session-end",
            Self::SubagentStop => "subagent-stop",
            Self::ToolFailure => "tool-failure",
        }
    }

    /// Looks up an event by its exact directory name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == name)
    }
}

impl FromStr for EventName {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| PackError::UnknownEvent {
            name: s.to_owned(),
        })
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_names_round_trip() {
        for event in EventName::ALL {
            assert_eq!(EventName::from_name(event.as_str()), Some(event));
        }
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(EventName::from_name(""), None);
        assert_eq!(EventName::from_name("STOP"), None);
        assert_eq!(EventName::from_name("stop "), None);
        assert_eq!(EventName::from_name(".."), None);
        assert!(matches!(
            "startup".parse::<EventName>(),
            Err(PackError::UnknownEvent { .. })
        ));
    }
}
