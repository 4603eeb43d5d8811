//! Per-invocation session state machine.
//!
//! # State Transitions
//! ```text
//! Unauthenticated → CredentialsLoaded → TokenAcquired → QueryIssued → Succeeded
//!        │                  │                 │              │
//!        └──────────────────┴────────┬────────┴──────────────┘
//!                                    ▼
//!                                  Failed
//! ```
//!
//! Succeeded and Failed are terminal. There is no retry edge.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Unauthenticated,
    CredentialsLoaded,
    TokenAcquired,
    QueryIssued,
    Succeeded,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Succeeded | SessionState::Failed)
    }

    /// The state reached when the current step succeeds.
    pub fn next(&self) -> Option<SessionState> {
        match self {
            SessionState::Unauthenticated => Some(SessionState::CredentialsLoaded),
            SessionState::CredentialsLoaded => Some(SessionState::TokenAcquired),
            SessionState::TokenAcquired => Some(SessionState::QueryIssued),
            SessionState::QueryIssued => Some(SessionState::Succeeded),
            SessionState::Succeeded | SessionState::Failed => None,
        }
    }

    pub fn can_transition_to(&self, to: SessionState) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == SessionState::Failed || self.next() == Some(to)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::CredentialsLoaded => "credentials_loaded",
            SessionState::TokenAcquired => "token_acquired",
            SessionState::QueryIssued => "query_issued",
            SessionState::Succeeded => "succeeded",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_order() {
        let mut state = SessionState::Unauthenticated;
        let mut seen = vec![state];
        while let Some(next) = state.next() {
            assert!(state.can_transition_to(next));
            state = next;
            seen.push(state);
        }

        assert_eq!(
            seen,
            vec![
                SessionState::Unauthenticated,
                SessionState::CredentialsLoaded,
                SessionState::TokenAcquired,
                SessionState::QueryIssued,
                SessionState::Succeeded,
            ]
        );
    }

    #[test]
    fn test_any_live_state_can_fail() {
        for state in [
            SessionState::Unauthenticated,
            SessionState::CredentialsLoaded,
            SessionState::TokenAcquired,
            SessionState::QueryIssued,
        ] {
            assert!(state.can_transition_to(SessionState::Failed));
        }
    }

    #[test]
    fn test_terminal_states_do_not_move() {
        for state in [SessionState::Succeeded, SessionState::Failed] {
            assert!(state.is_terminal());
            assert!(!state.can_transition_to(SessionState::Unauthenticated));
            assert!(!state.can_transition_to(SessionState::Failed));
        }
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        assert!(!SessionState::Unauthenticated.can_transition_to(SessionState::TokenAcquired));
        assert!(!SessionState::QueryIssued.can_transition_to(SessionState::CredentialsLoaded));
    }
}
