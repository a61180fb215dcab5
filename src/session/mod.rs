//! Practice-session script model.
//!
//! [`Script`] holds the ordered [`Turn`]s of a session; user turns move from
//! [`TurnState::Pending`] to [`TurnState::Scored`] when a [`TurnUpdate`]
//! produced by the grader is applied.

pub mod turn;

pub use turn::{Role, Script, Turn, TurnState, TurnUpdate};
