// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// The state of an election at one point in time, as reported by the results backend.
///
/// A snapshot is never updated in place: every poll of the backend produces a fresh one.
/// Prefer the [`crate::builder::SnapshotBuilder`] to create it, since it checks the option names.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TallySnapshot {
    /// True while votes are still being received.
    pub active: bool,
    /// The number of voters allowed to vote.
    pub total_eligible: u64,
    /// The number of votes already counted.
    pub total_cast: u64,
    /// The maximum number of votes the election could ever record.
    /// It bounds the number of votes still to come and may exceed `total_eligible`.
    pub total_universe: u64,
    /// The tally for each option. The ordering of the map (by name) is the tiebreak order.
    pub votes_by_option: BTreeMap<String, u64>,
}

// ******** Output data structures *********

/// The answer to "can the current leader still be overtaken?"
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Verdict {
    pub decided: bool,
    pub leader: Option<String>,
    pub message: String,
}

/// The outcome of an election once voting has stopped.
#[derive(PartialEq, Debug, Clone)]
pub enum FinalOutcome {
    /// The election is still active, there is no final outcome yet.
    StillCounting,
    /// No option received any vote.
    NoVotes,
    Winner {
        name: String,
        votes: u64,
        /// Fraction of the cast votes. None if no vote was cast.
        share: Option<f64>,
    },
    /// Several options share the highest tally, listed in name order.
    Tie { names: Vec<String>, votes: u64 },
}

#[derive(PartialEq, Debug, Clone)]
pub struct OptionShare {
    pub name: String,
    pub votes: u64,
    pub share: Option<f64>,
}

/// Errors that prevent a snapshot from being built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SnapshotErrors {
    EmptyOptionName,
    DuplicateOption(String),
}

impl Error for SnapshotErrors {}

impl Display for SnapshotErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotErrors::EmptyOptionName => write!(f, "option names may not be empty"),
            SnapshotErrors::DuplicateOption(name) => {
                write!(f, "option {:?} appears more than once", name)
            }
        }
    }
}
