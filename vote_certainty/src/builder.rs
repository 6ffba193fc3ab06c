use std::collections::BTreeMap;

pub use crate::config::*;

/// A builder for result snapshots.
///
/// The builder enforces that the option names are unique and not empty.
///
/// ```
/// pub use vote_certainty::builder::SnapshotBuilder;
/// # use vote_certainty::SnapshotErrors;
///
/// let snapshot = SnapshotBuilder::new()
///     .active(true)
///     .eligible(200)
///     .universe(200)
///     .add_option("A", 101)?
///     .add_option("B", 40)?
///     .build();
///
/// assert_eq!(snapshot.total_cast, 141);
/// let verdict = vote_certainty::evaluate_certainty(&snapshot);
/// assert!(verdict.decided);
/// assert_eq!(verdict.leader, Some("A".to_string()));
///
/// # Ok::<(), SnapshotErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    _active: bool,
    _eligible: u64,
    _cast: Option<u64>,
    _universe: Option<u64>,
    _votes: BTreeMap<String, u64>,
}

impl SnapshotBuilder {
    pub fn new() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    pub fn active(self, active: bool) -> SnapshotBuilder {
        SnapshotBuilder {
            _active: active,
            ..self
        }
    }

    pub fn eligible(self, eligible: u64) -> SnapshotBuilder {
        SnapshotBuilder {
            _eligible: eligible,
            ..self
        }
    }

    /// Sets the number of votes counted so far.
    ///
    /// If never called, the sum of the option tallies is used.
    pub fn cast(self, cast: u64) -> SnapshotBuilder {
        SnapshotBuilder {
            _cast: Some(cast),
            ..self
        }
    }

    /// Sets the maximum number of votes the election may record. Defaults to the eligible count.
    pub fn universe(self, universe: u64) -> SnapshotBuilder {
        SnapshotBuilder {
            _universe: Some(universe),
            ..self
        }
    }

    /// Adds the tally of one option.
    ///
    /// The name is used as given, but a name that is blank after trimming is refused.
    pub fn add_option(mut self, name: &str, votes: u64) -> Result<SnapshotBuilder, SnapshotErrors> {
        if name.trim().is_empty() {
            return Err(SnapshotErrors::EmptyOptionName);
        }
        if self._votes.contains_key(name) {
            return Err(SnapshotErrors::DuplicateOption(name.to_string()));
        }
        self._votes.insert(name.to_string(), votes);
        Ok(self)
    }

    pub fn build(self) -> TallySnapshot {
        let total_cast = self
            ._cast
            .unwrap_or_else(|| self._votes.values().fold(0, |acc, v| acc.saturating_add(*v)));
        TallySnapshot {
            active: self._active,
            total_eligible: self._eligible,
            total_cast,
            total_universe: self._universe.unwrap_or(self._eligible),
            votes_by_option: self._votes,
        }
    }
}
