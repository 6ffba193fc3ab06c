mod config;
use log::{debug, info, warn};

pub use crate::config::*;

pub mod builder;
pub mod identifier;
pub mod manual;

pub use crate::identifier::{
    format_identifier, is_valid_identifier, validate_identifier, IdentifierError, ValidIdentifier,
};

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

// Saturates instead of overflowing: tallies come from untrusted payloads.
impl std::iter::Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteCount(iter.map(|vc| vc.0).fold(0, u64::saturating_add))
    }
}

// The votes that may still arrive.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum RemainingVotes {
    // More votes were counted than the universe allows.
    Exceeded,
    Left(VoteCount),
}

fn remaining_votes(snapshot: &TallySnapshot) -> RemainingVotes {
    match snapshot.total_universe.checked_sub(snapshot.total_cast) {
        Some(x) => RemainingVotes::Left(VoteCount(x)),
        None => RemainingVotes::Exceeded,
    }
}

/// The options sorted by decreasing tally. Equal tallies keep the name order.
fn ranked_options(snapshot: &TallySnapshot) -> Vec<(&String, VoteCount)> {
    let mut res: Vec<(&String, VoteCount)> = snapshot
        .votes_by_option
        .iter()
        .map(|(name, &votes)| (name, VoteCount(votes)))
        .collect();
    // The sort is stable, the map already iterates in name order.
    res.sort_by(|a, b| b.1.cmp(&a.1));
    res
}

fn decided_message(leader: &str) -> String {
    format!("Election mathematically decided! - {}", leader)
}

fn decided(leader: &str, message: String) -> Verdict {
    Verdict {
        decided: true,
        leader: Some(leader.to_string()),
        message,
    }
}

fn undecided(message: &str) -> Verdict {
    Verdict {
        decided: false,
        leader: None,
        message: message.to_string(),
    }
}

/// Decides if the leading option of an active election can still be overtaken.
///
/// The leader is safe once its advantage over the runner-up is strictly larger than the
/// number of votes that may still arrive (`total_universe - total_cast`): even if the
/// runner-up received all of them, it would stay behind.
///
/// Options with the same tally are ordered by name, so the outcome does not depend on the
/// order in which the backend listed them.
///
/// Inactive elections always get an undecided verdict with an empty message: the question
/// only makes sense while votes are coming in. See [`final_outcome`] for closed elections.
pub fn evaluate_certainty(snapshot: &TallySnapshot) -> Verdict {
    if !snapshot.active {
        return undecided("");
    }

    let ranked = ranked_options(snapshot);
    let remaining = remaining_votes(snapshot);
    debug!(
        "evaluate_certainty: remaining: {:?} ranked: {:?}",
        remaining, ranked
    );

    let remaining = match remaining {
        RemainingVotes::Left(x) => x,
        RemainingVotes::Exceeded => {
            warn!(
                "evaluate_certainty: {} votes counted for a universe of {}",
                snapshot.total_cast, snapshot.total_universe
            );
            return match ranked.first() {
                Some((name, count)) if *count > VoteCount::EMPTY => decided(
                    name,
                    format!(
                        "Election mathematically decided! (all votes in the universe counted) - {}",
                        name
                    ),
                ),
                _ => Verdict {
                    decided: true,
                    leader: None,
                    message: "Election decided (no votes or options).".to_string(),
                },
            };
        }
    };

    let verdict = match ranked.as_slice() {
        [] => undecided("No options with votes to analyse."),
        // Only one option. It is the leader by any standard.
        [(name, _)] => decided(name, decided_message(name)),
        [(leader, leader_count), (_, second_count), ..] => {
            let lead = VoteCount(leader_count.0 - second_count.0);
            debug!(
                "evaluate_certainty: leader {:?} is ahead by {:?} with {:?} remaining",
                leader, lead, remaining
            );
            if lead > remaining {
                decided(leader, decided_message(leader))
            } else {
                undecided("Election not mathematically decided.")
            }
        }
    };
    info!(
        "evaluate_certainty: decided: {} leader: {:?}",
        verdict.decided, verdict.leader
    );
    verdict
}

fn share_of(votes: VoteCount, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(votes.0 as f64 / total as f64)
    }
}

/// The outcome of an election that stopped receiving votes.
///
/// All the options sharing the highest tally are reported when there is a tie, instead of
/// picking one of them.
pub fn final_outcome(snapshot: &TallySnapshot) -> FinalOutcome {
    if snapshot.active {
        return FinalOutcome::StillCounting;
    }
    let ranked = ranked_options(snapshot);
    let top_count = match ranked.first() {
        Some((_, count)) if *count > VoteCount::EMPTY => *count,
        _ => return FinalOutcome::NoVotes,
    };
    let top: Vec<String> = ranked
        .iter()
        .take_while(|(_, count)| *count == top_count)
        .map(|(name, _)| name.to_string())
        .collect();
    debug!("final_outcome: top options: {:?} {:?}", top, top_count);

    match top.as_slice() {
        [name] => FinalOutcome::Winner {
            name: name.clone(),
            votes: top_count.0,
            share: share_of(top_count, snapshot.total_cast),
        },
        _ => FinalOutcome::Tie {
            names: top,
            votes: top_count.0,
        },
    }
}

/// The number of eligible voters that did not vote.
pub fn abstention(snapshot: &TallySnapshot) -> u64 {
    snapshot
        .total_eligible
        .saturating_sub(snapshot.total_cast)
}

/// The fraction of the eligible voters that did not vote. None if nobody is eligible.
pub fn abstention_rate(snapshot: &TallySnapshot) -> Option<f64> {
    share_of(VoteCount(abstention(snapshot)), snapshot.total_eligible)
}

/// The tally and the share of the cast votes of every option, in name order.
pub fn option_shares(snapshot: &TallySnapshot) -> Vec<OptionShare> {
    let counted: VoteCount = snapshot
        .votes_by_option
        .values()
        .map(|v| VoteCount(*v))
        .sum();
    if counted != VoteCount(snapshot.total_cast) {
        debug!(
            "option_shares: options add up to {:?}, but {} votes were cast",
            counted, snapshot.total_cast
        );
    }
    snapshot
        .votes_by_option
        .iter()
        .map(|(name, &votes)| OptionShare {
            name: name.clone(),
            votes,
            share: share_of(VoteCount(votes), snapshot.total_cast),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::builder::SnapshotBuilder;
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn active(cast: u64, universe: u64, options: &[(&str, u64)]) -> TallySnapshot {
        let mut b = SnapshotBuilder::new()
            .active(true)
            .eligible(universe)
            .cast(cast)
            .universe(universe);
        for (name, votes) in options {
            b = b.add_option(name, *votes).unwrap();
        }
        b.build()
    }

    #[test]
    fn lead_equal_to_remaining_is_not_enough() {
        init();
        let v = evaluate_certainty(&active(140, 200, &[("A", 100), ("B", 40)]));
        assert!(!v.decided);
        assert_eq!(v.leader, None);
        assert_eq!(v.message, "Election not mathematically decided.");

        let v = evaluate_certainty(&active(141, 200, &[("A", 101), ("B", 40)]));
        // remaining 59, lead 61
        assert!(v.decided);
        assert_eq!(v.leader, Some("A".to_string()));
    }

    #[test]
    fn lead_one_above_remaining() {
        init();
        // Holding the cast count, only the lead moves.
        let v = evaluate_certainty(&active(140, 200, &[("A", 101), ("B", 40)]));
        assert!(v.decided);
        assert_eq!(v.leader, Some("A".to_string()));
        assert_eq!(v.message, "Election mathematically decided! - A");
    }

    #[test]
    fn inactive_is_never_decided() {
        init();
        let s = SnapshotBuilder::new()
            .active(false)
            .eligible(10)
            .add_option("A", 10)
            .unwrap()
            .build();
        assert_eq!(
            evaluate_certainty(&s),
            Verdict {
                decided: false,
                leader: None,
                message: "".to_string()
            }
        );
    }

    #[test]
    fn single_option_is_decided() {
        init();
        for votes in [0, 1, 57] {
            let v = evaluate_certainty(&active(votes, 1000, &[("Solo", votes)]));
            assert!(v.decided);
            assert_eq!(v.leader, Some("Solo".to_string()));
        }
    }

    #[test]
    fn no_options_is_undecided() {
        init();
        let v = evaluate_certainty(&active(0, 100, &[]));
        assert!(!v.decided);
        assert_eq!(v.leader, None);
        assert_eq!(v.message, "No options with votes to analyse.");
    }

    #[test]
    fn exceeded_universe_is_decided() {
        init();
        let v = evaluate_certainty(&active(120, 100, &[("A", 50), ("B", 70)]));
        assert!(v.decided);
        assert_eq!(v.leader, Some("B".to_string()));
        assert_eq!(
            v.message,
            "Election mathematically decided! (all votes in the universe counted) - B"
        );
    }

    #[test]
    fn exceeded_universe_without_votes() {
        init();
        let v = evaluate_certainty(&active(5, 0, &[]));
        assert!(v.decided);
        assert_eq!(v.leader, None);

        let v = evaluate_certainty(&active(5, 0, &[("A", 0), ("B", 0)]));
        assert!(v.decided);
        assert_eq!(v.leader, None);
        assert_eq!(v.message, "Election decided (no votes or options).");
    }

    #[test]
    fn ties_are_broken_by_name() {
        init();
        let v = evaluate_certainty(&active(30, 10, &[("Zeta", 15), ("Alpha", 15)]));
        assert_eq!(v.leader, Some("Alpha".to_string()));

        // Three options: the runner-up is the second by tally, not by name.
        let v = evaluate_certainty(&active(90, 100, &[("C", 50), ("A", 10), ("B", 30)]));
        // remaining 10, lead 20
        assert!(v.decided);
        assert_eq!(v.leader, Some("C".to_string()));
    }

    #[test]
    fn tied_leaders_are_never_decided() {
        init();
        let v = evaluate_certainty(&active(100, 100, &[("A", 50), ("B", 50)]));
        assert!(!v.decided);
    }

    #[test]
    fn more_votes_for_the_leader_never_undecides() {
        init();
        for cast in [60, 100, 150] {
            let mut was_decided = false;
            for leader_votes in 40..200 {
                let v = evaluate_certainty(&active(
                    cast,
                    200,
                    &[("A", leader_votes), ("B", 40), ("C", 5)],
                ));
                assert!(
                    v.decided || !was_decided,
                    "lost certainty at {} votes",
                    leader_votes
                );
                was_decided = v.decided;
            }
            assert!(was_decided);
        }
    }

    #[test]
    fn input_is_left_untouched() {
        let s = active(140, 200, &[("A", 100), ("B", 40)]);
        let copy = s.clone();
        let _ = evaluate_certainty(&s);
        let _ = final_outcome(&s);
        assert_eq!(s, copy);
    }

    #[test]
    fn final_outcome_winner() {
        init();
        let s = SnapshotBuilder::new()
            .eligible(10)
            .add_option("A", 3)
            .unwrap()
            .add_option("B", 1)
            .unwrap()
            .build();
        assert_eq!(
            final_outcome(&s),
            FinalOutcome::Winner {
                name: "A".to_string(),
                votes: 3,
                share: Some(0.75)
            }
        );
        assert_eq!(abstention(&s), 6);
        assert_eq!(abstention_rate(&s), Some(0.6));
    }

    #[test]
    fn final_outcome_tie_and_empty() {
        init();
        let s = SnapshotBuilder::new()
            .add_option("B", 2)
            .unwrap()
            .add_option("A", 2)
            .unwrap()
            .add_option("C", 1)
            .unwrap()
            .build();
        assert_eq!(
            final_outcome(&s),
            FinalOutcome::Tie {
                names: vec!["A".to_string(), "B".to_string()],
                votes: 2
            }
        );

        let s = SnapshotBuilder::new().add_option("A", 0).unwrap().build();
        assert_eq!(final_outcome(&s), FinalOutcome::NoVotes);
        assert_eq!(abstention_rate(&s), None);

        let s = SnapshotBuilder::new().active(true).build();
        assert_eq!(final_outcome(&s), FinalOutcome::StillCounting);
    }

    #[test]
    fn shares_follow_name_order() {
        let s = SnapshotBuilder::new()
            .cast(4)
            .add_option("b", 3)
            .unwrap()
            .add_option("a", 1)
            .unwrap()
            .build();
        let shares = option_shares(&s);
        assert_eq!(
            shares,
            vec![
                OptionShare {
                    name: "a".to_string(),
                    votes: 1,
                    share: Some(0.25)
                },
                OptionShare {
                    name: "b".to_string(),
                    votes: 3,
                    share: Some(0.75)
                }
            ]
        );
    }

    #[test]
    fn huge_tallies_do_not_overflow() {
        let s = SnapshotBuilder::new()
            .cast(10)
            .add_option("A", u64::MAX)
            .unwrap()
            .add_option("B", 1)
            .unwrap()
            .build();
        let shares = option_shares(&s);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].votes, u64::MAX);
        assert_eq!(
            final_outcome(&s),
            FinalOutcome::Winner {
                name: "A".to_string(),
                votes: u64::MAX,
                share: Some(u64::MAX as f64 / 10.0)
            }
        );
    }

    #[test]
    fn abstention_saturates() {
        let s = SnapshotBuilder::new().eligible(3).cast(5).build();
        assert_eq!(abstention(&s), 0);
        assert_eq!(abstention_rate(&s), Some(0.0));
    }
}
