use std::collections::HashMap;
use std::sync::Mutex;

use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

use super::model::{MatchState, PointValue, Role, Side, StateSnapshot};

/// Number of referees whose latest votes must agree before a score is applied.
const QUORUM: u32 = 2;

/// Round wins that take the match outright.
const WINS_TO_TAKE_MATCH: u8 = 2;

/// Number of the final round; the match is decided when it ends.
const FINAL_ROUND: u8 = 3;

/// Outcome of a match once it concludes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchVerdict {
    Winner(Side),
    /// Round wins split evenly after the final round.
    Draw,
}

impl MatchVerdict {
    pub fn winner(&self) -> Option<Side> {
        match self {
            MatchVerdict::Winner(side) => Some(*side),
            MatchVerdict::Draw => None,
        }
    }
}

/// What happened to a match after a round ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundTransition {
    /// The match advanced to the next round; carries the reset state.
    NextRound(StateSnapshot),
    /// The match concluded and its state has been destroyed.
    MatchOver(MatchVerdict),
}

/// Result of ending a round on an existing match.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundEndOutcome {
    /// Side that took the round, `None` on a tied round.
    pub winner: Option<Side>,
    pub round_wins: super::model::SidePair<u8>,
    pub transition: RoundTransition,
}

/// Owns all live match state, keyed by match id.
///
/// Every operation locks the map, mutates, and computes its result before
/// releasing, so each inbound event is atomic relative to all others and
/// broadcast order matches the order events were accepted in.
pub struct MatchStore {
    matches: Mutex<HashMap<String, MatchState>>,
}

impl MatchStore {
    pub fn new() -> Self {
        Self {
            matches: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a join for `match_id`.
    ///
    /// A scoreboard join creates the match if it does not exist and always
    /// gets back a snapshot for the joining caller. Other roles never create
    /// state and get no snapshot; subscribing to a channel with no match
    /// behind it is harmless.
    #[instrument(skip(self))]
    pub fn join(&self, match_id: &str, role: Role) -> Option<StateSnapshot> {
        if role != Role::Scoreboard {
            debug!(match_id = %match_id, role = %role, "Non-scoreboard join, no state effect");
            return None;
        }

        let mut matches = self.matches.lock().unwrap();
        let state = matches.entry(match_id.to_string()).or_insert_with(|| {
            info!(match_id = %match_id, "Creating match on first scoreboard join");
            MatchState::new()
        });
        Some(state.snapshot())
    }

    /// Records a referee vote and applies a majority decision if one forms.
    ///
    /// The tally considers only each referee's latest vote this round, so a
    /// referee can correct an earlier vote without it still counting toward
    /// quorum. Scan order over candidate values is fixed (1..5, then -1); the
    /// first value reaching quorum is applied and the scan stops.
    ///
    /// Returns the updated snapshot, or `None` if the vote was dropped
    /// (unknown match or out-of-domain point value). Dropped votes leave the
    /// state untouched.
    #[instrument(skip(self))]
    pub fn cast_vote(
        &self,
        match_id: &str,
        referee_id: &str,
        side: Side,
        points: i8,
    ) -> Option<StateSnapshot> {
        let value = match PointValue::try_from(points) {
            Ok(value) => value,
            Err(raw) => {
                warn!(
                    match_id = %match_id,
                    referee_id = %referee_id,
                    points = raw,
                    "Dropping vote with out-of-domain point value"
                );
                return None;
            }
        };

        let mut matches = self.matches.lock().unwrap();
        let state = match matches.get_mut(match_id) {
            Some(state) => state,
            None => {
                debug!(match_id = %match_id, "Vote for unknown match dropped");
                return None;
            }
        };

        state.score_counts.get_mut(side).record(value);
        state
            .referee_votes
            .get_mut(side)
            .entry(referee_id.to_string())
            .or_default()
            .push(value);

        if let Some(decided) = Self::majority_decision(state, side) {
            if decided == PointValue::Penalty {
                *state.scores.get_mut(side.opponent()) += 1;
            } else {
                *state.scores.get_mut(side) += decided.as_i8() as u32;
            }
            info!(
                match_id = %match_id,
                side = %side,
                value = %decided,
                "Majority decision applied"
            );
        }

        Some(state.snapshot())
    }

    /// Scans the latest-vote tally for `side` in fixed order and returns the
    /// first value at quorum, if any.
    fn majority_decision(state: &MatchState, side: Side) -> Option<PointValue> {
        let mut tally: HashMap<PointValue, u32> = HashMap::new();
        for votes in state.referee_votes.get(side).values() {
            if let Some(last) = votes.last() {
                *tally.entry(*last).or_insert(0) += 1;
            }
        }

        PointValue::iter().find(|value| tally.get(value).copied().unwrap_or(0) >= QUORUM)
    }

    /// Ends the current round: credits the round winner, then either advances
    /// to the next round (resetting per-round state) or concludes the match
    /// and destroys its state.
    ///
    /// Returns `None` if the match does not exist.
    #[instrument(skip(self))]
    pub fn end_round(&self, match_id: &str) -> Option<RoundEndOutcome> {
        let mut matches = self.matches.lock().unwrap();
        let state = match matches.get_mut(match_id) {
            Some(state) => state,
            None => {
                debug!(match_id = %match_id, "End-round for unknown match dropped");
                return None;
            }
        };

        let chong = *state.scores.get(Side::Chong);
        let hong = *state.scores.get(Side::Hong);
        let winner = if chong > hong {
            Some(Side::Chong)
        } else if hong > chong {
            Some(Side::Hong)
        } else {
            None
        };
        if let Some(side) = winner {
            *state.round_wins.get_mut(side) += 1;
        }
        let round_wins = state.round_wins.clone();

        let concluded = round_wins.chong >= WINS_TO_TAKE_MATCH
            || round_wins.hong >= WINS_TO_TAKE_MATCH
            || state.current_round == FINAL_ROUND;

        let transition = if concluded {
            let verdict = if round_wins.chong > round_wins.hong {
                MatchVerdict::Winner(Side::Chong)
            } else if round_wins.hong > round_wins.chong {
                MatchVerdict::Winner(Side::Hong)
            } else {
                MatchVerdict::Draw
            };
            matches.remove(match_id);
            info!(match_id = %match_id, verdict = ?verdict, "Match concluded, state destroyed");
            RoundTransition::MatchOver(verdict)
        } else {
            state.current_round += 1;
            state.reset_round();
            info!(
                match_id = %match_id,
                round = state.current_round,
                "Advanced to next round"
            );
            RoundTransition::NextRound(state.snapshot())
        };

        Some(RoundEndOutcome {
            winner,
            round_wins,
            transition,
        })
    }

    /// Whether live state exists for `match_id`.
    pub fn contains(&self, match_id: &str) -> bool {
        self.matches.lock().unwrap().contains_key(match_id)
    }
}

impl Default for MatchStore {
    fn default() -> Self {
        Self::new()
    }
}
