use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// The two competitor corners of a taekwondo match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Chong,
    Hong,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Chong => Side::Hong,
            Side::Hong => Side::Chong,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Chong => write!(f, "chong"),
            Side::Hong => write!(f, "hong"),
        }
    }
}

/// Role a subscriber declares when joining a match channel.
///
/// Only the scoreboard role may create a match; anything unrecognized
/// falls back to a passive viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Scoreboard,
    Referee,
    Viewer,
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        match raw {
            "scoreboard" => Role::Scoreboard,
            "referee" => Role::Referee,
            _ => Role::Viewer,
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from(raw.as_str()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Scoreboard => write!(f, "scoreboard"),
            Role::Referee => write!(f, "referee"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

/// A point value a referee may cast.
///
/// Declaration order is the quorum scan order: scoring values ascending,
/// penalty last. `Penalty` awards one point to the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum PointValue {
    One,
    Two,
    Three,
    Four,
    Five,
    Penalty,
}

impl PointValue {
    pub fn as_i8(&self) -> i8 {
        match self {
            PointValue::One => 1,
            PointValue::Two => 2,
            PointValue::Three => 3,
            PointValue::Four => 4,
            PointValue::Five => 5,
            PointValue::Penalty => -1,
        }
    }
}

impl TryFrom<i8> for PointValue {
    type Error = i8;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PointValue::One),
            2 => Ok(PointValue::Two),
            3 => Ok(PointValue::Three),
            4 => Ok(PointValue::Four),
            5 => Ok(PointValue::Five),
            -1 => Ok(PointValue::Penalty),
            other => Err(other),
        }
    }
}

impl fmt::Display for PointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

impl Serialize for PointValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

impl<'de> Deserialize<'de> for PointValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i8::deserialize(deserializer)?;
        PointValue::try_from(raw)
            .map_err(|v| serde::de::Error::custom(format!("point value out of domain: {}", v)))
    }
}

/// A pair of per-side values, serialized as `{"chong": .., "hong": ..}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SidePair<T> {
    pub chong: T,
    pub hong: T,
}

impl<T> SidePair<T> {
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Chong => &self.chong,
            Side::Hong => &self.hong,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Chong => &mut self.chong,
            Side::Hong => &mut self.hong,
        }
    }
}

/// Per-round counters of votes cast for each point value.
///
/// Serialized with the raw values as keys, matching the wire format:
/// `{"1": 0, "2": 0, "3": 0, "4": 0, "5": 0, "-1": 0}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCounts {
    #[serde(rename = "1")]
    pub one: u32,
    #[serde(rename = "2")]
    pub two: u32,
    #[serde(rename = "3")]
    pub three: u32,
    #[serde(rename = "4")]
    pub four: u32,
    #[serde(rename = "5")]
    pub five: u32,
    #[serde(rename = "-1")]
    pub penalty: u32,
}

impl ScoreCounts {
    pub fn record(&mut self, value: PointValue) {
        *self.counter_mut(value) += 1;
    }

    pub fn get(&self, value: PointValue) -> u32 {
        match value {
            PointValue::One => self.one,
            PointValue::Two => self.two,
            PointValue::Three => self.three,
            PointValue::Four => self.four,
            PointValue::Five => self.five,
            PointValue::Penalty => self.penalty,
        }
    }

    fn counter_mut(&mut self, value: PointValue) -> &mut u32 {
        match value {
            PointValue::One => &mut self.one,
            PointValue::Two => &mut self.two,
            PointValue::Three => &mut self.three,
            PointValue::Four => &mut self.four,
            PointValue::Five => &mut self.five,
            PointValue::Penalty => &mut self.penalty,
        }
    }
}

/// Per-referee vote sequences for the current round, keyed by referee id.
/// Append-only within a round; only the last entry counts toward quorum.
pub type RefereeVotes = HashMap<String, Vec<PointValue>>;

/// Live state of a single match.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub scores: SidePair<u32>,
    pub round_wins: SidePair<u8>,
    pub current_round: u8,
    pub referee_votes: SidePair<RefereeVotes>,
    pub score_counts: SidePair<ScoreCounts>,
}

impl MatchState {
    /// Fresh match at the start of round 1.
    pub fn new() -> Self {
        Self {
            scores: SidePair::default(),
            round_wins: SidePair::default(),
            current_round: 1,
            referee_votes: SidePair::default(),
            score_counts: SidePair::default(),
        }
    }

    /// The broadcastable view of this match.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            scores: self.scores.clone(),
            round_wins: self.round_wins.clone(),
            current_round: self.current_round,
            score_counts: self.score_counts.clone(),
        }
    }

    /// Clears all per-round state. Round wins and the round counter are
    /// untouched.
    pub fn reset_round(&mut self) {
        self.scores = SidePair::default();
        self.referee_votes = SidePair::default();
        self.score_counts = SidePair::default();
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Full-state view sent to subscribers after joins, votes and round advances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub scores: SidePair<u32>,
    pub round_wins: SidePair<u8>,
    pub current_round: u8,
    pub score_counts: SidePair<ScoreCounts>,
}
