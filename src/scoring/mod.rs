// Match state machine and vote aggregation
//
// The store owns all live match state and applies join/vote/round events;
// the service wraps store outcomes with the broadcasts the protocol requires.

// Public API
pub use model::{MatchState, PointValue, Role, ScoreCounts, Side, SidePair, StateSnapshot};
pub use service::ScoringService;
pub use store::{MatchStore, MatchVerdict, RoundEndOutcome, RoundTransition};

// Internal modules
pub mod model;
mod service;
mod store;
