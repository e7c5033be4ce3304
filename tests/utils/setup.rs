use std::sync::Arc;

use tkd_scoreboard::scoring::{MatchStore, Role, ScoringService};
use tkd_scoreboard::websockets::ScoreboardReceiveHandler;

use super::mocks::MockBroadcaster;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub store: Arc<MatchStore>,
    pub scoring: Arc<ScoringService>,
    pub broadcaster: Arc<MockBroadcaster>,
    /// Wire-level entry point, as the socket layer would drive it.
    pub receive_handler: ScoreboardReceiveHandler,
    pub match_id: String,
}

pub struct TestSetupBuilder {
    match_id: String,
    with_scoreboard: bool,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            match_id: "match-123".to_string(),
            with_scoreboard: true,
        }
    }

    pub fn with_match_id(mut self, match_id: &str) -> Self {
        self.match_id = match_id.to_string();
        self
    }

    /// Skip the scoreboard join, leaving the match uncreated.
    pub fn without_match(mut self) -> Self {
        self.with_scoreboard = false;
        self
    }

    pub fn build(self) -> TestSetup {
        let store = Arc::new(MatchStore::new());
        let broadcaster = Arc::new(MockBroadcaster::new());
        let scoring = Arc::new(ScoringService::new(store.clone(), broadcaster.clone()));
        let receive_handler = ScoreboardReceiveHandler::new(scoring.clone());

        if self.with_scoreboard {
            scoring.join(&self.match_id, Role::Scoreboard);
        }

        TestSetup {
            store,
            scoring,
            broadcaster,
            receive_handler,
            match_id: self.match_id,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
