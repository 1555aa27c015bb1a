//! Write intents produced by the core and executed by the caller through storage.

use crate::models::{GameMatch, MatchId, MatchUpdate};
use crate::storage::{StoreError, TournamentStore};
use serde::Serialize;

/// A single `update_match` call to perform.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchCommand {
    pub match_id: MatchId,
    pub update: MatchUpdate,
}

impl MatchCommand {
    pub fn new(match_id: impl Into<MatchId>, update: MatchUpdate) -> Self {
        Self {
            match_id: match_id.into(),
            update,
        }
    }

    /// Run the update against `store`; storage errors come back unchanged.
    pub fn execute<S: TournamentStore + ?Sized>(&self, store: &S) -> Result<GameMatch, StoreError> {
        log::debug!("updating match {}: {:?}", self.match_id, self.update);
        store.update_match(&self.match_id, &self.update)
    }
}
