use std::sync::Arc;

use laneboard_core::{ActivityStore, Authenticator, BoardService, Config, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    board: BoardService,
    activity_store: Arc<dyn ActivityStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        board: BoardService,
        activity_store: Arc<dyn ActivityStore>,
    ) -> Self {
        Self {
            config,
            authenticator,
            board,
            activity_store,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn board(&self) -> &BoardService {
        &self.board
    }

    pub fn activity_store(&self) -> &dyn ActivityStore {
        self.activity_store.as_ref()
    }
}
