use std::sync::Arc;

use crate::application::player_service::PlayerService;

#[derive(Clone)]
pub struct AppState {
    pub player_service: Arc<PlayerService>,
    /// When set, create and update require an `x-session-ticket` header.
    pub require_session_ticket: bool,
}

impl AppState {
    pub fn new(player_service: Arc<PlayerService>, require_session_ticket: bool) -> Self {
        Self {
            player_service,
            require_session_ticket,
        }
    }
}
