// src/session.rs
//! Coordination of game state, persistence and the location feed

use crate::{
    config::GameConfig,
    game::{ledger, Direction, GameState, VisibilityReport},
    location::{Fix, LocationEvent, LocationEventKind, LocationSource, LocationTracker, Subscription},
    storage::{self, KeyValueStore},
};

/// Everything the UI can ask the game to do
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Move(Direction),
    Collect,
    Deposit,
    ToggleTracking,
    /// Only a confirmed reset clears anything
    Reset { confirmed: bool },
    Location(LocationEvent),
}

/// Owns the game and applies one command at a time to completion
pub struct GameSession {
    config: GameConfig,
    state: GameState,
    store: Box<dyn KeyValueStore + Send>,
    tracker: Option<LocationTracker>,
    source: Option<LocationSource>,
    subscription: Option<Subscription>,
    last_fix: Option<Fix>,
    visibility: VisibilityReport,
}

impl GameSession {
    /// Resume the saved game, or start a fresh one when there is no usable save
    pub fn new(config: GameConfig, store: Box<dyn KeyValueStore + Send>) -> Self {
        let state = match storage::load_game(&*store, &config) {
            Some(state) => state,
            None => {
                tracing::info!("Starting a fresh world at {}", config.origin());
                GameState::new(&config)
            }
        };

        let mut session = Self {
            config,
            state,
            store,
            tracker: None,
            source: None,
            subscription: None,
            last_fix: None,
            visibility: VisibilityReport::default(),
        };
        session.visibility = session.state.step();
        session.persist();
        session
    }

    /// Enable geolocation through `tracker` reading from `source`
    pub fn with_location(mut self, tracker: LocationTracker, source: LocationSource) -> Self {
        self.tracker = Some(tracker);
        self.source = Some(source);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn visibility(&self) -> &VisibilityReport {
        &self.visibility
    }

    pub fn is_tracking(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn last_fix(&self) -> Option<&Fix> {
        self.last_fix.as_ref()
    }

    /// Apply one command; the returned text is meant for the message line
    pub async fn handle(&mut self, command: Command) -> Option<String> {
        match command {
            Command::Move(direction) => {
                self.state.move_player(direction);
                self.after_move();
                None
            }
            Command::Collect => {
                let cell = self.state.player_cell();
                let moved = ledger::collect(&mut self.state, &cell);
                if moved == 0 {
                    return Some("Nothing to collect here".to_string());
                }
                self.persist();
                Some(format!("Collected {} coins", moved))
            }
            Command::Deposit => {
                let cell = self.state.player_cell();
                let moved = ledger::deposit(&mut self.state, &cell);
                if moved == 0 {
                    return Some("Nothing to deposit here".to_string());
                }
                self.persist();
                Some(format!("Deposited {} coins", moved))
            }
            Command::ToggleTracking => Some(self.toggle_tracking().await),
            Command::Reset { confirmed } => {
                if !confirmed {
                    return Some("Reset cancelled".to_string());
                }
                self.reset();
                Some("World reset".to_string())
            }
            Command::Location(event) => self.apply_location(event),
        }
    }

    /// Stop following the location feed; no fix is applied afterwards
    pub fn stop_tracking(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            tracing::info!("Stopped location subscription {}", subscription.id());
        }
    }

    async fn toggle_tracking(&mut self) -> String {
        if self.subscription.is_some() {
            self.stop_tracking();
            return "Geolocation off".to_string();
        }

        let (Some(tracker), Some(source)) = (self.tracker.as_ref(), self.source.as_ref()) else {
            return "Geolocation is not available: no location source configured".to_string();
        };

        match tracker.start(source).await {
            Ok(subscription) => {
                tracing::info!("Started location subscription {}", subscription.id());
                self.subscription = Some(subscription);
                "Geolocation on".to_string()
            }
            Err(e) => {
                tracing::warn!("Geolocation unavailable: {}", e);
                format!("Geolocation is not available: {}", e)
            }
        }
    }

    fn apply_location(&mut self, event: LocationEvent) -> Option<String> {
        let current = self.subscription.as_ref().map(Subscription::id);
        if current != Some(event.subscription) {
            tracing::debug!("Dropping event from stale subscription {}", event.subscription);
            return None;
        }

        match event.kind {
            LocationEventKind::Fix(fix) => {
                if !self.state.relocate(fix.position) {
                    return None;
                }
                self.last_fix = Some(fix);
                self.after_move();
                None
            }
            LocationEventKind::Error(reason) => {
                tracing::warn!("Location tracking stopped: {}", reason);
                self.stop_tracking();
                self.last_fix = None;
                Some(format!("Geolocation stopped: {}", reason))
            }
        }
    }

    fn after_move(&mut self) {
        self.visibility = self.state.step();
        self.persist();
    }

    fn reset(&mut self) {
        if let Err(e) = storage::clear_game(&mut *self.store) {
            tracing::warn!("Failed to clear saved game: {}", e);
        }
        self.state.reset(&self.config);
        self.visibility = self.state.step();
        self.persist();
        tracing::info!("World reset to {}", self.config.origin());
    }

    fn persist(&mut self) {
        if let Err(e) = storage::save_game(&mut *self.store, &self.state) {
            tracing::warn!("Failed to save game: {}", e);
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.stop_tracking();
    }
}
