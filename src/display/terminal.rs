// src/display/terminal.rs
//! Terminal front end: draws the view model and turns keys into commands

use crate::{
    error::{GameError, Result},
    game::{
        view::{CachePopup, Glyph, NeighborhoodView, StatusLine},
        Direction,
    },
    location::LocationEvent,
    session::{Command, GameSession},
};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::io::{self, Write};
use tokio::sync::mpsc;

/// What a key press means to the front end
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Command(Command),
    /// Ask before resetting
    RequestReset,
    Quit,
}

/// Map a key to its action; unknown keys do nothing
pub fn action_for_key(key: &KeyEvent) -> Option<KeyAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyAction::Quit);
    }

    let action = match key.code {
        KeyCode::Up | KeyCode::Char('w') => KeyAction::Command(Command::Move(Direction::North)),
        KeyCode::Down | KeyCode::Char('s') => KeyAction::Command(Command::Move(Direction::South)),
        KeyCode::Right | KeyCode::Char('d') => KeyAction::Command(Command::Move(Direction::East)),
        KeyCode::Left | KeyCode::Char('a') => KeyAction::Command(Command::Move(Direction::West)),
        KeyCode::Char('c') => KeyAction::Command(Command::Collect),
        KeyCode::Char('x') => KeyAction::Command(Command::Deposit),
        KeyCode::Char('g') => KeyAction::Command(Command::ToggleTracking),
        KeyCode::Char('r') => KeyAction::RequestReset,
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => return None,
    };
    Some(action)
}

pub fn glyph_char(glyph: Glyph) -> (char, Color) {
    match glyph {
        Glyph::Player => ('@', Color::Yellow),
        Glyph::PlayerOnCache => ('&', Color::Yellow),
        Glyph::Cache => ('$', Color::Green),
        Glyph::EmptyCache => ('o', Color::DarkGrey),
        Glyph::Nothing => ('.', Color::DarkGrey),
    }
}

pub struct TerminalDisplay {
    message: Option<String>,
    confirming_reset: bool,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            message: None,
            confirming_reset: false,
        }
    }

    /// Run the UI until the player quits.
    ///
    /// Keys and location events share one loop, so each one is fully
    /// applied (and saved) before the next is looked at.
    pub async fn run(
        &mut self,
        session: &mut GameSession,
        mut locations: mpsc::UnboundedReceiver<LocationEvent>,
    ) -> Result<()> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, Hide, DisableLineWrap)?;

        let mut keys = spawn_key_reader();
        let result = self.event_loop(session, &mut keys, &mut locations, &mut stdout).await;

        execute!(stdout, Show, EnableLineWrap, Clear(ClearType::All), MoveTo(0, 0))?;
        terminal::disable_raw_mode()?;
        println!("Shutting down...");
        result
    }

    async fn event_loop(
        &mut self,
        session: &mut GameSession,
        keys: &mut mpsc::UnboundedReceiver<KeyEvent>,
        locations: &mut mpsc::UnboundedReceiver<LocationEvent>,
        stdout: &mut impl Write,
    ) -> Result<()> {
        loop {
            self.render(stdout, session)?;

            tokio::select! {
                key = keys.recv() => {
                    let Some(key) = key else { return Ok(()) };
                    if !self.on_key(session, &key).await {
                        return Ok(());
                    }
                }
                Some(event) = locations.recv() => {
                    if let Some(message) = session.handle(Command::Location(event)).await {
                        self.message = Some(message);
                    }
                }
            }
        }
    }

    /// Returns false when the player asked to quit
    async fn on_key(&mut self, session: &mut GameSession, key: &KeyEvent) -> bool {
        if self.confirming_reset {
            self.confirming_reset = false;
            let confirmed = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
            self.message = session.handle(Command::Reset { confirmed }).await;
            return true;
        }

        match action_for_key(key) {
            Some(KeyAction::Quit) => false,
            Some(KeyAction::RequestReset) => {
                self.confirming_reset = true;
                self.message = Some("Erase all progress and start over? (y/n)".to_string());
                true
            }
            Some(KeyAction::Command(command)) => {
                self.message = session.handle(command).await;
                true
            }
            None => true,
        }
    }

    /// Draw the whole screen
    fn render(&self, stdout: &mut impl Write, session: &GameSession) -> Result<()> {
        queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

        let state = session.state();
        let view = NeighborhoodView::from_state(state);
        let width = view.rows.first().map_or(0, |row| row.len() * 2);

        queue!(
            stdout,
            SetForegroundColor(Color::Green),
            Print("=".repeat(width.max(40))),
            Print("\r\nGeocoin\r\n"),
            Print("=".repeat(width.max(40))),
            Print("\r\n"),
            ResetColor
        )?;

        for row in &view.rows {
            for glyph in row {
                let (symbol, color) = glyph_char(*glyph);
                queue!(stdout, SetForegroundColor(color), Print(symbol), Print(' '))?;
            }
            queue!(stdout, ResetColor, Print("\r\n"))?;
        }

        self.render_status(stdout, session)?;
        self.render_popup(stdout, session)?;

        if let Some(ref message) = self.message {
            queue!(
                stdout,
                SetForegroundColor(Color::Magenta),
                Print(format!("\r\n{}\r\n", message)),
                ResetColor
            )?;
        }

        queue!(
            stdout,
            SetForegroundColor(Color::DarkGrey),
            Print("\r\narrows/wasd move  c collect  x deposit  g geolocate  r reset  q quit\r\n"),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    fn render_status(&self, stdout: &mut impl Write, session: &GameSession) -> Result<()> {
        let status = StatusLine::from_state(session.state());

        queue!(
            stdout,
            SetForegroundColor(Color::Yellow),
            Print("\r\nPLAYER:\r\n"),
            ResetColor,
            Print(format!("  Position:  {}\r\n", status.position)),
            Print(format!("  Cell:      {}\r\n", status.cell)),
            Print(format!("  Inventory: {}\r\n", status.inventory)),
        )?;

        let tracking = match (session.is_tracking(), session.last_fix()) {
            (true, Some(fix)) => format!("{} ({}s ago)", fix.describe(), fix.age_seconds()),
            (true, None) => "waiting for fix".to_string(),
            (false, _) => "off".to_string(),
        };
        queue!(stdout, Print(format!("  Geolocate: {}\r\n", tracking)))?;
        Ok(())
    }

    fn render_popup(&self, stdout: &mut impl Write, session: &GameSession) -> Result<()> {
        let cell = session.state().current_cell();
        let Some(popup) = CachePopup::for_cell(session.state(), &cell) else {
            return Ok(());
        };

        queue!(
            stdout,
            SetForegroundColor(Color::Cyan),
            Print(format!("\r\n{}\r\n", popup.title)),
            ResetColor,
            SetForegroundColor(Color::DarkGrey),
            Print(format!("  {}\r\n", popup.area)),
            ResetColor
        )?;
        for coin in popup.coins.iter().take(10) {
            queue!(stdout, Print(format!("  {}\r\n", coin)))?;
        }
        if popup.coins.len() > 10 {
            queue!(stdout, Print(format!("  ... {} more\r\n", popup.coins.len() - 10)))?;
        }

        let mut actions = Vec::new();
        if popup.can_collect {
            actions.push("[c] collect");
        }
        if popup.can_deposit {
            actions.push("[x] deposit");
        }
        if !actions.is_empty() {
            queue!(stdout, Print(format!("  {}\r\n", actions.join("  "))))?;
        }
        Ok(())
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward key presses from a blocking reader thread into the async loop
fn spawn_key_reader() -> mpsc::UnboundedReceiver<KeyEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if tx.send(key).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Terminal input failed: {}", GameError::Io(e));
                break;
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(
            action_for_key(&key(KeyCode::Up)),
            Some(KeyAction::Command(Command::Move(Direction::North)))
        );
        assert_eq!(
            action_for_key(&key(KeyCode::Char('a'))),
            Some(KeyAction::Command(Command::Move(Direction::West)))
        );
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(action_for_key(&key(KeyCode::Char('c'))), Some(KeyAction::Command(Command::Collect)));
        assert_eq!(action_for_key(&key(KeyCode::Char('x'))), Some(KeyAction::Command(Command::Deposit)));
        assert_eq!(action_for_key(&key(KeyCode::Char('r'))), Some(KeyAction::RequestReset));
        assert_eq!(action_for_key(&key(KeyCode::Char('q'))), Some(KeyAction::Quit));
        assert_eq!(action_for_key(&key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(&ctrl_c), Some(KeyAction::Quit));
    }

    #[tokio::test]
    async fn test_reset_asks_first() {
        use crate::{config::GameConfig, storage::MemoryStore};

        let config = GameConfig::default();
        let mut session = GameSession::new(config, Box::new(MemoryStore::new()));
        let mut display = TerminalDisplay::new();

        display.on_key(&mut session, &key(KeyCode::Up)).await;
        display.on_key(&mut session, &key(KeyCode::Char('r'))).await;
        assert!(display.confirming_reset);

        display.on_key(&mut session, &key(KeyCode::Char('n'))).await;
        assert_eq!(session.state().player.history.len(), 2);
        assert_eq!(display.message.as_deref(), Some("Reset cancelled"));

        display.on_key(&mut session, &key(KeyCode::Char('r'))).await;
        display.on_key(&mut session, &key(KeyCode::Char('y'))).await;
        assert_eq!(session.state().player.history.len(), 1);
    }

    #[test]
    fn test_render_draws_player() {
        use crate::{config::GameConfig, storage::MemoryStore};

        let session = GameSession::new(GameConfig::default(), Box::new(MemoryStore::new()));
        let mut out = Vec::new();
        TerminalDisplay::new().render(&mut out, &session).unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('@'));
        assert!(text.contains("Inventory: No coins"));
    }
}
