//! App: terminal init, main loop, drop timer and key handling.

use crate::game::{DropOutcome, GameState, Status};
use crate::input::{key_to_action, Action};
use crate::piece::Rotation;
use crate::theme::Theme;
use crate::GameConfig;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Render cadence (~60 FPS).
const FRAME_MS: u64 = 16;
/// How long the score stays highlighted after a line clear.
const SCORE_FLASH_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    GameOver,
}

/// Accumulates frame time and fires once the total exceeds the drop interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTimer {
    interval: Duration,
    accumulated: Duration,
}

impl DropTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
        }
    }

    /// Add `elapsed`; true when the piece is due to fall.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.accumulated += elapsed;
        self.accumulated > self.interval
    }

    /// Any drop, manual or automatic, restarts the count.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}

pub struct App {
    theme: Theme,
    state: GameState,
    screen: Screen,
    paused: bool,
    drop_timer: DropTimer,
    score_flash_until: Option<Instant>,
    /// TachyonFX fade for the game-over panel (created on first draw of that screen).
    game_over_effect: Option<Effect>,
    /// Last time we processed the game-over effect (for delta).
    game_over_effect_time: Option<Instant>,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme, no_menu: bool) -> Self {
        let mut app = Self {
            theme,
            state: GameState::new(config.width, config.height, config.seed),
            screen: Screen::Start,
            paused: false,
            drop_timer: DropTimer::new(Duration::from_millis(config.drop_interval_ms)),
            score_flash_until: None,
            game_over_effect: None,
            game_over_effect_time: None,
        };
        if no_menu {
            app.start_game();
        }
        app
    }

    fn start_game(&mut self) {
        self.state.reset();
        self.screen = Screen::Playing;
        self.paused = false;
        self.drop_timer.reset();
        self.sync_game_over();
    }

    /// Leave the playing screen once the engine reports game over.
    fn sync_game_over(&mut self) {
        if self.screen == Screen::Playing && self.state.status() == Status::GameOver {
            self.screen = Screen::GameOver;
            self.paused = false;
            self.game_over_effect = None;
            self.game_over_effect_time = None;
        }
    }

    /// Bookkeeping shared by manual and timed drops.
    fn after_drop(&mut self, outcome: DropOutcome) {
        if let DropOutcome::Locked { lines } = outcome {
            if lines > 0 {
                let flash = Duration::from_millis(SCORE_FLASH_MS);
                self.score_flash_until = Some(Instant::now() + flash);
            }
        }
        self.drop_timer.reset();
        self.sync_game_over();
    }

    /// Apply one action. Returns true when the app should exit.
    pub fn handle_action(&mut self, action: Action) -> bool {
        if action == Action::Quit {
            return true;
        }
        match self.screen {
            Screen::Start => {
                if action == Action::Confirm {
                    self.start_game();
                }
            }
            Screen::Playing if self.paused => {
                if action == Action::Pause {
                    self.paused = false;
                }
            }
            Screen::Playing => match action {
                Action::Pause => self.paused = true,
                Action::MoveLeft => self.state.move_left(),
                Action::MoveRight => self.state.move_right(),
                Action::RotateCw => {
                    self.state.rotate(Rotation::Clockwise);
                }
                Action::RotateCcw => {
                    self.state.rotate(Rotation::CounterClockwise);
                }
                Action::SoftDrop => {
                    let outcome = self.state.soft_drop();
                    self.after_drop(outcome);
                }
                Action::Confirm | Action::Quit | Action::None => {}
            },
            Screen::GameOver => {
                if action == Action::Confirm {
                    self.screen = Screen::Start;
                }
            }
        }
        false
    }

    /// Advance the drop timer by `elapsed` and apply gravity when it fires.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.screen != Screen::Playing || self.paused {
            return;
        }
        if self.drop_timer.advance(elapsed) {
            let outcome = self.state.tick();
            self.after_drop(outcome);
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{
                disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let result = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))
            .map_err(anyhow::Error::from)
            .and_then(|mut terminal| self.run_loop(&mut terminal));

        // Restore
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut last_frame = Instant::now();
        loop {
            let now = Instant::now();
            let score_flash = self.score_flash_until.is_some_and(|t| now < t);
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    self.screen,
                    &self.state,
                    &self.theme,
                    self.paused,
                    score_flash,
                    &mut self.game_over_effect,
                    &mut self.game_over_effect_time,
                    now,
                )
            })?;

            let timeout = Duration::from_millis(FRAME_MS).saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        // Release/repeat events arrive on some platforms; act on presses only.
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.handle_action(key_to_action(key)) {
                            return Ok(());
                        }
                    }
                }
            }

            let frame_now = Instant::now();
            self.advance(frame_now.duration_since(last_frame));
            last_frame = frame_now;
        }
    }
}
