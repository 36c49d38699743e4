//! Evaluation mode for watching a trained agent
//!
//! Loads a persisted value table and lets the agent play one rendered game
//! with a greedy policy. Users can control playback speed, pause, and start
//! another game once the bird has crashed.
//!
//! # Controls
//!
//! - P: Pause/unpause
//! - R: Restart
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit
//!
//! # Example
//!
//! ```rust,no_run
//! use flappy_rl::game::GameConfig;
//! use flappy_rl::modes::EvaluateMode;
//! use std::path::Path;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut evaluate_mode =
//!     EvaluateMode::new(Path::new("qlearning.json"), GameConfig::default(), None, 60)?;
//! evaluate_mode.run().await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{anyhow, Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{stderr, Stderr},
    path::Path,
    time::Duration,
};
use tokio::time::{interval, Interval};

use super::human::tick_interval;
use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction};
use crate::render::{Hud, Renderer};
use crate::rl::{load_table, FlappyEnvironment, QAgent, QLearningConfig, StateKey};

/// Playback speed settings, relative to the configured frame rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizationSpeed {
    /// A quarter of the base rate
    Slow,
    /// The base rate
    Normal,
    /// Twice the base rate
    Fast,
    /// Four times the base rate
    VeryFast,
}

impl VisualizationSpeed {
    /// Map a 1-4 preset key to a speed
    pub fn from_preset(preset: u8) -> Option<Self> {
        match preset {
            1 => Some(Self::Slow),
            2 => Some(Self::Normal),
            3 => Some(Self::Fast),
            4 => Some(Self::VeryFast),
            _ => None,
        }
    }

    /// Get the tick interval for this speed given the normal interval
    pub fn tick_interval(&self, base: Duration) -> Duration {
        let interval = match self {
            Self::Slow => base * 4,
            Self::Normal => base,
            Self::Fast => base / 2,
            Self::VeryFast => base / 4,
        };
        interval.max(Duration::from_millis(1))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

/// Evaluation mode for watching a trained agent
pub struct EvaluateMode {
    /// Greedy agent holding the loaded table
    agent: QAgent,

    env: FlappyEnvironment,

    /// Observation of the current state
    observation: StateKey,

    renderer: Renderer,
    input_handler: InputHandler,

    /// Interval at normal speed
    base_interval: Duration,

    should_quit: bool,
    paused: bool,
    speed: VisualizationSpeed,

    /// Number of games finished
    games_played: usize,
}

impl EvaluateMode {
    /// Create a new evaluation mode
    ///
    /// A missing table file starts the agent with an empty table. A table
    /// that exists but cannot be read or parsed is an error.
    pub fn new(
        table_path: &Path,
        config: GameConfig,
        seed: Option<u64>,
        fps: u32,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid game configuration: {}", e))?;

        let mut agent = QAgent::new(QLearningConfig::greedy());
        match load_table(table_path)
            .with_context(|| format!("Failed to load value table from {:?}", table_path))?
        {
            Some(table) => {
                tracing::info!("Loaded {} states from {:?}", table.len(), table_path);
                agent.load_table(table);
            }
            None => {
                tracing::info!(
                    "No value table at {:?}, evaluating an untrained agent",
                    table_path
                );
            }
        }

        let mut env = match seed {
            Some(seed) => FlappyEnvironment::with_seed(config, seed),
            None => FlappyEnvironment::new(config),
        };
        let observation = env.reset();

        Ok(Self {
            agent,
            env,
            observation,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            base_interval: tick_interval(fps),
            should_quit: false,
            paused: false,
            speed: VisualizationSpeed::Normal,
            games_played: 0,
        })
    }

    /// Run the evaluation loop
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_evaluation_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        println!(
            "Games played: {} | Last score: {}",
            self.games_played,
            self.env.score()
        );

        result
    }

    async fn run_evaluation_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.speed.tick_interval(self.base_interval));

        // Render at 30 FPS independent of playback speed
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.step_agent();
                    }
                }

                _ = render_timer.tick() => {
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.env.state(), self.env.config(), &hud);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Advance the game by one greedy action; a finished game stays on screen
    fn step_agent(&mut self) {
        if !self.env.state().is_alive {
            return;
        }

        let action = self.agent.greedy_action(&self.observation);
        let (next, _reward, done) = self.env.step_action(action);
        self.observation = next;

        if done {
            self.games_played += 1;
        }
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Quit => self.should_quit = true,
                KeyAction::Pause => self.paused = !self.paused,
                KeyAction::Restart => self.restart(),
                KeyAction::Speed(preset) => {
                    if let Some(speed) = VisualizationSpeed::from_preset(preset) {
                        self.change_speed(speed, tick_timer);
                    }
                }
                KeyAction::Jump | KeyAction::None => {}
            }
        }
    }

    fn restart(&mut self) {
        self.observation = self.env.reset();
        self.paused = false;
    }

    fn change_speed(&mut self, new_speed: VisualizationSpeed, tick_timer: &mut Interval) {
        self.speed = new_speed;
        *tick_timer = interval(self.speed.tick_interval(self.base_interval));
    }

    fn hud(&self) -> Hud {
        let status = if self.paused { "Paused" } else { self.speed.as_str() };
        Hud {
            stats: vec![
                ("Score", self.env.score().to_string()),
                ("Games", self.games_played.to_string()),
                ("States", self.agent.table().len().to_string()),
                ("Speed", status.to_string()),
            ],
            controls: vec![
                ("P", "Pause"),
                ("1-4", "Speed"),
                ("R", "Restart"),
                ("Q/Esc", "Quit"),
            ],
            game_over_hint: Some("Press R to watch again or Q to quit"),
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
