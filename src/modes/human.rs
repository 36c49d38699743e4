use anyhow::{anyhow, Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{Action, GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Hud, Renderer};

/// Frame interval for a target tick rate, never shorter than 1ms
pub fn tick_interval(fps: u32) -> Duration {
    Duration::from_millis((1000 / u64::from(fps.max(1))).max(1))
}

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    tick_interval: Duration,
    should_quit: bool,
    pending_jump: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>, fps: u32) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid game configuration: {}", e))?;

        let mut engine = match seed {
            Some(seed) => GameEngine::with_seed(config, seed),
            None => GameEngine::new(config),
        };
        let state = engine.reset();

        Ok(Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            tick_interval: tick_interval(fps),
            should_quit: false,
            pending_jump: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.tick_interval);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // One simulation step and one frame per tick
                _ = tick_timer.tick() => {
                    if self.state.is_alive {
                        self.update_game();
                    }
                    self.metrics.update();
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, self.engine.config(), &hud);
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

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Jump => self.pending_jump = true,
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::Pause | KeyAction::Speed(_) | KeyAction::None => {}
            }
        }
    }

    fn update_game(&mut self) {
        // Presses between ticks collapse into one jump
        let action = Action::from(std::mem::take(&mut self.pending_jump));
        let result = self.engine.step(&mut self.state, action);

        if result.terminated {
            self.metrics.on_game_over(self.state.score);
        }
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.metrics.on_game_start();
        self.pending_jump = false;
    }

    fn hud(&self) -> Hud {
        Hud {
            stats: self.metrics.hud_stats(self.state.score),
            controls: vec![("Space/Up/W", "Jump"), ("R", "Restart"), ("Q/Esc", "Quit")],
            game_over_hint: Some("Press R to play again or Q to quit"),
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
