use std::time::{Duration, Instant};

/// Stats for an interactive session spanning several games
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    total_score: u64,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            total_score: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        self.total_score += u64::from(final_score);
        self.high_score = self.high_score.max(final_score);
    }

    /// Mean score over finished games
    pub fn mean_score(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.total_score as f64 / f64::from(self.games_played)
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }

    /// Header entries for the renderer
    pub fn hud_stats(&self, score: u32) -> Vec<(&'static str, String)> {
        vec![
            ("Score", score.to_string()),
            ("Best", self.high_score.to_string()),
            ("Games", self.games_played.to_string()),
            ("Mean", format!("{:.1}", self.mean_score())),
            ("Time", self.format_time()),
        ]
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
