use serde::{Serialize, Deserialize};

/// Size of the rolling episode-length window.
pub const SCORE_WINDOW: usize = 100;

/// Tracks episode outcomes across a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// Lengths of the last `SCORE_WINDOW` episodes, written as a ring
    last_scores: Vec<usize>,
    next_score: usize,
    window_filled: bool,

    pub episodes: usize,
    pub highest_reward: f32,
    pub highest_collision_reward: f32,

    loss_sum: f64,
    loss_count: usize,
}

impl EpisodeStats {
    pub fn new() -> Self {
        EpisodeStats {
            last_scores: vec![0; SCORE_WINDOW],
            next_score: 0,
            window_filled: false,
            episodes: 0,
            highest_reward: 0.0,
            highest_collision_reward: 0.0,
            loss_sum: 0.0,
            loss_count: 0,
        }
    }

    /// Record a finished episode. Returns `true` when this episode completed
    /// a full pass over the score window.
    pub fn record_episode(&mut self, length: usize) -> bool {
        self.last_scores[self.next_score] = length;
        self.episodes += 1;
        self.next_score += 1;
        if self.next_score >= SCORE_WINDOW {
            self.next_score = 0;
            self.window_filled = true;
            return true;
        }
        false
    }

    pub fn observe_rewards(&mut self, cumulated_reward: f32, cumulated_collision_reward: f32) {
        self.highest_reward = self.highest_reward.max(cumulated_reward);
        self.highest_collision_reward = self.highest_collision_reward.max(cumulated_collision_reward);
    }

    pub fn record_loss(&mut self, loss: f32) {
        self.loss_sum += loss as f64;
        self.loss_count += 1;
    }

    /// Mean loss since the previous call, if any learning happened.
    pub fn take_mean_loss(&mut self) -> Option<f32> {
        if self.loss_count == 0 {
            return None;
        }
        let mean = (self.loss_sum / self.loss_count as f64) as f32;
        self.loss_sum = 0.0;
        self.loss_count = 0;
        Some(mean)
    }

    /// Mean over the whole window; slots not yet written count as zero.
    pub fn last_scores_mean(&self) -> f32 {
        self.last_scores.iter().sum::<usize>() as f32 / SCORE_WINDOW as f32
    }

    pub fn window_filled(&self) -> bool {
        self.window_filled
    }
}

impl Default for EpisodeStats {
    fn default() -> Self {
        Self::new()
    }
}
