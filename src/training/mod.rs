//! # Episodic Training Loop
//!
//! Drives a [`DeepQAgent`] against an [`Environment`]:
//!
//! 1. Reset the environment and tell it the episode number
//! 2. Act epsilon-greedily, store every transition
//! 3. Once `learnStart` steps have elapsed, learn on one mini-batch per
//!    step, bootstrapping from the target network only after the first
//!    target sync period has passed
//! 4. Sync the target network every `updateTargetNetwork` steps
//! 5. Decay the exploration rate after every episode
//!
//! Checkpoints (weights plus a resumable parameter file) are written every
//! `checkpoint_every` epochs.

pub mod checkpoint;
pub mod config;
pub mod stats;

pub use checkpoint::Checkpoint;
pub use config::TrainingConfig;
pub use stats::EpisodeStats;

use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::agent::DeepQAgent;
use crate::environment::Environment;
use crate::error::Result;

/// Result of a call to [`TrainingLoop::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub last_epoch: usize,
    pub total_steps: usize,
    pub final_exploration_rate: f32,
    pub highest_reward: f32,
    pub highest_collision_reward: f32,
    pub last_scores_mean: f32,
    /// At least `SCORE_WINDOW` episodes have been recorded.
    pub score_window_filled: bool,
}

pub struct TrainingLoop {
    config: TrainingConfig,
    agent: DeepQAgent,
    exploration_rate: f32,
    step_counter: usize,
    stats: EpisodeStats,
}

impl TrainingLoop {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let agent = DeepQAgent::new(config.agent_config())?;
        let exploration_rate = config.exploration_rate;
        Ok(TrainingLoop {
            config,
            agent,
            exploration_rate,
            step_counter: 0,
            stats: EpisodeStats::new(),
        })
    }

    /// Continue a run from a checkpoint written by this loop.
    ///
    /// Only the online network is restored. The target network keeps its
    /// fresh initialization until the first sync, and the replay memory
    /// starts empty.
    pub fn resume<P: AsRef<Path>, W: AsRef<Path>>(params_path: P, weights_path: W) -> Result<Self> {
        let config = TrainingConfig::load(params_path)?;
        let mut training = Self::new(config)?;
        training.agent.load_weights(weights_path)?;
        info!(
            "Resuming from epoch {} with exploration rate {:.2}",
            training.config.current_epoch, training.exploration_rate
        );
        Ok(training)
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn agent(&self) -> &DeepQAgent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut DeepQAgent {
        &mut self.agent
    }

    pub fn exploration_rate(&self) -> f32 {
        self.exploration_rate
    }

    /// Steps taken so far. The final step of each episode is not counted.
    pub fn step_counter(&self) -> usize {
        self.step_counter
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    /// Run epochs `current_epoch + 1 ..= epochs`.
    pub fn run<E: Environment>(&mut self, env: &mut E) -> Result<TrainingSummary> {
        let start = Instant::now();
        let first_epoch = self.config.current_epoch + 1;
        info!(
            "Training {} with {} for epochs {}..={}",
            self.config.run_name,
            self.agent.value_function().topology().describe(),
            first_epoch,
            self.config.epochs
        );

        for epoch in first_epoch..=self.config.epochs {
            self.run_episode(env, epoch, &start)?;
            self.config.current_epoch = epoch;
            self.exploration_rate = (self.exploration_rate * self.config.exploration_decay)
                .max(self.config.exploration_min);
        }

        Ok(TrainingSummary {
            episodes: self.stats.episodes,
            last_epoch: self.config.current_epoch,
            total_steps: self.step_counter,
            final_exploration_rate: self.exploration_rate,
            highest_reward: self.stats.highest_reward,
            highest_collision_reward: self.stats.highest_collision_reward,
            last_scores_mean: self.stats.last_scores_mean(),
            score_window_filled: self.stats.window_filled(),
        })
    }

    fn run_episode<E: Environment>(&mut self, env: &mut E, epoch: usize, start: &Instant) -> Result<()> {
        let mut observation = env.reset()?;
        env.set_episode(epoch);

        let mut cumulated_reward = 0.0;
        let mut cumulated_collision_reward = 0.0;

        for t in 0..self.config.steps {
            let q_values = self.agent.q_values(observation.view());
            let action = self.agent.select_action_from_q(q_values.view(), self.exploration_rate);
            let step = env.step(action)?;

            cumulated_collision_reward += step.info.collision_reward;
            cumulated_reward += step.reward;
            self.stats.observe_rewards(cumulated_reward, cumulated_collision_reward);

            self.agent.add_memory(observation, action, step.reward, step.observation.clone(), step.done);

            if self.step_counter >= self.config.learn_start {
                let use_target = self.step_counter > self.config.update_target_network;
                if let Some(loss) = self.agent.learn_on_mini_batch(self.config.minibatch_size, use_target) {
                    self.stats.record_loss(loss);
                }
            }

            observation = step.observation;

            let done = step.done || t >= self.config.max_episode_steps;
            if done {
                self.finish_episode(epoch, t, cumulated_reward, cumulated_collision_reward, start)?;
                return Ok(());
            }

            self.step_counter += 1;
            if self.step_counter % self.config.update_target_network == 0 {
                self.agent.update_target_network();
                info!("Updating target network at step {}", self.step_counter);
            }
        }

        debug!("Epoch {} used all {} steps without finishing", epoch, self.config.steps);
        Ok(())
    }

    fn finish_episode(
        &mut self,
        epoch: usize,
        t: usize,
        cumulated_reward: f32,
        cumulated_collision_reward: f32,
        start: &Instant,
    ) -> Result<()> {
        let window_wrapped = self.stats.record_episode(t);

        let elapsed = start.elapsed().as_secs();
        let (h, m, s) = (elapsed / 3600, (elapsed / 60) % 60, elapsed % 60);
        let loss = self
            .stats
            .take_mean_loss()
            .map_or_else(|| "-".to_string(), |loss| format!("{:.4}", loss));
        if window_wrapped {
            info!(
                "EP {} - {} timesteps - score window complete - Cumulated R: {} - Collision R: {} - Loss: {} Eps={:.2}",
                epoch,
                t + 1,
                cumulated_reward,
                cumulated_collision_reward,
                loss,
                self.exploration_rate
            );
        } else {
            info!(
                "EP {} - {} timesteps - last100 Steps: {} - Cumulated R: {} - Collision R: {} - Loss: {} Eps={:.2} Time: {}:{:02}:{:02}",
                epoch,
                t + 1,
                self.stats.last_scores_mean(),
                cumulated_reward,
                cumulated_collision_reward,
                loss,
                self.exploration_rate,
                h,
                m,
                s
            );
        }

        if epoch % self.config.checkpoint_every == 0 {
            Checkpoint::for_epoch(&self.config.output_dir, &self.config.run_name, epoch).write(
                &self.agent,
                &self.config,
                epoch,
                self.exploration_rate,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Step, StepInfo};
    use ndarray::Array1;

    /// Two-state chain: terminates after `length` steps regardless of action.
    struct FixedLength {
        length: usize,
        t: usize,
        episodes_seen: Vec<usize>,
    }

    impl Environment for FixedLength {
        fn reset(&mut self) -> Result<Array1<f32>> {
            self.t = 0;
            Ok(Array1::zeros(3))
        }

        fn step(&mut self, _action: usize) -> Result<Step> {
            self.t += 1;
            Ok(Step {
                observation: Array1::from_elem(3, self.t as f32 / 10.0),
                reward: 1.0,
                done: self.t >= self.length,
                info: StepInfo::default(),
            })
        }

        fn set_episode(&mut self, episode: usize) {
            self.episodes_seen.push(episode);
        }
    }

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            epochs: 3,
            steps: 100,
            update_target_network: 4,
            minibatch_size: 3,
            learn_start: 2,
            memory_size: 50,
            network_inputs: 3,
            network_outputs: 2,
            network_structure: vec![8],
            seed: Some(5),
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_episode_bookkeeping() {
        let mut env = FixedLength { length: 5, t: 0, episodes_seen: Vec::new() };
        let mut training = TrainingLoop::new(small_config()).unwrap();
        let summary = training.run(&mut env).unwrap();

        assert_eq!(env.episodes_seen, vec![1, 2, 3]);
        assert_eq!(summary.episodes, 3);
        assert_eq!(summary.last_epoch, 3);
        // Every transition is stored, the final step of an episode is not counted
        assert_eq!(training.agent().memory().size(), 15);
        assert_eq!(summary.total_steps, 12);
        assert!((summary.final_exploration_rate - 0.995f32.powi(3)).abs() < 1e-6);
        assert_eq!(summary.highest_reward, 5.0);
        assert!(!summary.score_window_filled);
    }

    #[test]
    fn test_score_window_wrap_keeps_checkpointing() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = FixedLength { length: 2, t: 0, episodes_seen: Vec::new() };
        let config = TrainingConfig {
            epochs: stats::SCORE_WINDOW + 1,
            checkpoint_every: 50,
            output_dir: dir.path().to_path_buf(),
            run_name: "wrap".to_string(),
            ..small_config()
        };
        let mut training = TrainingLoop::new(config).unwrap();
        let summary = training.run(&mut env).unwrap();

        assert!(summary.score_window_filled);
        assert_eq!(summary.episodes, stats::SCORE_WINDOW + 1);
        // Episode 100 wraps the window and is still checkpointed
        for epoch in [50, 100] {
            let checkpoint = Checkpoint::for_epoch(dir.path(), "wrap", epoch);
            assert!(checkpoint.weights_path.exists());
            assert!(checkpoint.params_path.exists());
        }
    }

    #[test]
    fn test_episode_cut_at_max_steps() {
        let mut env = FixedLength { length: usize::MAX, t: 0, episodes_seen: Vec::new() };
        let config = TrainingConfig { epochs: 1, max_episode_steps: 7, ..small_config() };
        let mut training = TrainingLoop::new(config).unwrap();
        training.run(&mut env).unwrap();
        // Steps 0..=7 run before the cut
        assert_eq!(training.agent().memory().size(), 8);
    }

    #[test]
    fn test_exploration_floor() {
        let mut env = FixedLength { length: 1, t: 0, episodes_seen: Vec::new() };
        let config = TrainingConfig {
            epochs: 5,
            exploration_rate: 0.1,
            exploration_decay: 0.5,
            exploration_min: 0.05,
            ..small_config()
        };
        let mut training = TrainingLoop::new(config).unwrap();
        let summary = training.run(&mut env).unwrap();
        assert_eq!(summary.final_exploration_rate, 0.05);
    }
}
