use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::agent::AgentConfig;
use crate::error::{DqnError, Result};
use crate::optimizer::OptimizerKind;

/// Everything a training run needs, also written next to every checkpoint
/// so an interrupted run can be resumed.
///
/// The camel-case keys match the parameter files produced by earlier
/// training scripts. Keys missing from a file take their default value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    /// Maximum number of steps per episode
    pub steps: usize,
    /// Target network sync period, in steps
    #[serde(rename = "updateTargetNetwork")]
    pub update_target_network: usize,
    #[serde(rename = "explorationRate")]
    pub exploration_rate: f32,
    pub minibatch_size: usize,
    #[serde(rename = "learnStart")]
    pub learn_start: usize,
    #[serde(rename = "learningRate")]
    pub learning_rate: f32,
    #[serde(rename = "discountFactor")]
    pub discount_factor: f32,
    #[serde(rename = "memorySize")]
    pub memory_size: usize,
    pub network_inputs: usize,
    pub network_outputs: usize,
    pub network_structure: Vec<usize>,
    /// Last completed epoch; training continues at `current_epoch + 1`
    pub current_epoch: usize,

    pub exploration_decay: f32,
    pub exploration_min: f32,
    /// Episodes are cut once the step index reaches this value
    pub max_episode_steps: usize,
    /// Checkpoint every this many epochs
    pub checkpoint_every: usize,
    pub attention: bool,
    pub optimizer: OptimizerKind,
    pub output_dir: PathBuf,
    pub run_name: String,
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            epochs: 10_000,
            steps: 10_000,
            update_target_network: 10_000,
            exploration_rate: 1.0,
            minibatch_size: 64,
            learn_start: 64,
            learning_rate: 0.00025,
            discount_factor: 0.99,
            memory_size: 1_000_000,
            network_inputs: 118,
            network_outputs: 4,
            network_structure: vec![300, 300],
            current_epoch: 0,
            exploration_decay: 0.995,
            exploration_min: 0.05,
            max_episode_steps: 1000,
            checkpoint_every: 100,
            attention: true,
            optimizer: OptimizerKind::Adam,
            output_dir: PathBuf::from("models"),
            run_name: "turtle_dqn_attention".to_string(),
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            input_size: self.network_inputs,
            output_size: self.network_outputs,
            hidden_layers: self.network_structure.clone(),
            attention: self.attention,
            discount_factor: self.discount_factor,
            learning_rate: self.learning_rate,
            memory_size: self.memory_size,
            learn_start: self.learn_start,
            optimizer: self.optimizer,
            seed: self.seed,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.agent_config().validate()?;
        if self.update_target_network == 0 {
            return Err(DqnError::invalid_parameter("updateTargetNetwork", "must be greater than 0"));
        }
        if self.minibatch_size == 0 {
            return Err(DqnError::invalid_parameter("minibatch_size", "must be greater than 0"));
        }
        // Learning begins with learnStart + 1 stored transitions
        if self.minibatch_size > self.memory_size || self.minibatch_size > self.learn_start + 1 {
            return Err(DqnError::InvalidParameter {
                name: "minibatch_size".to_string(),
                reason: format!(
                    "{} exceeds what the memory holds when learning starts (learnStart {}, memorySize {})",
                    self.minibatch_size, self.learn_start, self.memory_size
                ),
            });
        }
        if self.checkpoint_every == 0 {
            return Err(DqnError::invalid_parameter("checkpoint_every", "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.exploration_rate) {
            return Err(DqnError::InvalidParameter {
                name: "explorationRate".to_string(),
                reason: format!("must be in [0, 1], got {}", self.exploration_rate),
            });
        }
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_legacy_parameter_file() {
        let json = r#"{
            "epochs": 1000, "steps": 500, "updateTargetNetwork": 2000,
            "explorationRate": 0.42, "minibatch_size": 32, "learnStart": 128,
            "learningRate": 0.001, "discountFactor": 0.95, "memorySize": 5000,
            "network_inputs": 20, "network_outputs": 3,
            "network_structure": [64, 64], "current_epoch": 300
        }"#;
        let config: TrainingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.update_target_network, 2000);
        assert_eq!(config.exploration_rate, 0.42);
        assert_eq!(config.network_structure, vec![64, 64]);
        assert_eq!(config.current_epoch, 300);
        // Keys absent from the file fall back to defaults
        assert_eq!(config.exploration_decay, 0.995);
        assert_eq!(config.max_episode_steps, 1000);
    }

    #[test]
    fn test_writes_legacy_keys() {
        let value = serde_json::to_value(TrainingConfig::default()).unwrap();
        for key in ["updateTargetNetwork", "explorationRate", "learnStart", "learningRate", "discountFactor", "memorySize"] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_validate() {
        assert!(TrainingConfig::default().validate().is_ok());
        let config = TrainingConfig { update_target_network: 0, ..TrainingConfig::default() };
        assert!(config.validate().is_err());
        let config = TrainingConfig { discount_factor: 1.0, ..TrainingConfig::default() };
        assert!(config.validate().is_err());
        let config = TrainingConfig { minibatch_size: 66, ..TrainingConfig::default() };
        assert!(config.validate().is_err());
        let config = TrainingConfig { minibatch_size: 65, ..TrainingConfig::default() };
        assert!(config.validate().is_ok());
    }
}
