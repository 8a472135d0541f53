use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::agent::DeepQAgent;
use crate::error::Result;
use super::config::TrainingConfig;

/// Files written for one checkpoint: the online network parameters and
/// the training parameters needed to resume.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub weights_path: PathBuf,
    pub params_path: PathBuf,
}

impl Checkpoint {
    pub fn for_epoch<P: AsRef<Path>>(output_dir: P, run_name: &str, epoch: usize) -> Self {
        let dir = output_dir.as_ref();
        Checkpoint {
            weights_path: dir.join(format!("{}_ep{}.bin", run_name, epoch)),
            params_path: dir.join(format!("{}_ep{}.json", run_name, epoch)),
        }
    }

    /// Write the agent's online parameters and `config` with the run's
    /// progress (`epoch`, `exploration_rate`) folded in.
    pub fn write(
        &self,
        agent: &DeepQAgent,
        config: &TrainingConfig,
        epoch: usize,
        exploration_rate: f32,
    ) -> Result<()> {
        if let Some(dir) = self.weights_path.parent() {
            fs::create_dir_all(dir)?;
        }
        agent.save_model(&self.weights_path)?;

        let params = TrainingConfig {
            current_epoch: epoch,
            exploration_rate,
            ..config.clone()
        };
        params.save(&self.params_path)?;

        info!("Checkpoint for epoch {} written to {:?}", epoch, self.weights_path);
        Ok(())
    }
}
