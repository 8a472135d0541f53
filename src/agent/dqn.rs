use std::path::Path;

use log::debug;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Result;
use crate::optimizer::{OptimizerKind, OptimizerWrapper};
use crate::replay_memory::{ReplayMemory, Transition};
use crate::value_function::{QModel, ValueFunction};
use super::config::AgentConfig;
use super::explorer;

/// Deep Q-Network agent with experience replay and a target network.
///
/// The agent owns its replay memory, the online/target value function and
/// the random number generator used for exploration and sampling.
///
/// # Example
///
/// ```rust
/// use navdqn::agent::DeepQAgentBuilder;
/// use ndarray::array;
///
/// let mut agent = DeepQAgentBuilder::new()
///     .input_size(4)
///     .output_size(2)
///     .hidden_layers(&[16, 16])
///     .memory_size(1000)
///     .learn_start(8)
///     .seed(7)
///     .build()
///     .unwrap();
///
/// let state = array![0.1, -0.2, 0.3, -0.1];
/// let action = agent.select_action(state.view(), 0.1);
/// let next_state = array![0.15, -0.25, 0.35, -0.05];
/// agent.add_memory(state, action, 1.0, next_state, false);
///
/// // Nothing happens until the memory holds more than `learn_start` transitions
/// assert!(agent.learn_on_mini_batch(1, true).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct DeepQAgent {
    config: AgentConfig,
    memory: ReplayMemory,
    value_function: ValueFunction,
    rng: StdRng,
}

impl DeepQAgent {
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let optimizer = OptimizerWrapper::from_kind(config.optimizer);
        let value_function = ValueFunction::new(&config.topology(), optimizer, config.learning_rate, &mut rng)?;
        let memory = ReplayMemory::new(config.memory_size);

        Ok(DeepQAgent { config, memory, value_function, rng })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn value_function(&self) -> &ValueFunction {
        &self.value_function
    }

    #[cfg(test)]
    pub(crate) fn value_function_mut(&mut self) -> &mut ValueFunction {
        &mut self.value_function
    }

    pub fn num_actions(&self) -> usize {
        self.config.output_size
    }

    /// Online action-values for an observation.
    pub fn q_values(&self, observation: ArrayView1<f32>) -> Array1<f32> {
        self.value_function.predict(QModel::Online, observation)
    }

    /// Target-network action-values for an observation.
    pub fn target_q_values(&self, observation: ArrayView1<f32>) -> Array1<f32> {
        self.value_function.predict(QModel::Target, observation)
    }

    /// Epsilon-greedy action for `observation` under the online network.
    pub fn select_action(&mut self, observation: ArrayView1<f32>, exploration_rate: f32) -> usize {
        let q_values = self.q_values(observation);
        self.select_action_from_q(q_values.view(), exploration_rate)
    }

    /// Epsilon-greedy action over already computed action-values.
    pub fn select_action_from_q(&mut self, q_values: ArrayView1<f32>, exploration_rate: f32) -> usize {
        explorer::epsilon_greedy(q_values, exploration_rate, &mut self.rng)
    }

    /// Alternate policy sampling actions in proportion to their shifted
    /// action-values raised to `bias`.
    pub fn select_action_by_probability(&mut self, q_values: ArrayView1<f32>, bias: f32) -> usize {
        explorer::power_law(q_values, bias, &mut self.rng)
    }

    pub fn add_memory(
        &mut self,
        state: Array1<f32>,
        action: usize,
        reward: f32,
        next_state: Array1<f32>,
        is_terminal: bool,
    ) {
        assert!(action < self.num_actions(), "action {} out of range for {} actions", action, self.num_actions());
        self.memory.store(Transition::new(state, action, reward, next_state, is_terminal));
    }

    pub fn last_memory(&self) -> Option<&Transition> {
        self.memory.last()
    }

    /// Bellman target: `reward` for a terminal transition, otherwise
    /// `reward + gamma * max(next_q_values)`.
    pub fn compute_target(&self, next_q_values: ArrayView1<f32>, reward: f32, is_terminal: bool) -> f32 {
        if is_terminal {
            reward
        } else {
            reward + self.config.discount_factor * explorer::max_value(next_q_values)
        }
    }

    /// Train the online network on one sampled mini-batch.
    ///
    /// Does nothing and returns `None` while the memory holds `learn_start`
    /// transitions or fewer. Otherwise returns the loss of the step.
    pub fn learn_on_mini_batch(&mut self, batch_size: usize, use_target_network: bool) -> Option<f32> {
        if self.memory.size() <= self.config.learn_start {
            return None;
        }

        let batch = self.memory.sample(batch_size, &mut self.rng);
        let (inputs, labels) = self.training_batch(&batch, use_target_network);

        let loss = self.value_function.apply_gradient_step(inputs.view(), labels.view());
        debug!("Learned on {} rows from {} transitions, loss = {}", inputs.nrows(), batch_size, loss);
        Some(loss)
    }

    /// Inputs and labels for one gradient step over `batch`.
    ///
    /// Each transition contributes one row whose label is the online
    /// prediction for `state` with the taken action replaced by the Bellman
    /// target. A terminal transition contributes a second row:
    /// `next_state` labelled with `reward` on every action.
    pub fn training_batch(&self, batch: &[&Transition], use_target_network: bool) -> (Array2<f32>, Array2<f32>) {
        let input_size = self.config.input_size;
        let num_actions = self.config.output_size;

        let mut states = Array2::zeros((batch.len(), input_size));
        let mut next_states = Array2::zeros((batch.len(), input_size));
        for (i, transition) in batch.iter().enumerate() {
            states.row_mut(i).assign(&transition.state);
            next_states.row_mut(i).assign(&transition.next_state);
        }

        let q_values = self.value_function.predict_batch(QModel::Online, states.view());
        let bootstrap = if use_target_network { QModel::Target } else { QModel::Online };
        let next_q_values = self.value_function.predict_batch(bootstrap, next_states.view());

        let rows = batch.len() + batch.iter().filter(|t| t.is_terminal).count();
        let mut inputs = Array2::zeros((rows, input_size));
        let mut labels = Array2::zeros((rows, num_actions));

        let mut row = 0;
        for (i, transition) in batch.iter().enumerate() {
            let target = self.compute_target(next_q_values.row(i), transition.reward, transition.is_terminal);

            inputs.row_mut(row).assign(&transition.state);
            let mut label = labels.row_mut(row);
            label.assign(&q_values.row(i));
            label[transition.action] = target;
            row += 1;

            if transition.is_terminal {
                inputs.row_mut(row).assign(&transition.next_state);
                labels.row_mut(row).fill(transition.reward);
                row += 1;
            }
        }

        (inputs, labels)
    }

    pub fn update_target_network(&mut self) {
        self.value_function.sync_target_from_online();
    }

    /// Save the online network's parameters.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.value_function.save(path)
    }

    /// Load online network parameters saved by [`DeepQAgent::save_model`].
    pub fn load_weights<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.value_function.load(path)
    }
}

/// Builder pattern for DeepQAgent
pub struct DeepQAgentBuilder {
    config: AgentConfig,
}

impl DeepQAgentBuilder {
    pub fn new() -> Self {
        DeepQAgentBuilder { config: AgentConfig::default() }
    }

    pub fn from_config(config: AgentConfig) -> Self {
        DeepQAgentBuilder { config }
    }

    pub fn input_size(mut self, size: usize) -> Self {
        self.config.input_size = size;
        self
    }

    pub fn output_size(mut self, size: usize) -> Self {
        self.config.output_size = size;
        self
    }

    pub fn hidden_layers(mut self, sizes: &[usize]) -> Self {
        self.config.hidden_layers = sizes.to_vec();
        self
    }

    pub fn attention(mut self, attention: bool) -> Self {
        self.config.attention = attention;
        self
    }

    pub fn discount_factor(mut self, gamma: f32) -> Self {
        self.config.discount_factor = gamma;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f32) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    pub fn memory_size(mut self, capacity: usize) -> Self {
        self.config.memory_size = capacity;
        self
    }

    pub fn learn_start(mut self, learn_start: usize) -> Self {
        self.config.learn_start = learn_start;
        self
    }

    pub fn optimizer(mut self, kind: OptimizerKind) -> Self {
        self.config.optimizer = kind;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<DeepQAgent> {
        DeepQAgent::new(self.config)
    }
}

impl Default for DeepQAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
