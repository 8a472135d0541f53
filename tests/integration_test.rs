use navdqn::{
    agent::{AgentConfig, DeepQAgent, DeepQAgentBuilder},
    environment::{Environment, Step, StepInfo},
    error::Result,
    optimizer::OptimizerKind,
    training::{TrainingConfig, TrainingLoop},
    value_function::QModel,
};
use ndarray::{array, Array1};

/// Five-step episodes where action 0 always pays 1 and action 1 pays 0.
struct PreferFirst {
    t: usize,
}

impl PreferFirst {
    fn observation(&self) -> Array1<f32> {
        array![self.t as f32 / 5.0, 1.0]
    }
}

impl Environment for PreferFirst {
    fn reset(&mut self) -> Result<Array1<f32>> {
        self.t = 0;
        Ok(self.observation())
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        self.t += 1;
        Ok(Step {
            observation: self.observation(),
            reward: if action == 0 { 1.0 } else { 0.0 },
            done: self.t >= 5,
            info: StepInfo::default(),
        })
    }
}

#[test]
fn test_training_loop_learns_better_action() {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = TrainingConfig {
        epochs: 300,
        steps: 10,
        update_target_network: 100,
        exploration_rate: 1.0,
        exploration_decay: 1.0,
        minibatch_size: 16,
        learn_start: 16,
        learning_rate: 0.005,
        discount_factor: 0.5,
        memory_size: 5000,
        network_inputs: 2,
        network_outputs: 2,
        network_structure: vec![16],
        seed: Some(99),
        ..TrainingConfig::default()
    };
    let mut training = TrainingLoop::new(config).unwrap();
    let summary = training.run(&mut PreferFirst { t: 0 }).unwrap();
    assert_eq!(summary.episodes, 300);

    for t in 0..5 {
        let q = training.agent().q_values(array![t as f32 / 5.0, 1.0].view());
        assert!(q[0] > q[1], "state {}: {:?}", t, q);
    }
}

#[test]
fn test_manual_driver_loop() {
    // The same protocol the training loop follows, driven by hand
    let mut agent = DeepQAgentBuilder::new()
        .input_size(2)
        .output_size(2)
        .hidden_layers(&[8])
        .memory_size(64)
        .learn_start(8)
        .optimizer(OptimizerKind::RmsProp)
        .seed(4)
        .build()
        .unwrap();
    let mut env = PreferFirst { t: 0 };

    let mut learned = 0;
    for episode in 0..10 {
        let mut observation = env.reset().unwrap();
        loop {
            let action = agent.select_action(observation.view(), 0.5);
            let step = env.step(action).unwrap();
            agent.add_memory(observation, action, step.reward, step.observation.clone(), step.done);
            if agent.learn_on_mini_batch(8, episode > 2).is_some() {
                learned += 1;
            }
            observation = step.observation;
            if step.done {
                break;
            }
        }
        agent.update_target_network();
    }

    assert_eq!(agent.memory().size(), 50);
    // Memory first exceeds learn_start on the ninth transition
    assert_eq!(learned, 42);
    let x = array![0.4, 1.0];
    assert_eq!(
        agent.value_function().predict(QModel::Online, x.view()),
        agent.value_function().predict(QModel::Target, x.view())
    );
}

#[test]
fn test_production_topology() {
    let agent = DeepQAgent::new(AgentConfig { seed: Some(1), ..AgentConfig::default() }).unwrap();
    let topology = agent.value_function().topology();
    assert_eq!(topology.describe(), "118-300-300-4 with attention");
    assert_eq!(agent.q_values(Array1::zeros(118).view()).len(), 4);
}
