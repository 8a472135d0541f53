//! Corridor Navigation Example
//!
//! Trains the attention DQN on the simulated lidar corridor and writes
//! checkpoints to `models/`. Set `RUST_LOG=info` to see per-episode logs.
//!
//! ```text
//! cargo run --example corridor_training
//! cargo run --example corridor_training -- models/corridor_ep100.json models/corridor_ep100.bin
//! ```

use navdqn::environment::corridor::NUM_ACTIONS;
use navdqn::environment::{CorridorConfig, Environment, LidarCorridor};
use navdqn::training::{TrainingConfig, TrainingLoop};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let corridor = CorridorConfig::default();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut training = match args.as_slice() {
        [params, weights] => TrainingLoop::resume(params, weights)?,
        [] => TrainingLoop::new(TrainingConfig {
            epochs: 300,
            steps: 1000,
            update_target_network: 2000,
            minibatch_size: 64,
            learn_start: 64,
            learning_rate: 0.00025,
            memory_size: 100_000,
            network_inputs: corridor.beams,
            network_outputs: NUM_ACTIONS,
            network_structure: vec![64, 64],
            max_episode_steps: 500,
            run_name: "corridor".to_string(),
            seed: Some(42),
            ..TrainingConfig::default()
        })?,
        _ => {
            eprintln!("usage: corridor_training [PARAMS_JSON WEIGHTS_BIN]");
            std::process::exit(2);
        }
    };

    println!("Corridor DQN Example");
    println!("====================\n");

    let mut env = LidarCorridor::new(corridor, 7);
    let summary = training.run(&mut env)?;

    println!("Trained {} episodes ({} steps)", summary.episodes, summary.total_steps);
    println!("  highest reward:      {:.1}", summary.highest_reward);
    println!("  mean last-100 steps: {:.1}", summary.last_scores_mean);
    println!("  final exploration:   {:.3}", summary.final_exploration_rate);

    // Greedy rollout with the trained online network
    let agent = training.agent_mut();
    let mut observation = env.reset()?;
    let mut total_reward = 0.0;
    for t in 0..500 {
        let action = agent.select_action(observation.view(), 0.0);
        let step = env.step(action)?;
        total_reward += step.reward;
        observation = step.observation;
        if step.done {
            println!("\nGreedy episode ended after {} steps with reward {:.1}", t + 1, total_reward);
            return Ok(());
        }
    }
    println!("\nGreedy episode survived 500 steps with reward {:.1}", total_reward);
    Ok(())
}
