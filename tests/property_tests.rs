#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use navdqn::agent::explorer::{argmax, epsilon_greedy};
    use navdqn::agent::DeepQAgentBuilder;
    use navdqn::replay_memory::{ReplayMemory, Transition};
    use navdqn::value_function::QModel;
    use ndarray::{array, Array1};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn transition(i: usize) -> Transition {
        Transition::new(array![i as f32], 0, i as f32, array![i as f32 + 1.0], false)
    }

    // Strategy for finite action-value vectors
    fn q_values_strategy() -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(-1000.0f32..1000.0, 1..=8)
    }

    proptest! {
        #[test]
        fn test_ring_holds_most_recent(capacity in 1usize..40, stores in 0usize..150) {
            let mut memory = ReplayMemory::new(capacity);
            for i in 0..stores {
                memory.store(transition(i));
            }

            let expected = stores.min(capacity);
            prop_assert_eq!(memory.size(), expected);
            let rewards: Vec<usize> = memory.iter_chronological().map(|t| t.reward as usize).collect();
            let recent: Vec<usize> = (stores - expected..stores).collect();
            prop_assert_eq!(rewards, recent);
        }

        #[test]
        fn test_sample_draws_stored_members(capacity in 1usize..30, stores in 1usize..80, seed in any::<u64>()) {
            let mut memory = ReplayMemory::new(capacity);
            for i in 0..stores {
                memory.store(transition(i));
            }
            let oldest = stores - memory.size();
            let mut rng = StdRng::seed_from_u64(seed);

            let batch = memory.sample(memory.size(), &mut rng);
            prop_assert_eq!(batch.len(), memory.size());
            for sampled in batch {
                let index = sampled.reward as usize;
                prop_assert!(index >= oldest && index < stores);
            }
        }

        #[test]
        fn test_terminal_target_is_reward(q in q_values_strategy(), reward in -500.0f32..500.0, gamma in 0.0f32..0.999) {
            let agent = DeepQAgentBuilder::new()
                .input_size(2)
                .output_size(2)
                .hidden_layers(&[])
                .discount_factor(gamma)
                .memory_size(1)
                .seed(0)
                .build()
                .unwrap();
            let q = Array1::from(q);
            prop_assert_eq!(agent.compute_target(q.view(), reward, true), reward);

            let max = q.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            let bootstrapped = agent.compute_target(q.view(), reward, false);
            prop_assert!((bootstrapped - (reward + gamma * max)).abs() <= 1e-3);
        }

        #[test]
        fn test_argmax_is_first_maximum(q in q_values_strategy()) {
            let q = Array1::from(q);
            let best = argmax(q.view());
            prop_assert!(q.iter().all(|&v| v <= q[best]));
            prop_assert!(q.iter().take(best).all(|&v| v < q[best]));
        }

        #[test]
        fn test_no_exploration_is_greedy(q in q_values_strategy(), seed in any::<u64>()) {
            let q = Array1::from(q);
            let mut rng = StdRng::seed_from_u64(seed);
            prop_assert_eq!(epsilon_greedy(q.view(), 0.0, &mut rng), argmax(q.view()));
            prop_assert!(epsilon_greedy(q.view(), 1.0, &mut rng) < q.len());
        }

        #[test]
        fn test_sync_equalizes_predictions(seed in any::<u64>(), x in prop::collection::vec(-10.0f32..10.0, 6)) {
            let mut agent = DeepQAgentBuilder::new()
                .input_size(6)
                .output_size(3)
                .hidden_layers(&[10, 10])
                .memory_size(10)
                .seed(seed)
                .build()
                .unwrap();
            agent.update_target_network();
            let x = Array1::from(x);
            prop_assert_eq!(
                agent.value_function().predict(QModel::Online, x.view()),
                agent.value_function().predict(QModel::Target, x.view())
            );
        }
    }
}
