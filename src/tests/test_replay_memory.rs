use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::replay_memory::{ReplayMemory, Transition};

fn transition(i: usize) -> Transition {
    Transition::new(array![i as f32], i % 4, i as f32, array![(i + 1) as f32], i % 7 == 0)
}

#[test]
fn test_store_and_last() {
    let mut memory = ReplayMemory::new(10);
    assert!(memory.is_empty());
    assert!(memory.last().is_none());

    memory.store(transition(1));
    memory.store(transition(2));
    assert_eq!(memory.size(), 2);
    assert_eq!(memory.last(), Some(&transition(2)));
}

#[test]
fn test_ring_keeps_most_recent() {
    let mut memory = ReplayMemory::new(5);
    for i in 0..13 {
        memory.store(transition(i));
    }

    assert_eq!(memory.size(), 5);
    assert_eq!(memory.capacity(), 5);
    assert_eq!(memory.inserted_count(), 13);

    // Slot i % capacity holds the latest write to it
    let rewards: Vec<f32> = memory.iter_chronological().map(|t| t.reward).collect();
    assert_eq!(rewards, vec![8.0, 9.0, 10.0, 11.0, 12.0]);
    assert_eq!(memory.get(0).map(|t| t.reward), Some(10.0));
    assert_eq!(memory.last().map(|t| t.reward), Some(12.0));
}

#[test]
fn test_size_is_capacity_bounded() {
    let mut memory = ReplayMemory::new(3);
    for i in 0..3 {
        memory.store(transition(i));
        assert_eq!(memory.size(), i + 1);
    }
    for i in 3..20 {
        memory.store(transition(i));
        assert_eq!(memory.size(), 3);
    }
}

#[test]
fn test_sample_returns_stored_members() {
    let mut memory = ReplayMemory::new(8);
    for i in 0..20 {
        memory.store(transition(i));
    }
    let mut rng = StdRng::seed_from_u64(11);

    for batch_size in [1, 4, 8] {
        let batch = memory.sample(batch_size, &mut rng);
        assert_eq!(batch.len(), batch_size);
        for sampled in batch {
            assert!(sampled.reward >= 12.0, "evicted transition {} was sampled", sampled.reward);
            assert!(memory.iter_chronological().any(|t| t == sampled));
        }
    }
}

#[test]
fn test_sample_with_replacement_covers_memory() {
    let mut memory = ReplayMemory::new(4);
    for i in 0..4 {
        memory.store(transition(i));
    }
    let mut rng = StdRng::seed_from_u64(2);
    let mut seen = [false; 4];
    for _ in 0..100 {
        for sampled in memory.sample(4, &mut rng) {
            seen[sampled.reward as usize] = true;
        }
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
#[should_panic]
fn test_sample_more_than_stored_panics() {
    let mut memory = ReplayMemory::new(10);
    memory.store(transition(0));
    memory.store(transition(1));
    memory.sample(3, &mut StdRng::seed_from_u64(0));
}

#[test]
#[should_panic]
fn test_zero_capacity_panics() {
    ReplayMemory::new(0);
}
