//! Seeded index splitting for evaluation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffled train/test index split
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_size = ((n as f64 * test_fraction).round() as usize).min(n);
    let test = indices[..test_size].to_vec();
    let train = indices[test_size..].to_vec();
    (train, test)
}

/// Shuffled k-fold splits; every index lands in exactly one test fold
pub fn k_folds(n: usize, k: usize, seed: u64) -> Vec<(Vec<usize>, Vec<usize>)> {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let k = k.max(2).min(n.max(2));
    (0..k)
        .map(|fold| {
            let test: Vec<usize> = indices
                .iter()
                .enumerate()
                .filter(|(i, _)| i % k == fold)
                .map(|(_, &idx)| idx)
                .collect();
            let train: Vec<usize> = indices
                .iter()
                .enumerate()
                .filter(|(i, _)| i % k != fold)
                .map(|(_, &idx)| idx)
                .collect();
            (train, test)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_split_partitions_all_indices() {
        let (train, test) = train_test_split(100, 0.2, 42);
        assert_eq!(test.len(), 20);
        assert_eq!(train.len(), 80);

        let all: HashSet<usize> = train.iter().chain(&test).copied().collect();
        assert_eq!(all.len(), 100);
    }

    #[test]
    fn test_split_is_deterministic_for_seed() {
        let a = train_test_split(50, 0.2, 7);
        let b = train_test_split(50, 0.2, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_shuffles() {
        let (train, _) = train_test_split(100, 0.2, 42);
        let sorted: Vec<usize> = {
            let mut t = train.clone();
            t.sort_unstable();
            t
        };
        assert_ne!(train, sorted);
    }

    #[test]
    fn test_k_folds_cover_every_index_once() {
        let folds = k_folds(53, 5, 42);
        assert_eq!(folds.len(), 5);

        let mut seen: Vec<usize> = folds.iter().flat_map(|(_, test)| test.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..53).collect::<Vec<_>>());

        for (train, test) in &folds {
            assert_eq!(train.len() + test.len(), 53);
            let overlap = train.iter().any(|i| test.contains(i));
            assert!(!overlap);
        }
    }
}
