// ============================================================
// Layer 4 — Train/Eval Splitter
// ============================================================
// Shuffles examples with a seeded RNG and splits them into a
// training set and an evaluation set. The same seed always gives
// the same split, so an inspection run can be reproduced from its
// saved loader config.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, eval).
///
/// `train_fraction` is the share kept for training, e.g. 0.8.
pub fn split_train_eval<T>(mut samples: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;
    let split_at = split_at.min(total);

    // After this: samples = [0..split_at], eval = [split_at..total]
    let eval = samples.split_off(split_at);

    tracing::debug!(
        "Corpus split: {} train, {} eval ({}% / {}%)",
        samples.len(),
        eval.len(),
        (samples.len() * 100) / total.max(1),
        (eval.len() * 100) / total.max(1),
    );

    (samples, eval)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, eval)     = split_train_eval(items, 0.8, 7);
        assert_eq!(train.len(), 80);
        assert_eq!(eval.len(), 20);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let (train, eval)     = split_train_eval(items, 0.7, 7);

        let mut all: Vec<usize> = train.into_iter().chain(eval).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split_train_eval((0..30).collect::<Vec<usize>>(), 0.5, 42);
        let b = split_train_eval((0..30).collect::<Vec<usize>>(), 0.5, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, eval)     = split_train_eval(items, 0.8, 1);
        assert!(train.is_empty());
        assert!(eval.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        let items: Vec<usize> = (0..10).collect();
        let (train, eval)     = split_train_eval(items, 1.0, 3);
        assert_eq!(train.len(), 10);
        assert!(eval.is_empty());
    }
}
