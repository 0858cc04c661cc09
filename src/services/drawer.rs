use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Prioritized, WeightTable};

/// Error types for the drawer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error("Cannot draw from an empty candidate set")]
    EmptyCandidateSet,
}

/// How the weighted draw locates the chosen candidate
///
/// Both strategies consume the same single uniform draw in `[0, total)` and
/// map it to the same candidate, so they are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawStrategy {
    /// Repeat each candidate `weight` times and index the pool uniformly
    #[default]
    Expanded,
    /// Binary search over cumulative weights, O(N) space
    Cumulative,
}

/// Weighted random drawer for watchlist candidates
#[derive(Debug, Clone, Default)]
pub struct WeightedDrawer {
    weights: WeightTable,
    strategy: DrawStrategy,
}

impl WeightedDrawer {
    /// Creates a drawer with the given weight table and strategy
    pub fn new(weights: WeightTable, strategy: DrawStrategy) -> Self {
        Self { weights, strategy }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn strategy(&self) -> DrawStrategy {
        self.strategy
    }

    /// Draws one candidate, with probability proportional to its weight
    ///
    /// Consumes exactly one uniform integer from `rng` and never mutates the
    /// input. Fails only when `candidates` is empty.
    pub fn draw<'a, T, R>(&self, candidates: &'a [T], rng: &mut R) -> Result<&'a T, DrawError>
    where
        T: Prioritized,
        R: Rng + ?Sized,
    {
        let index = self.draw_index(candidates, rng)?;
        Ok(&candidates[index])
    }

    /// Same as [`draw`](Self::draw) but returns the position of the winner
    pub fn draw_index<T, R>(&self, candidates: &[T], rng: &mut R) -> Result<usize, DrawError>
    where
        T: Prioritized,
        R: Rng + ?Sized,
    {
        if candidates.is_empty() {
            return Err(DrawError::EmptyCandidateSet);
        }

        let weights = self.weights.weights_of(candidates);

        let index = match self.strategy {
            DrawStrategy::Expanded => expanded_pick(&weights, rng),
            DrawStrategy::Cumulative => cumulative_pick(&weights, rng),
        };

        Ok(index)
    }

    /// Weight and selection probability of each candidate, in input order
    pub fn odds<T: Prioritized>(&self, candidates: &[T]) -> Vec<(u32, f64)> {
        let weights = self.weights.weights_of(candidates);
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return Vec::new();
        }

        weights
            .into_iter()
            .map(|weight| (weight, f64::from(weight) / total as f64))
            .collect()
    }
}

fn expanded_pick<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> usize {
    let pool: Vec<usize> = weights
        .iter()
        .enumerate()
        .flat_map(|(index, &weight)| std::iter::repeat(index).take(weight as usize))
        .collect();

    let slot = rng.gen_range(0..pool.len() as u64);
    pool[slot as usize]
}

fn cumulative_pick<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> usize {
    let cumulative: Vec<u64> = weights
        .iter()
        .scan(0u64, |running, &weight| {
            *running += u64::from(weight);
            Some(*running)
        })
        .collect();

    let total = cumulative.last().copied().unwrap_or(0);
    let target = rng.gen_range(0..total);
    // First band whose upper bound exceeds the target
    cumulative.partition_point(|&upper| upper <= target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weights::MAX_WEIGHT;
    use crate::models::Priority;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    #[derive(Debug, Clone, PartialEq)]
    struct Candidate {
        id: &'static str,
        priority: Priority,
    }

    impl Prioritized for Candidate {
        fn priority(&self) -> &Priority {
            &self.priority
        }
    }

    fn candidate(id: &'static str, priority: Priority) -> Candidate {
        Candidate { id, priority }
    }

    fn mixed_list() -> Vec<Candidate> {
        vec![
            candidate("a", Priority::Urgent),
            candidate("b", Priority::High),
            candidate("c", Priority::Medium),
            candidate("d", Priority::Low),
        ]
    }

    fn both_strategies() -> [WeightedDrawer; 2] {
        [
            WeightedDrawer::new(WeightTable::default(), DrawStrategy::Expanded),
            WeightedDrawer::new(WeightTable::default(), DrawStrategy::Cumulative),
        ]
    }

    fn frequencies(
        drawer: &WeightedDrawer,
        candidates: &[Candidate],
        trials: usize,
        seed: u64,
    ) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut counts = vec![0usize; candidates.len()];
        for _ in 0..trials {
            let index = drawer.draw_index(candidates, &mut rng).unwrap();
            counts[index] += 1;
        }
        counts.iter().map(|&n| n as f64 / trials as f64).collect()
    }

    #[test]
    fn test_empty_candidates() {
        for drawer in both_strategies() {
            let mut rng = StdRng::seed_from_u64(1);
            let result = drawer.draw::<Candidate, _>(&[], &mut rng);
            assert_eq!(result, Err(DrawError::EmptyCandidateSet));
        }
    }

    #[test]
    fn test_single_candidate_always_returned() {
        for drawer in both_strategies() {
            let mut rng = StdRng::seed_from_u64(7);
            for priority in [Priority::Low, Priority::Urgent, Priority::Unknown("meh".into())] {
                let list = vec![candidate("only", priority)];
                for _ in 0..50 {
                    assert_eq!(drawer.draw(&list, &mut rng).unwrap().id, "only");
                }
            }
        }
    }

    #[test]
    fn test_draw_returns_member_of_input() {
        let list = mixed_list();
        for drawer in both_strategies() {
            let mut rng = StdRng::seed_from_u64(99);
            for _ in 0..1_000 {
                let picked = drawer.draw(&list, &mut rng).unwrap();
                assert!(list.iter().any(|c| std::ptr::eq(c, picked)));
            }
        }
    }

    #[test]
    fn test_draw_does_not_mutate_input() {
        let list = mixed_list();
        let before = list.clone();
        let drawer = WeightedDrawer::default();
        let mut rng = StdRng::seed_from_u64(3);
        drawer.draw(&list, &mut rng).unwrap();
        assert_eq!(list, before);
    }

    #[test]
    fn test_same_seed_same_pick() {
        let list = mixed_list();
        for drawer in both_strategies() {
            let first: Vec<&str> = {
                let mut rng = StdRng::seed_from_u64(2024);
                (0..20).map(|_| drawer.draw(&list, &mut rng).unwrap().id).collect()
            };
            let second: Vec<&str> = {
                let mut rng = StdRng::seed_from_u64(2024);
                (0..20).map(|_| drawer.draw(&list, &mut rng).unwrap().id).collect()
            };
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_strategies_agree_for_same_random_state() {
        let list = mixed_list();
        let [expanded, cumulative] = both_strategies();
        let mut rng_a = StdRng::seed_from_u64(555);
        let mut rng_b = StdRng::seed_from_u64(555);

        for _ in 0..500 {
            assert_eq!(
                expanded.draw_index(&list, &mut rng_a).unwrap(),
                cumulative.draw_index(&list, &mut rng_b).unwrap()
            );
        }
    }

    #[test]
    fn test_frequencies_match_weights() {
        let list = mixed_list();
        // URGENT=10, HIGH=5, MEDIUM=2, LOW=1
        let expected = [10.0 / 18.0, 5.0 / 18.0, 2.0 / 18.0, 1.0 / 18.0];

        for drawer in both_strategies() {
            let observed = frequencies(&drawer, &list, 100_000, 42);
            for (obs, exp) in observed.iter().zip(expected.iter()) {
                assert!(
                    (obs - exp).abs() < 0.01,
                    "{:?}: observed {} expected {}",
                    drawer.strategy(),
                    obs,
                    exp
                );
            }
        }
    }

    #[test]
    fn test_urgent_versus_low() {
        let list = vec![candidate("a", Priority::Urgent), candidate("b", Priority::Low)];
        let drawer = WeightedDrawer::default();
        let observed = frequencies(&drawer, &list, 11_000, 11);

        assert!((observed[0] - 10.0 / 11.0).abs() < 0.015, "got {}", observed[0]);
        assert!((observed[1] - 1.0 / 11.0).abs() < 0.015, "got {}", observed[1]);
    }

    #[test]
    fn test_unknown_priority_weighs_like_low() {
        let list = vec![
            candidate("typo", Priority::Unknown("HIHG".to_string())),
            candidate("low", Priority::Low),
        ];

        for drawer in both_strategies() {
            let observed = frequencies(&drawer, &list, 20_000, 8);
            assert!(observed[0] > 0.0, "unknown priority must stay selectable");
            assert!((observed[0] - 0.5).abs() < 0.02, "got {}", observed[0]);
        }
    }

    #[test]
    fn test_custom_weight_table_is_honoured() {
        let weights = WeightTable::new(1, 1, 1, 3).unwrap();
        let drawer = WeightedDrawer::new(weights, DrawStrategy::Cumulative);
        let list = vec![candidate("u", Priority::Urgent), candidate("l", Priority::Low)];

        let observed = frequencies(&drawer, &list, 40_000, 17);
        assert!((observed[0] - 0.75).abs() < 0.01, "got {}", observed[0]);
    }

    #[test]
    fn test_odds() {
        let drawer = WeightedDrawer::default();
        let list = vec![candidate("a", Priority::Urgent), candidate("b", Priority::Low)];

        let odds = drawer.odds(&list);
        assert_eq!(odds.len(), 2);
        assert_eq!(odds[0].0, 10);
        assert_eq!(odds[1].0, 1);
        assert!((odds[0].1 - 10.0 / 11.0).abs() < 1e-9);
        assert!((odds[1].1 - 1.0 / 11.0).abs() < 1e-9);
        assert!(drawer.odds::<Candidate>(&[]).is_empty());
    }

    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_unknown_priority_warns_once_per_candidate() {
        let drawer = WeightedDrawer::default();
        let list = vec![
            candidate("typo", Priority::Unknown("URGNET".to_string())),
            candidate("fine", Priority::High),
            candidate("blank", Priority::Unknown(String::new())),
        ];

        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        tracing::subscriber::with_default(subscriber, || {
            drawer.odds(&list);
        });
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);

        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        tracing::subscriber::with_default(subscriber, || {
            let mut rng = StdRng::seed_from_u64(5);
            drawer.draw(&list, &mut rng).unwrap();
        });
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_largest_allowed_weight_draws_with_expanded_pool() {
        let weights = WeightTable::new(1, 2, 5, MAX_WEIGHT).unwrap();
        let drawer = WeightedDrawer::new(weights, DrawStrategy::Expanded);
        let list = vec![candidate("u", Priority::Urgent), candidate("l", Priority::Low)];
        let mut rng = StdRng::seed_from_u64(1);

        let picked = drawer.draw(&list, &mut rng).unwrap();
        assert!(picked.id == "u" || picked.id == "l");
    }

    #[test]
    fn test_strategy_deserialize() {
        let strategy: DrawStrategy = serde_json::from_str("\"cumulative\"").unwrap();
        assert_eq!(strategy, DrawStrategy::Cumulative);
        assert_eq!(DrawStrategy::default(), DrawStrategy::Expanded);
    }
}
