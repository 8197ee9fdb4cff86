//! Local search termination policies.
//!
//! All three are cheap running statistics over the gains of performed moves.
//! The refiners reset a policy at the start of a search and whenever the
//! best cut improves, feed it every performed move, and consult it once per
//! iteration.

use crate::config::FmConfig;
use crate::hypergraph::{Gain, HyperedgeWeight};

pub trait StoppingPolicy {
    fn reset(&mut self);
    fn update(&mut self, gain: Gain);
    fn should_stop(
        &self,
        moves_since_best: usize,
        config: &FmConfig,
        beta: f64,
        best_cut: HyperedgeWeight,
        cut: HyperedgeWeight,
    ) -> bool;
}

/// Stop after a fixed number of moves without improvement.
#[derive(Debug, Default)]
pub struct NumberOfFruitlessMoves {
    num_moves: usize,
}

impl StoppingPolicy for NumberOfFruitlessMoves {
    fn reset(&mut self) {
        self.num_moves = 0;
    }

    fn update(&mut self, _gain: Gain) {
        self.num_moves += 1;
    }

    fn should_stop(
        &self,
        _moves_since_best: usize,
        config: &FmConfig,
        _beta: f64,
        _best_cut: HyperedgeWeight,
        _cut: HyperedgeWeight,
    ) -> bool {
        self.num_moves >= config.max_number_of_fruitless_moves
    }
}

/// Models the gain sequence as a random walk; stops when the expected
/// progress no longer justifies further steps: `n * mu^2 > alpha * sigma^2
/// + beta`, skipping the degenerate single-step case. Variance is tracked
/// with Welford's recurrence.
#[derive(Debug, Default)]
pub struct RandomWalkModel {
    num_steps: usize,
    expected_gain: f64,
    expected_variance: f64,
    sum_gains: f64,
    mk: f64,
    sk: f64,
}

impl StoppingPolicy for RandomWalkModel {
    fn reset(&mut self) {
        self.num_steps = 0;
        self.expected_gain = 0.0;
        self.expected_variance = 0.0;
        self.sum_gains = 0.0;
        self.mk = 0.0;
        self.sk = 0.0;
    }

    fn update(&mut self, gain: Gain) {
        self.num_steps += 1;
        let gain = gain as f64;
        self.sum_gains += gain;
        self.expected_gain = self.sum_gains / self.num_steps as f64;
        if self.num_steps > 1 {
            let mk_minus_1 = self.mk;
            self.mk = mk_minus_1 + (gain - mk_minus_1) / self.num_steps as f64;
            self.sk += (gain - mk_minus_1) * (gain - self.mk);
            self.expected_variance = self.sk / (self.num_steps - 1) as f64;
        } else {
            self.mk = gain;
            self.sk = 0.0;
        }
    }

    fn should_stop(
        &self,
        _moves_since_best: usize,
        config: &FmConfig,
        beta: f64,
        _best_cut: HyperedgeWeight,
        _cut: HyperedgeWeight,
    ) -> bool {
        self.num_steps as f64 * self.expected_gain * self.expected_gain
            > config.alpha * self.expected_variance + beta
            && self.num_steps != 1
    }
}

/// The nGP variant: compares the moves since the last improvement against a
/// bound derived from the accumulated squared gains and the distance to the
/// best cut.
#[derive(Debug, Default)]
pub struct NGPRandomWalk {
    sum_gains_squared: f64,
}

impl StoppingPolicy for NGPRandomWalk {
    fn reset(&mut self) {
        self.sum_gains_squared = 0.0;
    }

    fn update(&mut self, gain: Gain) {
        self.sum_gains_squared += (gain * gain) as f64;
    }

    fn should_stop(
        &self,
        moves_since_best: usize,
        config: &FmConfig,
        beta: f64,
        best_cut: HyperedgeWeight,
        cut: HyperedgeWeight,
    ) -> bool {
        let distance = best_cut as f64 - cut as f64;
        moves_since_best as f64
            >= config.alpha
                * ((self.sum_gains_squared * moves_since_best as f64)
                    / (2.0 * distance * distance - 0.5)
                    + beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fm_config(max_fruitless: usize, alpha: f64) -> FmConfig {
        FmConfig {
            max_number_of_fruitless_moves: max_fruitless,
            alpha,
            ..FmConfig::default()
        }
    }

    #[test]
    fn fruitless_moves_counts_and_resets() {
        let cfg = fm_config(3, 1.0);
        let mut policy = NumberOfFruitlessMoves::default();
        policy.reset();
        assert!(!policy.should_stop(0, &cfg, 0.0, 10, 10));
        for _ in 0..3 {
            policy.update(0);
        }
        assert!(policy.should_stop(3, &cfg, 0.0, 10, 10));
        policy.reset();
        assert!(!policy.should_stop(0, &cfg, 0.0, 10, 10));
    }

    #[test]
    fn random_walk_never_stops_after_one_step() {
        let cfg = fm_config(100, 1.0);
        let mut policy = RandomWalkModel::default();
        policy.reset();
        policy.update(-5);
        assert!(!policy.should_stop(1, &cfg, 0.0, 10, 15));
    }

    #[test]
    fn random_walk_stops_on_consistent_losses() {
        let cfg = fm_config(100, 1.0);
        let mut policy = RandomWalkModel::default();
        policy.reset();
        // Identical negative gains: zero variance, large n * mu^2.
        for _ in 0..10 {
            policy.update(-2);
        }
        assert!(policy.should_stop(10, &cfg, 1.0, 10, 30));
    }

    #[test]
    fn random_walk_keeps_going_on_noisy_gains() {
        let cfg = fm_config(100, 10.0);
        let mut policy = RandomWalkModel::default();
        policy.reset();
        for g in [5, -5, 5, -5, 5, -5] {
            policy.update(g);
        }
        // Mean near zero, variance large: no stop.
        assert!(!policy.should_stop(6, &cfg, 10.0, 10, 10));
    }

    #[test]
    fn ngp_stops_once_moves_since_best_dominate() {
        let cfg = fm_config(100, 1.0);
        let mut policy = NGPRandomWalk::default();
        policy.reset();
        policy.update(1);
        // best == cut makes the bound negative; any fruitless move stops.
        assert!(policy.should_stop(1, &cfg, 0.0, 10, 10));
        // A clear distance to the best cut keeps the search alive.
        assert!(!policy.should_stop(1, &cfg, 5.0, 10, 30));
    }
}
