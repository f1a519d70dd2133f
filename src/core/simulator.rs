use super::types::MonteCarloResults;

pub const DEFAULT_ITERATIONS: u32 = 1000;

/// Success threshold reuses the 25x rule against the *initial* value,
/// matching the product's definition rather than the deterministic
/// calculator's totalNeeded.
const SUCCESS_MULTIPLE: f64 = 25.0;

/// Runs `iterations` independent trials of annual portfolio growth with
/// returns perturbed uniformly across +/- `volatility` percentage points
/// around `expected_return`, and reduces the final values to
/// nearest-rank percentile bands and a success rate.
///
/// Each trial draws from its own generator seeded off `seed`, so calls
/// share no state and identical seeds reproduce identical results.
pub fn simulate(
    initial_value: f64,
    monthly_contribution: f64,
    years: u32,
    expected_return: f64,
    volatility: f64,
    iterations: u32,
    seed: u64,
) -> MonteCarloResults {
    let annual_contribution = monthly_contribution * 12.0;
    let success_threshold = initial_value * SUCCESS_MULTIPLE;

    let mut finals = Vec::with_capacity(iterations as usize);
    let mut successes = 0_u32;
    for trial in 0..iterations {
        let mut rng = Rng::new(derive_seed(seed, trial));
        let mut portfolio_value = initial_value;
        for _ in 0..years {
            let random_return = expected_return + (rng.next_f64() - 0.5) * volatility * 2.0;
            portfolio_value = portfolio_value * (1.0 + random_return / 100.0) + annual_contribution;
        }
        if portfolio_value >= success_threshold {
            successes += 1;
        }
        finals.push(portfolio_value);
    }

    finals.sort_by(|a, b| a.total_cmp(b));

    MonteCarloResults {
        percentile10: nearest_rank(&finals, 0.1),
        percentile50: nearest_rank(&finals, 0.5),
        percentile90: nearest_rank(&finals, 0.9),
        success_rate: if iterations == 0 {
            0.0
        } else {
            successes as f64 / iterations as f64 * 100.0
        },
    }
}

/// Nearest-rank percentile over an ascending-sorted slice: the value at
/// index floor(n * fraction), no interpolation.
fn nearest_rank(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = ((sorted.len() as f64 * fraction).floor() as usize).min(sorted.len() - 1);
    sorted[index]
}

fn derive_seed(base_seed: u64, trial: u32) -> u64 {
    splitmix64(base_seed ^ ((trial as u64) << 32) ^ trial as u64)
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// xorshift64* generator, local to each trial.
struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        let state = if seed == 0 {
            0xA5A5_A5A5_A5A5_A5A5
        } else {
            seed
        };
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform in (0, 1).
    fn next_f64(&mut self) -> f64 {
        const DENOM: f64 = (1_u64 << 53) as f64;
        let v = self.next_u64() >> 11;
        ((v as f64) + 0.5) / DENOM
    }
}
