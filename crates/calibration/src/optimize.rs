//! Derivative-free optimizers for the calibration fit.
//!
//! Two stages: a global differential-evolution search over box bounds,
//! refined by a local Nelder-Mead simplex. Both are deterministic: the
//! random stream comes from an in-crate LCG seeded by the caller, so the
//! same seed reproduces the same fit bit for bit.

/// Result of an optimizer run.
#[derive(Debug, Clone)]
pub struct OptimResult {
    pub x: Vec<f64>,
    pub fun: f64,
    pub iterations: usize,
}

/// Deterministic linear congruential generator.
///
/// MMIX constants; the top 53 bits feed the float conversion.
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        // Avoid the all-zero state without changing other seeds.
        Self {
            state: seed.wrapping_mul(2862933555777941757).wrapping_add(3037000493),
        }
    }

    /// Uniform sample in [0, 1).
    fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in [0, n).
    fn next_index(&mut self, n: usize) -> usize {
        ((self.next_f64() * n as f64) as usize).min(n - 1)
    }
}

/// Configuration for the differential-evolution stage.
#[derive(Debug, Clone, Copy)]
pub struct DeConfig {
    pub seed: u64,
    pub pop_size: usize,
    pub max_iter: usize,
    /// Dither range for the mutation factor, sampled per generation.
    pub mutation: (f64, f64),
    pub recombination: f64,
    /// Stop early when the population's objective spread falls below this.
    pub tol: f64,
}

impl Default for DeConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            pop_size: 25,
            max_iter: 300,
            mutation: (0.5, 1.5),
            recombination: 0.8,
            tol: 1e-8,
        }
    }
}

/// Global search: differential evolution (best/1/bin) over box bounds.
pub fn differential_evolution<F>(
    mut objective: F,
    bounds: &[(f64, f64)],
    cfg: &DeConfig,
) -> OptimResult
where
    F: FnMut(&[f64]) -> f64,
{
    let dim = bounds.len();
    let mut rng = Lcg::new(cfg.seed);

    // Initialize population uniformly inside the box.
    let mut population: Vec<Vec<f64>> = (0..cfg.pop_size)
        .map(|_| {
            bounds
                .iter()
                .map(|(lo, hi)| lo + rng.next_f64() * (hi - lo))
                .collect()
        })
        .collect();
    let mut scores: Vec<f64> = population.iter().map(|x| objective(x)).collect();

    let mut best_idx = argmin(&scores);
    let mut iterations = 0;

    for _ in 0..cfg.max_iter {
        iterations += 1;
        // Dithered mutation factor, constant within a generation.
        let f = cfg.mutation.0 + rng.next_f64() * (cfg.mutation.1 - cfg.mutation.0);

        for i in 0..cfg.pop_size {
            // Two distinct donors, both different from i and from the best.
            let mut a = rng.next_index(cfg.pop_size);
            while a == i || a == best_idx {
                a = rng.next_index(cfg.pop_size);
            }
            let mut b = rng.next_index(cfg.pop_size);
            while b == i || b == a || b == best_idx {
                b = rng.next_index(cfg.pop_size);
            }

            // best/1/bin mutant with binomial crossover; one gene is always
            // taken from the mutant so the trial differs from the parent.
            let forced = rng.next_index(dim);
            let mut trial = population[i].clone();
            for d in 0..dim {
                if d == forced || rng.next_f64() < cfg.recombination {
                    let v = population[best_idx][d] + f * (population[a][d] - population[b][d]);
                    trial[d] = v.clamp(bounds[d].0, bounds[d].1);
                }
            }

            let trial_score = objective(&trial);
            if trial_score <= scores[i] {
                population[i] = trial;
                scores[i] = trial_score;
                if trial_score < scores[best_idx] {
                    best_idx = i;
                }
            }
        }

        let worst = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if (worst - scores[best_idx]).abs() < cfg.tol {
            break;
        }
    }

    OptimResult {
        x: population[best_idx].clone(),
        fun: scores[best_idx],
        iterations,
    }
}

/// Configuration for the Nelder-Mead refinement stage.
#[derive(Debug, Clone, Copy)]
pub struct NelderMeadConfig {
    pub max_iter: usize,
    /// Convergence tolerance on the simplex spread in x.
    pub xatol: f64,
    /// Convergence tolerance on the objective spread.
    pub fatol: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 5000,
            xatol: 1e-10,
            fatol: 1e-10,
        }
    }
}

/// Local refinement: Nelder-Mead downhill simplex.
pub fn nelder_mead<F>(mut objective: F, x0: &[f64], cfg: &NelderMeadConfig) -> OptimResult
where
    F: FnMut(&[f64]) -> f64,
{
    const ALPHA: f64 = 1.0; // reflection
    const GAMMA: f64 = 2.0; // expansion
    const RHO: f64 = 0.5; // contraction
    const SIGMA: f64 = 0.5; // shrink

    let dim = x0.len();

    // Initial simplex: x0 plus one vertex perturbed along each axis.
    let mut simplex: Vec<Vec<f64>> = vec![x0.to_vec()];
    for d in 0..dim {
        let mut v = x0.to_vec();
        if v[d] != 0.0 {
            v[d] *= 1.05;
        } else {
            v[d] = 0.00025;
        }
        simplex.push(v);
    }
    let mut values: Vec<f64> = simplex.iter().map(|x| objective(x)).collect();

    let mut iterations = 0;
    while iterations < cfg.max_iter {
        iterations += 1;

        // Order vertices best-to-worst.
        let mut order: Vec<usize> = (0..simplex.len()).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let x_spread = simplex[1..]
            .iter()
            .flat_map(|v| v.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        let f_spread = (values[values.len() - 1] - values[0]).abs();
        if x_spread < cfg.xatol && f_spread < cfg.fatol {
            break;
        }

        // Centroid of all but the worst vertex.
        let worst = simplex.len() - 1;
        let mut centroid = vec![0.0; dim];
        for v in &simplex[..worst] {
            for d in 0..dim {
                centroid[d] += v[d];
            }
        }
        for c in &mut centroid {
            *c /= worst as f64;
        }

        let reflect: Vec<f64> = (0..dim)
            .map(|d| centroid[d] + ALPHA * (centroid[d] - simplex[worst][d]))
            .collect();
        let f_reflect = objective(&reflect);

        if f_reflect < values[0] {
            // Try to expand further along the same direction.
            let expand: Vec<f64> = (0..dim)
                .map(|d| centroid[d] + GAMMA * (reflect[d] - centroid[d]))
                .collect();
            let f_expand = objective(&expand);
            if f_expand < f_reflect {
                simplex[worst] = expand;
                values[worst] = f_expand;
            } else {
                simplex[worst] = reflect;
                values[worst] = f_reflect;
            }
        } else if f_reflect < values[worst - 1] {
            simplex[worst] = reflect;
            values[worst] = f_reflect;
        } else {
            // Contract toward the better of reflected/worst.
            let (base, f_base) = if f_reflect < values[worst] {
                (&reflect, f_reflect)
            } else {
                (&simplex[worst].clone(), values[worst])
            };
            let contract: Vec<f64> = (0..dim)
                .map(|d| centroid[d] + RHO * (base[d] - centroid[d]))
                .collect();
            let f_contract = objective(&contract);

            if f_contract < f_base {
                simplex[worst] = contract;
                values[worst] = f_contract;
            } else {
                // Shrink every vertex toward the best.
                let best = simplex[0].clone();
                for i in 1..simplex.len() {
                    for d in 0..dim {
                        simplex[i][d] = best[d] + SIGMA * (simplex[i][d] - best[d]);
                    }
                    values[i] = objective(&simplex[i]);
                }
            }
        }
    }

    let best = argmin(&values);
    OptimResult {
        x: simplex[best].clone(),
        fun: values[best],
        iterations,
    }
}

fn argmin(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v < values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(x: &[f64]) -> f64 {
        x.iter().map(|v| (v - 0.3) * (v - 0.3)).sum()
    }

    #[test]
    fn de_finds_sphere_minimum() {
        let bounds = [(0.0, 1.0), (0.0, 1.0), (0.0, 1.0)];
        let result = differential_evolution(sphere, &bounds, &DeConfig::default());
        assert!(result.fun < 1e-6, "fun = {}", result.fun);
        for v in &result.x {
            assert!((v - 0.3).abs() < 1e-3);
        }
    }

    #[test]
    fn de_is_deterministic_for_a_seed() {
        let bounds = [(0.0, 1.0), (0.0, 1.0)];
        let cfg = DeConfig {
            max_iter: 50,
            ..DeConfig::default()
        };
        let a = differential_evolution(sphere, &bounds, &cfg);
        let b = differential_evolution(sphere, &bounds, &cfg);
        assert_eq!(a.x, b.x);
        assert_eq!(a.fun, b.fun);
    }

    #[test]
    fn nelder_mead_refines_a_rough_start() {
        let result = nelder_mead(sphere, &[0.9, 0.1], &NelderMeadConfig::default());
        assert!(result.fun < 1e-12, "fun = {}", result.fun);
    }
}
