//! Global and local Moran's I over grid counts
//!
//! - **Global Moran's I**: overall clustering of the count surface, tested
//!   by random relabeling of the counts over the fixed weights
//! - **Local Moran's I (LISA)**: per-cell association with its neighbors,
//!   tested by conditional permutation (the cell's own value held fixed)

use crate::maybe_rayon::*;
use lisagrid_core::{
    CountVector, Error, GlobalStatistic, LocalStatistic, Quadrant, Result, WeightsGraph,
};
use rand::seq::index::sample;
use rand::seq::SliceRandom;
use tracing::debug;

use super::permutation::{batch_rng, cell_rng, infer, Inference, PermutationParams, BATCH_SIZE};

/// Deviations from the mean and their sum of squares
struct Deviations {
    z: Vec<f64>,
    sum_sq: f64,
}

impl Deviations {
    fn new(y: &CountVector) -> Self {
        let values = y.as_f64();
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let z: Vec<f64> = values.iter().map(|v| v - mean).collect();
        let sum_sq = z.iter().map(|d| d * d).sum();
        Self { z, sum_sq }
    }

    /// Zero variance: every cell holds the same count
    fn is_constant(&self) -> bool {
        self.sum_sq / (self.z.len() as f64) < f64::EPSILON
    }
}

fn check_sizes(y: &CountVector, w: &WeightsGraph) -> Result<()> {
    if y.len() != w.len() {
        return Err(Error::SizeMismatch {
            expected: w.len(),
            actual: y.len(),
        });
    }
    Ok(())
}

fn expected_i(n: usize) -> f64 {
    if n > 1 {
        -1.0 / (n as f64 - 1.0)
    } else {
        0.0
    }
}

/// `Σ_i z_i Σ_j w_ij z_j`
fn cross_product(z: &[f64], w: &WeightsGraph) -> f64 {
    (0..z.len()).map(|i| z[i] * w.lag(z, i)).sum()
}

/// Compute Global Moran's I with a permutation pseudo p-value
///
/// # Arguments
/// * `y` - Count per cell
/// * `w` - Row-standardized weights over the same cells
/// * `params` - Permutation count and seed
///
/// # Returns
/// GlobalStatistic with I, E[I], pseudo p-value and z_sim. A constant
/// count vector or a graph without links gives I = 0 and p = 1.
pub fn global_moran(
    y: &CountVector,
    w: &WeightsGraph,
    params: &PermutationParams,
) -> Result<GlobalStatistic> {
    params.validate()?;
    check_sizes(y, w)?;

    let n = y.len();
    let s0 = w.s0();
    let dev = Deviations::new(y);

    if n == 0 || dev.is_constant() || s0 == 0.0 {
        debug!(n, s0, "global Moran's I is degenerate");
        return Ok(GlobalStatistic {
            i: 0.0,
            expected: expected_i(n),
            p_value: 1.0,
            z_sim: 0.0,
            permutations: params.permutations,
        });
    }

    let scale = n as f64 / (s0 * dev.sum_sq);
    let observed = scale * cross_product(&dev.z, w);

    let batches = params.permutations.div_ceil(BATCH_SIZE);
    let per_batch: Vec<Vec<f64>> = (0..batches)
        .into_par_iter()
        .map(|b| {
            let take = BATCH_SIZE.min(params.permutations - b * BATCH_SIZE);
            let mut rng = batch_rng(params.seed, b);
            let mut z = dev.z.clone();
            (0..take)
                .map(|_| {
                    z.shuffle(&mut rng);
                    scale * cross_product(&z, w)
                })
                .collect()
        })
        .collect();
    let simulated: Vec<f64> = per_batch.into_iter().flatten().collect();

    let Inference { p_value, z_sim } = infer(observed, &simulated);
    debug!(i = observed, p_value, z_sim, "global Moran's I");

    Ok(GlobalStatistic {
        i: observed,
        expected: expected_i(n),
        p_value,
        z_sim,
        permutations: params.permutations,
    })
}

/// Compute Local Moran's I for every cell
///
/// `I_i = (n - 1) z_i lag_i / Σ z²`. Each cell's reference distribution
/// redraws its neighbor values, without replacement, from the other n - 1
/// cells. Cells without neighbors get [`LocalStatistic::isolated`].
pub fn local_moran(
    y: &CountVector,
    w: &WeightsGraph,
    params: &PermutationParams,
) -> Result<Vec<LocalStatistic>> {
    params.validate()?;
    check_sizes(y, w)?;

    let n = y.len();
    let dev = Deviations::new(y);

    if dev.is_constant() || w.s0() == 0.0 {
        debug!(n, "local Moran's I is degenerate");
        return Ok((0..n)
            .map(|i| {
                let k = w.neighbor_count(i);
                if k == 0 {
                    LocalStatistic::isolated()
                } else {
                    LocalStatistic {
                        local_i: 0.0,
                        p_value: 1.0,
                        z_sim: 0.0,
                        lag: 0.0,
                        quadrant: Quadrant::Unclassified,
                        neighbor_count: k,
                    }
                }
            })
            .collect());
    }

    let scale = (n as f64 - 1.0) / dev.sum_sq;
    let z = &dev.z;

    let stats: Vec<LocalStatistic> = (0..n)
        .into_par_iter()
        .map(|i| {
            let k = w.neighbor_count(i);
            if k == 0 {
                return LocalStatistic::isolated();
            }

            let lag = w.lag(z, i);
            let local_i = scale * z[i] * lag;
            let weights = w.weights(i);

            let mut rng = cell_rng(params.seed, i);
            let simulated: Vec<f64> = (0..params.permutations)
                .map(|_| {
                    let drawn = sample(&mut rng, n - 1, k);
                    let sim_lag: f64 = drawn
                        .iter()
                        .zip(weights)
                        .map(|(j, wij)| {
                            let j = if j >= i { j + 1 } else { j };
                            wij * z[j]
                        })
                        .sum();
                    scale * z[i] * sim_lag
                })
                .collect();

            let Inference { p_value, z_sim } = infer(local_i, &simulated);
            LocalStatistic {
                local_i,
                p_value,
                z_sim,
                lag,
                quadrant: Quadrant::from_deviation(z[i], lag),
                neighbor_count: k,
            }
        })
        .collect();

    Ok(stats)
}
