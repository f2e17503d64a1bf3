//! Derivative-free bounded simplex minimizer.
//!
//! Nelder-Mead restricted to a box: every trial point is clamped to the
//! supplied bounds before evaluation. Termination mirrors the usual
//! simplex criteria (function spread and coordinate spread below the
//! tolerance) with a hard iteration cap.

use crate::error::{EvolutionError, EvolutionResult};

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Relative nudge building the initial simplex from a nonzero
/// coordinate; absolute nudge for zero coordinates.
const NONZERO_DELTA: f64 = 0.05;
const ZERO_DELTA: f64 = 0.00025;

const DEFAULT_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone)]
pub(crate) struct MinimizeResult {
    pub x: Vec<f64>,
    pub fun: f64,
    pub iterations: usize,
}

fn clamp(x: &mut [f64], bounds: &[(f64, f64)]) {
    for (value, (low, high)) in x.iter_mut().zip(bounds.iter()) {
        *value = value.clamp(*low, *high);
    }
}

/// Minimize `objective` over the box `bounds`, starting from `x0`.
///
/// The objective may fail (it calls into the simulator); failures
/// propagate immediately.
pub(crate) fn minimize<F>(
    mut objective: F,
    x0: &[f64],
    bounds: &[(f64, f64)],
    tolerance: f64,
    max_iter: usize,
) -> EvolutionResult<MinimizeResult>
where
    F: FnMut(&[f64]) -> EvolutionResult<f64>,
{
    let dims = x0.len();
    if dims == 0 || bounds.len() != dims {
        return Err(EvolutionError::OptimizationFailed {
            message: format!(
                "need a non-empty parameter vector with matching bounds, got {} params and {} bounds",
                dims,
                bounds.len()
            ),
        });
    }
    let tolerance = if tolerance > 0.0 {
        tolerance
    } else {
        DEFAULT_TOLERANCE
    };

    // Initial simplex: x0 plus one nudged vertex per dimension.
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dims + 1);
    let mut start = x0.to_vec();
    clamp(&mut start, bounds);
    simplex.push(start.clone());
    for i in 0..dims {
        let mut vertex = start.clone();
        if vertex[i] != 0.0 {
            vertex[i] *= 1.0 + NONZERO_DELTA;
        } else {
            vertex[i] = ZERO_DELTA;
        }
        clamp(&mut vertex, bounds);
        simplex.push(vertex);
    }

    let mut values = Vec::with_capacity(dims + 1);
    for vertex in &simplex {
        values.push(objective(vertex)?);
    }

    let mut iterations = 0;
    while iterations < max_iter {
        iterations += 1;

        // Ascending by objective value; index 0 is the best vertex.
        let mut order: Vec<usize> = (0..simplex.len()).collect();
        order.sort_by(|a, b| values[*a].total_cmp(&values[*b]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let value_spread = values[dims] - values[0];
        let coord_spread = simplex[1..]
            .iter()
            .flat_map(|v| v.iter().zip(simplex[0].iter()))
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f64, f64::max);
        if value_spread <= tolerance && coord_spread <= tolerance {
            break;
        }

        // Centroid of all vertices but the worst.
        let mut centroid = vec![0.0; dims];
        for vertex in &simplex[..dims] {
            for (c, v) in centroid.iter_mut().zip(vertex.iter()) {
                *c += v / dims as f64;
            }
        }

        let worst = simplex[dims].clone();
        let mut reflected: Vec<f64> = centroid
            .iter()
            .zip(worst.iter())
            .map(|(c, w)| c + REFLECT * (c - w))
            .collect();
        clamp(&mut reflected, bounds);
        let reflected_value = objective(&reflected)?;

        if reflected_value < values[0] {
            // Try expanding past the reflection.
            let mut expanded: Vec<f64> = centroid
                .iter()
                .zip(worst.iter())
                .map(|(c, w)| c + EXPAND * (c - w))
                .collect();
            clamp(&mut expanded, bounds);
            let expanded_value = objective(&expanded)?;
            if expanded_value < reflected_value {
                simplex[dims] = expanded;
                values[dims] = expanded_value;
            } else {
                simplex[dims] = reflected;
                values[dims] = reflected_value;
            }
        } else if reflected_value < values[dims - 1] {
            simplex[dims] = reflected;
            values[dims] = reflected_value;
        } else {
            // Contract toward the centroid, inside or outside.
            let toward = if reflected_value < values[dims] {
                &reflected
            } else {
                &worst
            };
            let mut contracted: Vec<f64> = centroid
                .iter()
                .zip(toward.iter())
                .map(|(c, t)| c + CONTRACT * (t - c))
                .collect();
            clamp(&mut contracted, bounds);
            let contracted_value = objective(&contracted)?;

            if contracted_value < values[dims].min(reflected_value) {
                simplex[dims] = contracted;
                values[dims] = contracted_value;
            } else {
                // Shrink everything toward the best vertex.
                let best = simplex[0].clone();
                for i in 1..=dims {
                    for (v, b) in simplex[i].iter_mut().zip(best.iter()) {
                        *v = b + SHRINK * (*v - b);
                    }
                    clamp(&mut simplex[i], bounds);
                    values[i] = objective(&simplex[i])?;
                }
            }
        }
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    Ok(MinimizeResult {
        x: simplex[best].clone(),
        fun: values[best],
        iterations,
    })
}
