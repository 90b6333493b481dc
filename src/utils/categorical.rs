// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Sampling from a finite set of values with arbitrary non-negative weights.

use anyhow::Result;
use itertools::Itertools;
use rand::Rng;

use crate::errors::Error;

/// Draw one of `values` with probability proportional to `weights`.
///
/// The unit interval is split into `[0, c_0), [c_0, c_1), ...` along the cumulative
/// normalized weights. The last value with positive weight owns the upper end of the
/// interval up to and including 1, so that rounding in the cumulative sum can never
/// leave a uniform draw unassigned. Values with zero weight are never returned.
pub fn draw<T, R>(values: &[T], weights: &[f64], rng: &mut R) -> Result<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if values.len() != weights.len() {
        return Err(Error::LengthMismatch {
            values: values.len(),
            weights: weights.len(),
        }
        .into());
    }

    let sum: f64 = weights.iter().sum();
    if !sum.is_finite() || sum <= 0.0 || weights.iter().any(|w| *w < 0.0) {
        return Err(Error::DegenerateDistribution { sum }.into());
    }
    let last = weights
        .iter()
        .rposition(|w| *w > 0.0)
        .ok_or(Error::DegenerateDistribution { sum })?;

    let cumulative = weights
        .iter()
        .scan(0.0, |acc, w| {
            *acc += w / sum;
            Some(*acc)
        })
        .collect_vec();

    let u: f64 = rng.gen();
    let selected = cumulative[..last]
        .iter()
        .position(|c| u < *c)
        .unwrap_or(last);

    values
        .get(selected)
        .cloned()
        .ok_or_else(|| Error::InvariantViolation { u }.into())
}
