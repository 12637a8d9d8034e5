use rand::Rng;

/// Draws one item with probability proportional to its weight.
///
/// Returns `None` only for an empty input. When no item carries positive
/// weight the draw is uniform over all items.
pub fn select_weighted<'a, T, R>(items: &'a [(T, f64)], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    let weights: Vec<f64> = items.iter().map(|(_, weight)| *weight).collect();
    select_index(&weights, rng).map(|idx| &items[idx].0)
}

/// Index-based form of [`select_weighted`]
pub fn select_index<R>(weights: &[f64], rng: &mut R) -> Option<usize>
where
    R: Rng + ?Sized,
{
    if weights.is_empty() {
        return None;
    }

    let total = total_weight(weights);
    if total.is_infinite() {
        // Overflowing sum; the same draw on weights relative to the largest one
        return select_index(&rescale(weights), rng);
    }
    if !has_positive_mass(total) {
        return Some(rng.gen_range(0..weights.len()));
    }

    let draw = rng.gen_range(0.0..total);
    Some(scan_cumulative(weights, draw))
}

/// Cumulative-weight scan: the first index whose running total exceeds `draw`.
///
/// `draw` is expected in `[0, total)`. Rounding can leave the running total at
/// or below a draw close to `total`; the last positively weighted index wins then.
pub fn scan_cumulative(weights: &[f64], draw: f64) -> usize {
    let mut cumulative = 0.0;
    let mut last_positive = 0;

    for (idx, &weight) in weights.iter().enumerate() {
        let weight = effective_weight(weight);
        if weight <= 0.0 {
            continue;
        }

        cumulative += weight;
        last_positive = idx;
        if cumulative > draw {
            return idx;
        }
    }

    last_positive
}

pub fn total_weight(weights: &[f64]) -> f64 {
    weights.iter().map(|&w| effective_weight(w)).sum()
}

// Negative and NaN weights never attract a draw
fn effective_weight(weight: f64) -> f64 {
    if weight > 0.0 { weight } else { 0.0 }
}

/// Weights divided by the largest one. Infinite weights share the whole mass.
fn rescale(weights: &[f64]) -> Vec<f64> {
    let max = weights
        .iter()
        .map(|&w| effective_weight(w))
        .fold(0.0, f64::max);

    weights
        .iter()
        .map(|&w| {
            let weight = effective_weight(w);
            if max.is_infinite() {
                if weight.is_infinite() { 1.0 } else { 0.0 }
            } else {
                weight / max
            }
        })
        .collect()
}

fn has_positive_mass(total: f64) -> bool {
    total > 0.0 && total.is_finite()
}
