//! Column width redistribution.
//!
//! Widths are percentages of the row. After any redistribution they sum to
//! 100 and none is below [`MIN_COLUMN_WIDTH`].

use mailcraft_schema::MIN_COLUMN_WIDTH;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Largest width one column may take in a row of `count` columns
pub fn max_width(count: usize) -> f64 {
    100.0 - MIN_COLUMN_WIDTH * count.saturating_sub(1) as f64
}

/// `count` equal widths summing to 100; the last column absorbs rounding
pub fn equal_widths(count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let share = round2(100.0 / count as f64);
    let mut widths = vec![share; count];
    widths[count - 1] = round2(100.0 - share * (count - 1) as f64);
    widths
}

/// Set column `index` to `requested` and reshape the others around it.
///
/// The request is clamped to `[10, max_width(n)]`. The rest is shared
/// among the other columns in proportion to their current widths; any
/// column whose share would fall under the floor is pinned there and the
/// remainder is re-shared among the rest until nothing moves.
pub fn redistribute(widths: &[f64], index: usize, requested: f64) -> Vec<f64> {
    let count = widths.len();
    if index >= count || !requested.is_finite() {
        return widths.to_vec();
    }
    if count == 1 {
        return vec![100.0];
    }

    let target = requested.clamp(MIN_COLUMN_WIDTH, max_width(count));
    let remaining = 100.0 - target;

    let mut result = vec![0.0; count];
    result[index] = target;

    let mut pinned = vec![false; count];
    pinned[index] = true;

    loop {
        let free: Vec<usize> = (0..count).filter(|&i| !pinned[i]).collect();
        if free.is_empty() {
            break;
        }

        let pinned_total: f64 = (0..count).filter(|&i| pinned[i] && i != index).map(|i| result[i]).sum();
        let budget = remaining - pinned_total;
        let weight: f64 = free.iter().map(|&i| widths[i].max(0.0)).sum();

        let shares: Vec<(usize, f64)> = free
            .iter()
            .map(|&i| {
                let share = if weight > 0.0 {
                    budget * widths[i].max(0.0) / weight
                } else {
                    budget / free.len() as f64
                };
                (i, share)
            })
            .collect();

        let starved: Vec<usize> = shares
            .iter()
            .filter(|(_, share)| *share < MIN_COLUMN_WIDTH)
            .map(|(i, _)| *i)
            .collect();

        if starved.is_empty() {
            for (i, share) in shares {
                result[i] = share;
            }
            break;
        }
        for i in starved {
            pinned[i] = true;
            result[i] = MIN_COLUMN_WIDTH;
        }
    }

    absorb_rounding(&mut result, index);
    result
}

/// Round every width to two decimals and push the drift into the last
/// column other than `index` that can take it without dropping under the
/// floor, falling back to `index` itself.
fn absorb_rounding(widths: &mut [f64], index: usize) {
    for width in widths.iter_mut() {
        *width = round2(*width);
    }

    let drift = 100.0 - widths.iter().sum::<f64>();
    let candidates = (0..widths.len()).rev().filter(|&i| i != index).chain([index]);
    for i in candidates {
        let adjusted = round2(widths[i] + drift);
        if adjusted >= MIN_COLUMN_WIDTH {
            widths[i] = adjusted;
            return;
        }
    }
}
