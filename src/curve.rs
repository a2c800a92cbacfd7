//! Education-impact curve from a handful of anchor values
//!
//! Anchors are spread evenly over the run (positions truncated to whole
//! years) and joined by straight lines. Years outside the anchors follow the
//! nearest segment.

use crate::error::{SimError, SimResult};

/// Whole-year positions of `count` anchors spread over `years`
pub fn anchor_years(count: usize, years: u32) -> Vec<u32> {
    match count {
        0 => Vec::new(),
        1 => vec![0],
        _ => {
            let last = f64::from(years.saturating_sub(1));
            (0..count)
                .map(|i| (last * i as f64 / (count - 1) as f64) as u32)
                .collect()
        }
    }
}

/// Per-year series of length `years` through the anchor values
pub fn interpolate_anchors(anchors: &[f64], years: u32) -> SimResult<Vec<f64>> {
    if anchors.is_empty() {
        return Err(SimError::InvalidCurve("at least one anchor is required".to_string()));
    }
    if let Some(bad) = anchors.iter().find(|v| !v.is_finite()) {
        return Err(SimError::NonFinite(format!("education curve anchor {}", bad)));
    }

    // Anchors landing on the same year collapse to the last value given
    let mut points: Vec<(f64, f64)> = Vec::with_capacity(anchors.len());
    for (year, &value) in anchor_years(anchors.len(), years).into_iter().zip(anchors) {
        let x = f64::from(year);
        match points.last_mut() {
            Some(last) if last.0 == x => last.1 = value,
            _ => points.push((x, value)),
        }
    }

    if points.len() == 1 {
        return Ok(vec![points[0].1; years as usize]);
    }

    let series = (0..years)
        .map(|t| {
            let t = f64::from(t);
            let segment = points
                .windows(2)
                .position(|w| t <= w[1].0)
                .unwrap_or(points.len() - 2);
            let (x0, y0) = points[segment];
            let (x1, y1) = points[segment + 1];
            y0 + (y1 - y0) * (t - x0) / (x1 - x0)
        })
        .collect();
    Ok(series)
}
