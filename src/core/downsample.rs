use super::types::SimulationResult;

pub const DEFAULT_MAX_CHART_POINTS: usize = 30;

/// Reduce a long yearly sequence to at most `max_points` milestones for
/// charting. Short sequences pass through untouched. Long ones keep the
/// first and last records, the records around the first zero-savings year,
/// and an evenly spaced subsample of the rest, de-duplicated by year and
/// returned in chronological order.
pub fn downsample(results: &[SimulationResult], max_points: usize) -> Vec<SimulationResult> {
    if results.len() <= max_points {
        return results.to_vec();
    }

    let mut milestones: Vec<SimulationResult> = Vec::new();
    milestones.push(results[0].clone());

    if let Some(idx) = results.iter().position(|r| r.savings_for_year == 0.0) {
        if idx > 0 {
            if idx > 1 {
                milestones.push(results[idx - 1].clone());
            }
            milestones.push(results[idx].clone());
            if idx < results.len() - 1 {
                milestones.push(results[idx + 1].clone());
            }
        }
    }

    // Budget for the evenly spaced interior, leaving room for the last record.
    let budget = max_points.saturating_sub(milestones.len() + 1).max(1);
    let spacing = results.len().div_ceil(budget).max(1);
    let mut i = spacing;
    while i < results.len() - 1 {
        if !milestones.iter().any(|m| m.year == results[i].year) {
            milestones.push(results[i].clone());
        }
        i += spacing;
    }

    let last = &results[results.len() - 1];
    if !milestones.iter().any(|m| m.year == last.year) {
        milestones.push(last.clone());
    }

    milestones.sort_by_key(|r| r.year);
    milestones
}
