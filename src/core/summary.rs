use serde::Serialize;

use super::types::SimulationResult;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetirementOutlook {
    Excellent,
    Good,
    Adequate,
    NeedsAttention,
}

impl RetirementOutlook {
    fn from_sufficiency_rate(rate: f64) -> Self {
        if rate >= 90.0 {
            RetirementOutlook::Excellent
        } else if rate >= 70.0 {
            RetirementOutlook::Good
        } else if rate >= 50.0 {
            RetirementOutlook::Adequate
        } else {
            RetirementOutlook::NeedsAttention
        }
    }
}

/// Headline figures for a finished projection: the terminal position, how
/// many retirement years dividends covered, and the first years where
/// retirement and sufficiency begin. Retirement records are those with zero
/// savings for the year.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub final_age: u32,
    pub final_year: i32,
    pub final_asset_value: f64,
    pub final_cumulative_stocks: f64,
    pub final_annual_dividends: f64,
    pub final_surplus: f64,
    pub retirement_years: u32,
    pub sufficient_retirement_years: u32,
    /// Percentage of retirement years where dividends covered expenses.
    pub sufficiency_rate: f64,
    pub outlook: RetirementOutlook,
    pub first_retirement_age: Option<u32>,
    pub dividends_at_retirement: Option<f64>,
    pub expenses_at_retirement: Option<f64>,
    pub surplus_at_retirement: Option<f64>,
    pub first_sufficient_age: Option<u32>,
}

pub fn summarize(results: &[SimulationResult]) -> Option<SimulationSummary> {
    let last = results.last()?;

    let retirement: Vec<&SimulationResult> = results
        .iter()
        .filter(|r| r.savings_for_year == 0.0)
        .collect();
    let first_retirement = retirement.first().copied();

    let retirement_years = retirement.len() as u32;
    let sufficient_retirement_years = retirement
        .iter()
        .filter(|r| r.is_sufficient_for_living)
        .count() as u32;
    let sufficiency_rate = if retirement_years == 0 {
        0.0
    } else {
        sufficient_retirement_years as f64 / retirement_years as f64 * 100.0
    };

    Some(SimulationSummary {
        final_age: last.age,
        final_year: last.year,
        final_asset_value: last.total_asset_value,
        final_cumulative_stocks: last.cumulative_stocks,
        final_annual_dividends: last.total_dividends,
        final_surplus: last.surplus,
        retirement_years,
        sufficient_retirement_years,
        sufficiency_rate,
        outlook: RetirementOutlook::from_sufficiency_rate(sufficiency_rate),
        first_retirement_age: first_retirement.map(|r| r.age),
        dividends_at_retirement: first_retirement.map(|r| r.total_dividends),
        expenses_at_retirement: first_retirement.map(|r| r.yearly_expenses),
        surplus_at_retirement: first_retirement.map(|r| r.surplus),
        first_sufficient_age: results
            .iter()
            .find(|r| r.is_sufficient_for_living)
            .map(|r| r.age),
    })
}
