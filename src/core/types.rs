use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct SimulationInput {
    pub start_age: u32,
    pub retirement_age: u32,
    pub savings_per_year: f64,
    pub stock_price: f64,
    /// Annual dividend as a percentage of the share price, 0..=100.
    pub dividend_yield: f64,
    pub monthly_expenses: f64,
    pub reinvest_dividends: bool,
    pub start_year: i32,
}

pub const STOCK_PRICE_GROWTH_RATE: f64 = 0.08;
pub const DIVIDEND_YIELD_GROWTH_RATE: f64 = 0.05;
pub const EXPENSE_INFLATION_RATE: f64 = 0.03;

/// Fixed market assumptions applied every simulated year. Not exposed on
/// the HTTP surface; tests override individual rates through
/// `simulate_with_model`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthModel {
    pub stock_price_growth_rate: f64,
    /// Applied as `yield * (1 + rate / 100)`, so the default 0.05 bumps the
    /// yield by 0.05% of itself each year.
    pub dividend_yield_growth_rate: f64,
    pub expense_inflation_rate: f64,
}

impl Default for GrowthModel {
    fn default() -> Self {
        Self {
            stock_price_growth_rate: STOCK_PRICE_GROWTH_RATE,
            dividend_yield_growth_rate: DIVIDEND_YIELD_GROWTH_RATE,
            expense_inflation_rate: EXPENSE_INFLATION_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub age: u32,
    pub year: i32,
    pub savings_for_year: f64,
    pub total_stocks_purchased: f64,
    pub cumulative_stocks: f64,
    pub stock_price: f64,
    pub dividend_per_share: f64,
    pub total_dividends: f64,
    pub reinvested_dividends: f64,
    pub stocks_from_dividends: f64,
    pub total_asset_value: f64,
    pub yearly_expenses: f64,
    pub is_sufficient_for_living: bool,
    pub surplus: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("retirement age must be greater than start age")]
    RetirementBeforeStart,
    #[error("retirement age must be at most 100")]
    RetirementTooLate,
    #[error("stock price must be a positive, finite amount")]
    NonPositiveStockPrice,
    #[error("dividend yield must be between 0 and 100 percent")]
    DividendYieldOutOfRange,
    #[error("{field} must be a non-negative, finite amount")]
    InvalidAmount { field: &'static str },
}
