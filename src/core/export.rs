use super::format::{format_currency, format_number};
use super::types::SimulationResult;

// Cells carry decimal commas, so rows are semicolon-separated.
const HEADER: &str = "Year;Age;Annual Savings;Stocks Purchased;Cumulative Stocks;\
Stocks From Dividends;Stock Price;Dividend Per Share;Total Dividends;\
Reinvested Dividends;Total Asset Value;Yearly Expenses;Status;Surplus";

/// Serialize the full projection as a spreadsheet-ready table, one row per
/// simulated year plus a header.
pub fn results_to_csv(results: &[SimulationResult]) -> String {
    let mut out = String::with_capacity((results.len() + 1) * 128);
    out.push_str(HEADER);
    out.push('\n');

    for r in results {
        let status = if r.is_sufficient_for_living {
            "Sufficient"
        } else {
            "Insufficient"
        };
        out.push_str(&format!(
            "{};{};{};{};{};{};{};{};{};{};{};{};{};{}\n",
            r.year,
            r.age,
            format_currency(r.savings_for_year),
            format_number(r.total_stocks_purchased),
            format_number(r.cumulative_stocks),
            format_number(r.stocks_from_dividends),
            format_currency(r.stock_price),
            format_currency(r.dividend_per_share),
            format_currency(r.total_dividends),
            format_currency(r.reinvested_dividends),
            format_currency(r.total_asset_value),
            format_currency(r.yearly_expenses),
            status,
            format_currency(r.surplus),
        ));
    }

    out
}
