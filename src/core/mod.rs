mod downsample;
mod engine;
mod export;
mod format;
mod summary;
mod types;

pub use downsample::{DEFAULT_MAX_CHART_POINTS, downsample};
pub use engine::{simulate, simulate_with_model, simulation_end_age};
pub use export::results_to_csv;
pub use format::{format_currency, format_number, parse_currency};
pub use summary::{RetirementOutlook, SimulationSummary, summarize};
pub use types::{
    DIVIDEND_YIELD_GROWTH_RATE, EXPENSE_INFLATION_RATE, GrowthModel, STOCK_PRICE_GROWTH_RATE,
    SimulationError, SimulationInput, SimulationResult,
};
