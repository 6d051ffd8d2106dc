use super::types::{GrowthModel, SimulationError, SimulationInput, SimulationResult};

const POST_RETIREMENT_YEARS: u32 = 10;
const MAX_SIMULATION_AGE: u32 = 100;

/// Last simulated age, inclusive.
pub fn simulation_end_age(retirement_age: u32) -> u32 {
    (retirement_age + POST_RETIREMENT_YEARS).min(MAX_SIMULATION_AGE)
}

#[derive(Debug, Clone, Copy)]
struct YearState {
    age: u32,
    year: i32,
    cumulative_stocks: f64,
    stock_price: f64,
    dividend_yield: f64,
    yearly_expenses: f64,
}

impl YearState {
    fn initial(input: &SimulationInput) -> Self {
        Self {
            age: input.start_age,
            year: input.start_year,
            cumulative_stocks: 0.0,
            stock_price: input.stock_price,
            dividend_yield: input.dividend_yield / 100.0,
            yearly_expenses: input.monthly_expenses * 12.0,
        }
    }
}

pub fn simulate(input: &SimulationInput) -> Result<Vec<SimulationResult>, SimulationError> {
    simulate_with_model(input, &GrowthModel::default())
}

pub fn simulate_with_model(
    input: &SimulationInput,
    model: &GrowthModel,
) -> Result<Vec<SimulationResult>, SimulationError> {
    validate(input)?;

    let end_age = simulation_end_age(input.retirement_age);
    let mut results = Vec::with_capacity((end_age - input.start_age + 1) as usize);
    let mut state = YearState::initial(input);

    while state.age <= end_age {
        let (result, next) = advance_year(state, input, model);
        results.push(result);
        state = next;
    }

    Ok(results)
}

fn advance_year(
    state: YearState,
    input: &SimulationInput,
    model: &GrowthModel,
) -> (SimulationResult, YearState) {
    let savings_for_year = if state.age < input.retirement_age {
        input.savings_per_year
    } else {
        0.0
    };
    let stocks_purchased = savings_for_year / state.stock_price;

    let dividend_per_share = state.stock_price * state.dividend_yield;
    // Dividends accrue on the previous year's closing position.
    let total_dividends = state.cumulative_stocks * dividend_per_share;

    let reinvesting = input.reinvest_dividends && state.age < input.retirement_age;
    let (reinvested_dividends, stocks_from_dividends) = if reinvesting {
        (total_dividends, total_dividends / state.stock_price)
    } else {
        (0.0, 0.0)
    };

    let cumulative_stocks = state.cumulative_stocks + stocks_purchased + stocks_from_dividends;
    let total_asset_value = cumulative_stocks * state.stock_price;

    // Reinvested dividends are not spendable income.
    let available_dividends = if reinvesting { 0.0 } else { total_dividends };
    let is_sufficient_for_living = available_dividends >= state.yearly_expenses;
    let surplus = available_dividends - state.yearly_expenses;

    let result = SimulationResult {
        age: state.age,
        year: state.year,
        savings_for_year: round2(savings_for_year),
        total_stocks_purchased: round2(stocks_purchased),
        cumulative_stocks: round2(cumulative_stocks),
        stock_price: round2(state.stock_price),
        dividend_per_share: round2(dividend_per_share),
        total_dividends: round2(total_dividends),
        reinvested_dividends: round2(reinvested_dividends),
        stocks_from_dividends: round2(stocks_from_dividends),
        total_asset_value: round2(total_asset_value),
        yearly_expenses: round2(state.yearly_expenses),
        is_sufficient_for_living,
        surplus: round2(surplus),
    };

    let next = YearState {
        age: state.age + 1,
        year: state.year + 1,
        cumulative_stocks,
        stock_price: state.stock_price * (1.0 + model.stock_price_growth_rate),
        dividend_yield: state.dividend_yield * (1.0 + model.dividend_yield_growth_rate / 100.0),
        yearly_expenses: state.yearly_expenses * (1.0 + model.expense_inflation_rate),
    };

    (result, next)
}

fn validate(input: &SimulationInput) -> Result<(), SimulationError> {
    if input.retirement_age <= input.start_age {
        return Err(SimulationError::RetirementBeforeStart);
    }
    if input.retirement_age > MAX_SIMULATION_AGE {
        return Err(SimulationError::RetirementTooLate);
    }
    if !input.stock_price.is_finite() || input.stock_price <= 0.0 {
        return Err(SimulationError::NonPositiveStockPrice);
    }
    if !input.dividend_yield.is_finite() || !(0.0..=100.0).contains(&input.dividend_yield) {
        return Err(SimulationError::DividendYieldOutOfRange);
    }
    for (field, value) in [
        ("savings per year", input.savings_per_year),
        ("monthly expenses", input.monthly_expenses),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(SimulationError::InvalidAmount { field });
        }
    }
    Ok(())
}

// Two decimals; ties on the scaled value round toward positive infinity.
fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}
