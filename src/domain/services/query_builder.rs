use crate::domain::{DomainError, FormState};

/// Build the natural-language question sent to the assistant.
///
/// Expects a state that already passed validation; a date or unit that
/// cannot be parsed is reported as invalid input.
pub fn build_weather_query(state: &FormState) -> Result<String, DomainError> {
    let date = state
        .parsed_date()
        .ok_or_else(|| DomainError::invalid_input(format!("invalid date: {}", state.date)))?;
    let unit = state.unit().ok_or_else(|| {
        DomainError::invalid_input(format!("invalid temperature unit: {}", state.temperature_unit))
    })?;
    let date = date.format("%A, %B %-d, %Y");

    match state.locations.as_slice() {
        [] => Err(DomainError::invalid_input("no locations to ask about")),
        [only] => Ok(format!(
            "What's the weather forecast for {only} on {date}? Please provide the temperature in {}.",
            unit.symbol()
        )),
        many => {
            let places = many
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Ok(format!(
                "What's the weather forecast for the following locations on {date}: {places}? \
                 Please provide the temperature in {} for each.",
                unit.symbol()
            ))
        }
    }
}
