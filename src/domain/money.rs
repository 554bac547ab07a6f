use std::fmt;

/// Monetary values are kept as decimal text at rest and only become floating
/// point while a balance is being adjusted. This mirrors the record format the
/// store has always held, at the cost of binary rounding during arithmetic.
pub type Amount = f64;

/// Format an amount with exactly two decimal digits.
/// Example: 100.0 -> "100.00", -12.5 -> "-12.50"
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}

/// Parse decimal text into an amount.
/// Example: "50.00" -> 50.0, "98053" -> 98053.0, "12.5" -> 12.5
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    input
        .parse::<Amount>()
        .map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))
}

/// Add `delta` to the decimal text `balance` and re-encode the result.
pub fn adjust_amount(balance: &str, delta: Amount) -> Result<String, ParseAmountError> {
    let current = parse_amount(balance)?;
    Ok(format_amount(current + delta))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat(input) => {
                write!(f, "invalid decimal amount: '{}'", input)
            }
        }
    }
}

impl std::error::Error for ParseAmountError {}
