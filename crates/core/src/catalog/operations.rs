use super::error::CatalogError;

/// Validates an ISBN-13 identity key. Only emptiness is rejected; the
/// catalog source is trusted for the format.
pub fn validate_isbn13(isbn13: &str) -> Result<(), CatalogError> {
    if isbn13.trim().is_empty() {
        return Err(CatalogError::EmptyIsbn);
    }
    Ok(())
}

/// Validates an engine-assigned row id.
pub fn validate_row_id(id: i64) -> Result<(), CatalogError> {
    if id <= 0 {
        return Err(CatalogError::InvalidRowId(id));
    }
    Ok(())
}

/// Validates an optional row id on an insert. `None` is accepted because the
/// store assigns one.
pub fn validate_optional_row_id(id: Option<i64>) -> Result<(), CatalogError> {
    match id {
        Some(id) => validate_row_id(id),
        None => Ok(()),
    }
}

/// Parses a catalog display price such as `"$32.04"` into cents.
///
/// Returns `None` for prices that are not a plain dollar amount
/// (e.g. `"Free"` or an empty string).
pub fn parse_price_cents(price: &str) -> Option<u64> {
    let amount = price.trim().trim_start_matches('$').trim();
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole: u64 = whole.parse().ok()?;
    let cents: u64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };
    whole.checked_mul(100)?.checked_add(cents)
}

/// Formats cents as a catalog display price (`"$12.50"`).
pub fn format_price_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Sums the parseable prices of the given items. Unparseable prices are
/// returned separately so callers can report them.
pub fn sum_prices<'a, I>(prices: I) -> (u64, Vec<&'a str>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total = 0u64;
    let mut skipped = Vec::new();
    for price in prices {
        match parse_price_cents(price) {
            Some(cents) => total = total.saturating_add(cents),
            None => skipped.push(price),
        }
    }
    (total, skipped)
}
