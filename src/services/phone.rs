/// Normalizes an arbitrarily formatted phone number to digits only,
/// replacing a single leading trunk `0` with the country calling code.
///
/// No further validation happens here: too-short or otherwise odd numbers
/// pass through unchanged and surface later, when a notification send to
/// them fails and is logged.
pub fn normalize(raw: &str, country_code: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.strip_prefix('0') {
        Some(rest) => format!("{country_code}{rest}"),
        None => digits,
    }
}
