pub fn join_street(secondary: Option<&str>, primary: &str) -> String {
    format!("{} {}", secondary.unwrap_or(""), primary)
        .trim()
        .to_string()
}

/// Renders an input address in the same shape the validation service uses
/// for standardized addresses, so unchanged addresses compare equal.
pub fn join_full_address(street: &str, city: &str, state: &str, zip5: Option<&str>) -> String {
    let joined = match zip5 {
        Some(zip5) => format!("{street}, {city}, {state} {zip5}"),
        None => format!("{street}, {city}, {state}"),
    };
    joined.trim().to_string()
}

/// Case-insensitive comparison; whitespace is compared verbatim.
pub fn needs_update(standardized: &str, original: &str) -> bool {
    standardized.to_uppercase() != original.to_uppercase()
}
