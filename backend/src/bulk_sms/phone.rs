use regex::Regex;
use std::sync::LazyLock;

const COUNTRY_PREFIX: &str = "91";

/// `+91`, a mobile lead digit 6-9, then nine more digits.
static INDIAN_MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+91[6-9]\d{9}$").expect("valid phone regex"));

/// Normalizes a free-text phone cell to `+91XXXXXXXXXX`.
///
/// Non-digits are stripped, one leading zero is dropped, and the `91` prefix
/// is added when missing. Returns `None` when the result is not a valid
/// Indian mobile number; nothing is ever truncated or padded.
pub fn normalize(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = digits.strip_prefix('0').unwrap_or(digits.as_str());

    let candidate = if digits.starts_with(COUNTRY_PREFIX) {
        format!("+{}", digits)
    } else {
        format!("+{}{}", COUNTRY_PREFIX, digits)
    };

    INDIAN_MOBILE.is_match(&candidate).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn bare_ten_digits_get_country_prefix() {
        assert_eq!(normalize("9876543210").as_deref(), Some("+919876543210"));
    }

    #[test]
    fn leading_zero_is_dropped() {
        assert_eq!(normalize("09876543210").as_deref(), Some("+919876543210"));
        assert_eq!(normalize("06123456789").as_deref(), Some("+916123456789"));
    }

    #[test]
    fn canonical_form_is_stable() {
        let once = normalize("+91 98765-43210").unwrap();
        assert_eq!(once, "+919876543210");
        assert_eq!(normalize(&once).as_deref(), Some(once.as_str()));
    }

    #[test]
    fn spreadsheet_noise_is_stripped() {
        assert_eq!(normalize(" (987) 654 3210 ").as_deref(), Some("+919876543210"));
        assert_eq!(normalize("91-7012345678").as_deref(), Some("+917012345678"));
    }

    #[test]
    fn short_numbers_are_rejected() {
        assert_eq!(normalize("987654321"), None);
        assert_eq!(normalize("0987654"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("n/a"), None);
    }

    #[test]
    fn long_numbers_are_rejected() {
        assert_eq!(normalize("98765432101"), None);
    }

    #[test]
    fn landline_lead_digits_are_rejected() {
        assert_eq!(normalize("5876543210"), None);
        assert_eq!(normalize("04423456789"), None);
    }
}
