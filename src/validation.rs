//! Input validation and display formatting for the calculator front end
//!
//! Validators are advisory: they return an outcome for display and never
//! block a calculation, which degrades to defaults on bad input.

use crate::engine::resolve_jurisdiction;
use serde::Serialize;

pub const INVALID_ZIP_MESSAGE: &str = "Please enter a valid 5-digit zip code";
pub const UNSUPPORTED_REGION_MESSAGE: &str =
    "This calculator currently serves Maryland, DC, and Northern Virginia only";
pub const MISSING_CONTACT_MESSAGE: &str = "Please enter your email or phone number";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const INVALID_PHONE_MESSAGE: &str = "Please enter a valid 10-digit phone number";

// Consultation booking form
pub const MISSING_NAME_MESSAGE: &str = "Please enter your name";
pub const CONSULTATION_MISSING_CONTACT_MESSAGE: &str = "Please enter email or phone";
pub const CONSULTATION_INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email";
pub const CONSULTATION_INVALID_PHONE_MESSAGE: &str = "Please enter a valid phone number";

/// Result of validating one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationOutcome {
    pub fn ok() -> Self {
        Self { valid: true, error: None }
    }

    pub fn invalid(message: &str) -> Self {
        Self {
            valid: false,
            error: Some(message.to_string()),
        }
    }
}

/// Check a zip is 5 digits and inside the service area
pub fn validate_postal_code(postal_code: &str) -> ValidationOutcome {
    if postal_code.len() != 5 || !postal_code.bytes().all(|b| b.is_ascii_digit()) {
        return ValidationOutcome::invalid(INVALID_ZIP_MESSAGE);
    }

    match resolve_jurisdiction(postal_code) {
        Some(_) => ValidationOutcome::ok(),
        None => ValidationOutcome::invalid(UNSUPPORTED_REGION_MESSAGE),
    }
}

/// `local@domain.tld` shape: no whitespace, exactly one `@`, and a dot
/// inside the domain with text on both sides
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Digits only
pub fn strip_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// 10 digits, or 11 with a country code, once formatting is stripped
pub fn validate_phone(phone: &str) -> bool {
    matches!(strip_phone(phone).len(), 10 | 11)
}

/// Per-field errors for the contact gate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactValidation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ContactValidation {
    pub fn is_valid(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }

    pub fn first_error(&self) -> Option<&str> {
        self.email.as_deref().or(self.phone.as_deref())
    }
}

/// At least one of email or phone is required; each one given must be valid
pub fn validate_contact(email: &str, phone: &str) -> ContactValidation {
    let has_email = !email.trim().is_empty();
    let has_phone = !strip_phone(phone).is_empty();

    if !has_email && !has_phone {
        return ContactValidation {
            email: Some(MISSING_CONTACT_MESSAGE.to_string()),
            phone: None,
        };
    }

    ContactValidation {
        email: (has_email && !validate_email(email)).then(|| INVALID_EMAIL_MESSAGE.to_string()),
        phone: (has_phone && !validate_phone(phone)).then(|| INVALID_PHONE_MESSAGE.to_string()),
    }
}

/// Per-field errors for the consultation booking form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsultationValidation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ConsultationValidation {
    pub fn is_valid(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }

    pub fn first_error(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .or(self.phone.as_deref())
    }
}

/// A name is required, plus email or phone; each one given must be valid
pub fn validate_consultation(name: &str, email: &str, phone: &str) -> ConsultationValidation {
    let has_email = !email.trim().is_empty();
    let has_phone = !phone.trim().is_empty();

    let email_error = if has_email && !validate_email(email.trim()) {
        Some(CONSULTATION_INVALID_EMAIL_MESSAGE)
    } else if !has_email && !has_phone {
        Some(CONSULTATION_MISSING_CONTACT_MESSAGE)
    } else {
        None
    };

    ConsultationValidation {
        name: name.trim().is_empty().then(|| MISSING_NAME_MESSAGE.to_string()),
        email: email_error.map(str::to_string),
        phone: (has_phone && !validate_phone(phone)).then(|| CONSULTATION_INVALID_PHONE_MESSAGE.to_string()),
    }
}

/// `(XXX) XXX-XXXX` for 10 digits, or 11 with a leading 1; anything else unchanged
pub fn format_phone(phone: &str) -> String {
    let digits = strip_phone(phone);
    let local = match digits.len() {
        10 => &digits[..],
        11 if digits.starts_with('1') => &digits[1..],
        _ => return phone.to_string(),
    };
    format!("({}) {}-{}", &local[..3], &local[3..6], &local[6..])
}

/// Whole US dollars with thousands separators, e.g. `$13,000` or `-$1,000`.
/// Cents round half away from zero.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Parse a display amount produced by [`format_currency`]
pub fn parse_currency(text: &str) -> Option<f64> {
    let text = text.trim();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let rest = rest.strip_prefix('$')?;
    let cleaned: String = rest.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CalculatorConfig, RebateCalculator};
    use crate::profile::HouseholdProfile;
    use crate::reference::{HeatingSystem, HomeType, IncomeBracket, SystemAge};

    #[test]
    fn test_postal_code_validation() {
        assert_eq!(validate_postal_code("21201"), ValidationOutcome::ok());
        assert_eq!(validate_postal_code("2120").error.as_deref(), Some(INVALID_ZIP_MESSAGE));
        assert_eq!(validate_postal_code("2120a").error.as_deref(), Some(INVALID_ZIP_MESSAGE));
        assert_eq!(validate_postal_code("").error.as_deref(), Some(INVALID_ZIP_MESSAGE));
        assert_eq!(
            validate_postal_code("00000").error.as_deref(),
            Some(UNSUPPORTED_REGION_MESSAGE)
        );
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("jane@example.com"));
        assert!(validate_email("a.b@mail.example.org"));
        assert!(!validate_email("jane@example"));
        assert!(!validate_email("jane example@x.com"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("jane@@example.com"));
        assert!(!validate_email("jane@.com"));
        assert!(!validate_email("jane@example."));
    }

    #[test]
    fn test_phone_validation() {
        assert!(validate_phone("(410) 555-1234"));
        assert!(validate_phone("1-410-555-1234"));
        assert!(!validate_phone("555-1234"));
    }

    #[test]
    fn test_contact_validation() {
        let missing = validate_contact("  ", "");
        assert_eq!(missing.first_error(), Some(MISSING_CONTACT_MESSAGE));

        assert!(validate_contact("jane@example.com", "").is_valid());
        assert!(validate_contact("", "4105551234").is_valid());

        let both_bad = validate_contact("jane", "123");
        assert_eq!(both_bad.email.as_deref(), Some(INVALID_EMAIL_MESSAGE));
        assert_eq!(both_bad.phone.as_deref(), Some(INVALID_PHONE_MESSAGE));
    }

    #[test]
    fn test_consultation_validation() {
        let empty = validate_consultation("", "", "");
        assert_eq!(empty.name.as_deref(), Some(MISSING_NAME_MESSAGE));
        assert_eq!(empty.email.as_deref(), Some(CONSULTATION_MISSING_CONTACT_MESSAGE));
        assert_eq!(empty.first_error(), Some(MISSING_NAME_MESSAGE));

        assert!(validate_consultation("Jane Doe", "", "(410) 555-1234").is_valid());
        assert!(validate_consultation("Jane Doe", "jane@example.com", "").is_valid());

        let bad = validate_consultation("Jane Doe", "jane@", "555");
        assert_eq!(bad.name, None);
        assert_eq!(bad.email.as_deref(), Some(CONSULTATION_INVALID_EMAIL_MESSAGE));
        assert_eq!(bad.phone.as_deref(), Some(CONSULTATION_INVALID_PHONE_MESSAGE));
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("4105551234"), "(410) 555-1234");
        assert_eq!(format_phone("1 410 555 1234"), "(410) 555-1234");
        assert_eq!(format_phone("24105551234"), "24105551234");
        assert_eq!(format_phone("555"), "555");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(13_000.0), "$13,000");
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.5), "$1,000");
        assert_eq!(format_currency(1_234_567.2), "$1,234,567");
        assert_eq!(format_currency(-1_000.0), "-$1,000");
        assert_eq!(format_currency(-0.4), "$0");
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("$13,000"), Some(13_000.0));
        assert_eq!(parse_currency("-$1,000"), Some(-1_000.0));
        assert_eq!(parse_currency("13000"), None);
        assert_eq!(parse_currency("$"), None);
    }

    #[test]
    fn test_formatting_does_not_touch_result() {
        let calc = RebateCalculator::builtin(CalculatorConfig::for_year(2025));
        let profile = HouseholdProfile::new(
            "21201",
            HomeType::SingleFamily,
            HeatingSystem::GasFurnace,
            SystemAge::Over20,
            IncomeBracket::Low,
        );
        let result = calc.compute_rebates(&profile);
        let before = result.clone();

        let shown = format_currency(result.total_incentives);
        assert_eq!(parse_currency(&shown), Some(result.total_incentives));
        assert_eq!(result, before);
    }
}
