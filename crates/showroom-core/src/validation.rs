// Client-side contact checks, run before any write reaches the backend.

use crate::error::CoreError;
use crate::model::ContactDraft;

const MIN_MOBILE_DIGITS: usize = 10;

/// Reject drafts the backend would refuse anyway.
pub fn validate_contact(draft: &ContactDraft) -> Result<(), CoreError> {
    if draft.name.trim().is_empty() {
        return Err(invalid("name is required"));
    }

    let digits = mobile_digits(&draft.mobile);
    if digits.len() < MIN_MOBILE_DIGITS {
        return Err(invalid(format!(
            "mobile must have at least {MIN_MOBILE_DIGITS} digits"
        )));
    }

    let email = draft.email.as_deref().map(str::trim).unwrap_or_default();
    if !email.is_empty() && !is_plausible_email(email) {
        return Err(invalid(format!("'{email}' is not a valid email address")));
    }

    Ok(())
}

/// Mobile number with formatting (`+`, spaces, dashes, parens) removed.
/// Any other non-digit keeps the number invalid.
pub fn mobile_digits(mobile: &str) -> String {
    let stripped: String = mobile
        .chars()
        .filter(|c| !matches!(c, '+' | ' ' | '-' | '(' | ')' | '.'))
        .collect();
    if stripped.chars().all(|c| c.is_ascii_digit()) {
        stripped
    } else {
        String::new()
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::ValidationFailed {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(mobile: &str, email: Option<&str>) -> ContactDraft {
        ContactDraft {
            name: "Sari".into(),
            mobile: mobile.into(),
            email: email.map(Into::into),
            ..ContactDraft::default()
        }
    }

    #[test]
    fn formatted_mobile_counts_digits_only() {
        assert!(validate_contact(&draft("+62 812-3456-7890", None)).is_ok());
        assert_eq!(mobile_digits("(0812) 345-678"), "0812345678");
    }

    #[test]
    fn short_mobile_is_rejected() {
        let err = validate_contact(&draft("0812-345", None)).unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
    }

    #[test]
    fn letters_in_mobile_are_rejected() {
        assert!(validate_contact(&draft("0812345678x9", None)).is_err());
    }

    #[test]
    fn email_is_checked_when_present() {
        assert!(validate_contact(&draft("081234567890", Some("sari@dealer.id"))).is_ok());
        assert!(validate_contact(&draft("081234567890", Some("   "))).is_ok());
        assert!(validate_contact(&draft("081234567890", Some("sari@dealer"))).is_err());
        assert!(validate_contact(&draft("081234567890", Some("sari dealer.id"))).is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut contact = draft("081234567890", None);
        contact.name = "  ".into();
        assert!(validate_contact(&contact).is_err());
    }
}
