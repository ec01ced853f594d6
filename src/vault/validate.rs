//! Per-field value validators for item schemas.
//!
//! Every validator returns `Err(reason)` with a short, user-facing
//! explanation so the caller can wrap it in a `ValidationFailure`.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

/// A field predicate: `Ok(())` accepts the value.
pub type Validator = fn(&str) -> std::result::Result<(), &'static str>;

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in pattern is valid"))
}

fn card_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^\d{4} \d{4} \d{4} \d{4}$")
}

fn cvv_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^\d{3,4}$")
}

fn expiration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^\d{2}/\d{2}$")
}

fn strict_email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
}

fn basic_email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^[^@]+@[^@]+\.[^@]+$")
}

pub fn any(_: &str) -> std::result::Result<(), &'static str> {
    Ok(())
}

pub fn non_empty(value: &str) -> std::result::Result<(), &'static str> {
    if value.is_empty() {
        Err("must not be empty")
    } else {
        Ok(())
    }
}

/// An absolute URL with a host, e.g. `https://example.com/login`.
pub fn url(value: &str) -> std::result::Result<(), &'static str> {
    non_empty(value)?;
    match Url::parse(value) {
        Ok(parsed) if parsed.has_host() => Ok(()),
        _ => Err("must be a valid URL such as https://example.com"),
    }
}

/// Full address syntax; empty means "not set".
pub fn optional_email(value: &str) -> std::result::Result<(), &'static str> {
    if value.is_empty() || strict_email_re().is_match(value) {
        Ok(())
    } else {
        Err("must be a valid email address")
    }
}

/// Basic `local@domain.tld` syntax; empty means "not set".
pub fn optional_basic_email(value: &str) -> std::result::Result<(), &'static str> {
    if value.is_empty() || basic_email_re().is_match(value) {
        Ok(())
    } else {
        Err("must look like local@domain.tld")
    }
}

pub fn card_number(value: &str) -> std::result::Result<(), &'static str> {
    if card_number_re().is_match(value) {
        Ok(())
    } else {
        Err("must be four groups of four digits, e.g. 1234 5678 9012 3456")
    }
}

pub fn cvv(value: &str) -> std::result::Result<(), &'static str> {
    if cvv_re().is_match(value) {
        Ok(())
    } else {
        Err("must be three or four digits")
    }
}

/// `MM/YY`; empty means "not set".
pub fn optional_expiration(value: &str) -> std::result::Result<(), &'static str> {
    if value.is_empty() || expiration_re().is_match(value) {
        Ok(())
    } else {
        Err("must be in MM/YY format")
    }
}

/// Optional leading `+`, digits separated by spaces, dashes, dots or
/// parentheses, 7 to 15 digits in total (the E.164 maximum).
pub fn optional_phone(value: &str) -> std::result::Result<(), &'static str> {
    const REASON: &str = "must be a phone number with 7 to 15 digits";

    if value.is_empty() {
        return Ok(());
    }

    let body = value.strip_prefix('+').unwrap_or(value);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')'))
    {
        return Err(REASON);
    }

    let digits = body.chars().filter(char::is_ascii_digit).count();
    if (7..=15).contains(&digits) {
        Ok(())
    } else {
        Err(REASON)
    }
}
