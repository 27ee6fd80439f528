use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Email pattern - RFC 5322 simplified, anchored to the whole input
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9-]+(?:\.[A-Z0-9-]+)*\.[A-Z]{2,}$"
    ).unwrap();
}

/// Whether `candidate` looks like a deliverable mail address.
pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_REGEX.is_match(candidate.trim())
}
