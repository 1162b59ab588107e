//! Phone number canonicalization and the SMS country allow-list.
//!
//! Every lookup, insert and comparison of a phone number goes through
//! [`normalize_phone`] first, so `"+1 (555) 123-4567"`, `"15551234567"` and
//! `"+15551234567"` all refer to the same user.

/// Calling-code prefixes we are willing to send SMS to.
pub const ALLOWED_COUNTRY_CODES: &[&str] = &[
    "+1",   // US/Canada
    "+61",  // Australia
    "+64",  // New Zealand
    "+44",  // UK
    "+49",  // Germany
    "+33",  // France
    "+34",  // Spain
    "+351", // Portugal
    "+41",  // Switzerland
    "+31",  // Netherlands
    "+43",  // Austria
    "+36",  // Hungary
    "+46",  // Sweden
    "+47",  // Norway
    "+358", // Finland
    "+48",  // Poland
    "+420", // Czech Republic
    "+421", // Slovakia
    "+40",  // Romania
    "+380", // Ukraine
    "+30",  // Greece
    "+353", // Ireland
    "+32",  // Belgium
    "+386", // Slovenia
    "+385", // Croatia
    "+370", // Lithuania
    "+371", // Latvia
    "+372", // Estonia
    "+357", // Cyprus
    "+90",  // Turkey
];

/// Shortest normalized number accepted as a lookup or invite target
pub const MIN_PHONE_LEN: usize = 8;

/// User-facing message for numbers outside the allow-list.
pub const UNSUPPORTED_REGION_MESSAGE: &str = "Phone number from unsupported country. We currently only support US, Canada, Australia, New Zealand, UK, and select European countries.";

/// Strip everything except digits and `+`, then make sure the result starts
/// with `+`. Total over any input.
pub fn normalize_phone(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if kept.starts_with('+') {
        kept
    } else {
        format!("+{}", kept)
    }
}

/// True iff the number (normalized first) starts with an allowed calling code.
pub fn is_allowed_country(phone: &str) -> bool {
    let normalized = normalize_phone(phone);
    ALLOWED_COUNTRY_CODES
        .iter()
        .any(|code| normalized.starts_with(code))
}

/// Hide all but the last four digits, e.g. `+1******4567`.
///
/// The leading `+` and first digit stay visible so the country is still
/// recognisable on public pages.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    let visible_tail = 4;
    let visible_head = if phone.starts_with('+') { 2 } else { 1 };

    if chars.len() <= visible_head + visible_tail {
        return phone.to_string();
    }

    chars
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i < visible_head || i >= chars.len() - visible_tail {
                *c
            } else {
                '*'
            }
        })
        .collect()
}
