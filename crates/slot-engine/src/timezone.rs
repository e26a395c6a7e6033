//! Timezone resolution from IANA names, abbreviations, and city aliases.
//!
//! Attendees describe their timezone loosely ("EST", "India", "Europe/Berlin").
//! Resolution never fails: identifiers that cannot be resolved fall back to
//! UTC and carry a warning the caller can surface.

use chrono_tz::Tz;

/// Common abbreviations and city names mapped to IANA identifiers.
static ALIASES: &[(&str, &str)] = &[
    ("EST", "America/New_York"),
    ("EDT", "America/New_York"),
    ("CST", "America/Chicago"),
    ("CDT", "America/Chicago"),
    ("MST", "America/Denver"),
    ("MDT", "America/Denver"),
    ("PST", "America/Los_Angeles"),
    ("PDT", "America/Los_Angeles"),
    ("IST", "Asia/Kolkata"),
    ("CET", "Europe/Berlin"),
    ("CEST", "Europe/Berlin"),
    ("BST", "Europe/London"),
    ("JST", "Asia/Tokyo"),
    ("AEDT", "Australia/Sydney"),
    ("AEST", "Australia/Sydney"),
    ("New York", "America/New_York"),
    ("India", "Asia/Kolkata"),
    ("Berlin", "Europe/Berlin"),
    ("London", "Europe/London"),
    ("Tokyo", "Asia/Tokyo"),
    ("Sydney", "Australia/Sydney"),
    ("US/Eastern", "America/New_York"),
    ("US/Central", "America/Chicago"),
    ("US/Mountain", "America/Denver"),
    ("US/Pacific", "America/Los_Angeles"),
    ("US/Hawaii", "Pacific/Honolulu"),
    ("US/Alaska", "America/Anchorage"),
];

/// The outcome of resolving a timezone identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedZone {
    pub zone: Tz,
    /// Set when the identifier was not recognised and UTC was substituted.
    pub warning: Option<String>,
}

/// Look up an alias, first exactly and then ignoring ASCII case.
pub fn lookup_alias(name: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        })
        .map(|(_, iana)| *iana)
}

/// Resolve a timezone identifier to a concrete zone.
///
/// Lookup order: alias table, then direct IANA parse, then UTC with a warning.
/// A blank identifier means "unspecified" and resolves to UTC silently.
pub fn resolve_timezone(name: &str) -> ResolvedZone {
    let name = name.trim();
    if name.is_empty() {
        return ResolvedZone {
            zone: Tz::UTC,
            warning: None,
        };
    }

    let candidate = lookup_alias(name).unwrap_or(name);
    match candidate.parse::<Tz>() {
        Ok(zone) => ResolvedZone {
            zone,
            warning: None,
        },
        Err(_) => {
            tracing::warn!(timezone = name, "unknown timezone, defaulting to UTC");
            ResolvedZone {
                zone: Tz::UTC,
                warning: Some(format!("Unknown timezone '{name}', defaulting to UTC")),
            }
        }
    }
}
