//! Kubernetes object, label and environment variable naming rules.
//!
//! Each check returns `Err(reason)` with a short human-readable reason so
//! validation can surface it verbatim.

/// Maximum length of a DNS-1123 label (container names, label name parts).
pub const DNS1123_LABEL_MAX_LEN: usize = 63;

/// Maximum length of a DNS-1123 subdomain (object names, label key prefixes).
pub const DNS1123_SUBDOMAIN_MAX_LEN: usize = 253;

/// Maximum length of a label value.
pub const LABEL_VALUE_MAX_LEN: usize = 63;

fn is_lower_alnum(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

fn check_label_segment(segment: &str) -> Result<(), String> {
    if segment.is_empty() {
        return Err("must not contain empty segments".into());
    }
    if let Some(bad) = segment.chars().find(|c| !is_lower_alnum(*c) && *c != '-') {
        return Err(format!(
            "contains '{bad}'; only lowercase alphanumerics and '-' are allowed"
        ));
    }
    let starts_ok = segment.chars().next().is_some_and(is_lower_alnum);
    let ends_ok = segment.chars().last().is_some_and(is_lower_alnum);
    if !starts_ok || !ends_ok {
        return Err("must start and end with a lowercase alphanumeric".into());
    }
    Ok(())
}

/// Check a DNS-1123 label, e.g. a container name.
pub fn check_dns1123_label(value: &str) -> Result<(), String> {
    if value.len() > DNS1123_LABEL_MAX_LEN {
        return Err(format!(
            "must be at most {DNS1123_LABEL_MAX_LEN} characters"
        ));
    }
    if value.contains('.') {
        return Err("must not contain '.'".into());
    }
    check_label_segment(value)
}

/// Check a DNS-1123 subdomain, e.g. a Deployment name.
pub fn check_dns1123_subdomain(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("must not be empty".into());
    }
    if value.len() > DNS1123_SUBDOMAIN_MAX_LEN {
        return Err(format!(
            "must be at most {DNS1123_SUBDOMAIN_MAX_LEN} characters"
        ));
    }
    value.split('.').try_for_each(check_label_segment)
}

/// Name part of a label key and non-empty label values share this rule.
fn check_qualified_part(value: &str, what: &str) -> Result<(), String> {
    if value.len() > LABEL_VALUE_MAX_LEN {
        return Err(format!(
            "{what} must be at most {LABEL_VALUE_MAX_LEN} characters"
        ));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.'))
    {
        return Err(format!("{what} contains invalid character '{bad}'"));
    }
    let starts_ok = value.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
    let ends_ok = value.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());
    if !starts_ok || !ends_ok {
        return Err(format!("{what} must start and end with an alphanumeric"));
    }
    Ok(())
}

/// Check a label or annotation key: `[prefix/]name`.
pub fn check_label_key(key: &str) -> Result<(), String> {
    let (prefix, name) = match key.split_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };

    if let Some(prefix) = prefix {
        check_dns1123_subdomain(prefix).map_err(|reason| format!("prefix {reason}"))?;
    }
    if name.is_empty() {
        return Err("name part must not be empty".into());
    }
    check_qualified_part(name, "name part")
}

/// Check a label value. Empty values are allowed.
pub fn check_label_value(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    check_qualified_part(value, "value")
}

/// Check an environment variable name.
pub fn check_env_name(name: &str) -> Result<(), String> {
    let Some(first) = name.chars().next() else {
        return Err("must not be empty".into());
    };
    if first.is_ascii_digit() {
        return Err("must not start with a digit".into());
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.'))
    {
        return Err(format!("contains invalid character '{bad}'"));
    }
    Ok(())
}
