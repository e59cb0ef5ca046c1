//! Field format validators for firewall groups.
//!
//! Patterns are anchored: the whole value has to match, not a substring.

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper-case letters and underscores.
pub static GROUP_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z_]+$").expect("group name pattern is valid"));

/// Lower-case letters, periods and hyphens.
pub static HOSTNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z.-]+$").expect("hostname pattern is valid"));

/// Four dot-separated groups of one to three digits.
pub static IP_ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}$")
        .expect("ip address pattern is valid")
});

/// Returns true if `value` is a valid group name.
#[must_use]
pub fn is_group_name(value: &str) -> bool {
    GROUP_NAME_PATTERN.is_match(value)
}

/// Returns true if `value` is a valid hostname.
#[must_use]
pub fn is_hostname(value: &str) -> bool {
    HOSTNAME_PATTERN.is_match(value)
}

/// Returns true if `value` is a dotted quad with every octet in `0..=255`.
#[must_use]
pub fn is_ip_address(value: &str) -> bool {
    IP_ADDRESS_PATTERN.is_match(value)
        && value.split('.').all(|octet| octet.parse::<u8>().is_ok())
}

/// Validates the `group_name` field, returning one message per problem.
#[must_use]
pub fn validate_group_name(value: &str, key: &str) -> Vec<String> {
    if is_group_name(value) {
        Vec::new()
    } else {
        vec![format!(
            "{key:?} includes invalid characters. May contain [uppercase letters, underscores]."
        )]
    }
}

/// Validates the `hostname` field, returning one message per problem.
#[must_use]
pub fn validate_hostname(value: &str, key: &str) -> Vec<String> {
    if is_hostname(value) {
        Vec::new()
    } else {
        vec![format!(
            "{key:?} must be a fully qualified domain name. May contain [letters, hyphens, periods]."
        )]
    }
}

/// Validates the `ip_address` field, returning one message per problem.
#[must_use]
pub fn validate_ip_address(value: &str, key: &str) -> Vec<String> {
    if is_ip_address(value) {
        Vec::new()
    } else {
        vec![format!(
            "{key:?} must be an IPv4 address in dotted-quad form (e.g. 10.0.0.1)."
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_name_accepts_upper_and_underscore() {
        for value in ["WEB", "WEB_SERVERS", "_", "DMZ_HOSTS_"] {
            assert!(is_group_name(value), "{value} should be accepted");
        }
    }

    #[test]
    fn group_name_rejects_other_characters() {
        for value in ["", "web", "Web_Servers", "WEB-SERVERS", "WEB1", "WEB SERVERS"] {
            assert!(!is_group_name(value), "{value} should be rejected");
        }
    }

    #[test]
    fn hostname_accepts_lowercase_fqdn() {
        for value in ["host", "web.example.com", "db-primary.internal", "a.b-c.d"] {
            assert!(is_hostname(value), "{value} should be accepted");
        }
    }

    #[test]
    fn hostname_rejects_uppercase_and_symbols() {
        for value in ["", "Web.example.com", "HOST", "host_name", "host name", "host/1"] {
            assert!(!is_hostname(value), "{value} should be rejected");
        }
    }

    #[test]
    fn ip_address_accepts_dotted_quad() {
        for value in ["10.0.0.1", "192.168.1.254", "0.0.0.0", "255.255.255.255"] {
            assert!(is_ip_address(value), "{value} should be accepted");
        }
    }

    #[test]
    fn ip_address_rejects_non_numeric_and_out_of_range() {
        for value in [
            "",
            "10.0.0",
            "10.0.0.a",
            "a.b.c.d",
            "10.0.0.1.5",
            "256.0.0.1",
            "1000.0.0.1",
            " 10.0.0.1",
            "10.0.0.1/24",
        ] {
            assert!(!is_ip_address(value), "{value} should be rejected");
        }
    }

    #[test]
    fn validator_messages_name_the_key() {
        let errors = validate_group_name("web", "group_name");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("\"group_name\" includes invalid characters"));

        let errors = validate_hostname("WEB", "hostname");
        assert!(errors[0].contains("fully qualified domain name"));

        let errors = validate_ip_address("x.x.x.x", "ip_address");
        assert!(errors[0].starts_with("\"ip_address\""));
    }

    #[test]
    fn validators_return_nothing_for_valid_values() {
        assert!(validate_group_name("WEB", "group_name").is_empty());
        assert!(validate_hostname("web.example.com", "hostname").is_empty());
        assert!(validate_ip_address("10.1.2.3", "ip_address").is_empty());
    }
}
