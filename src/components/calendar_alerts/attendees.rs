use std::collections::HashMap;

/// Rendered in place of an attendee list when the event declares none.
pub const NO_ATTENDEES: &str = "no attendees listed";

/// Map raw attendee identities to display strings.
///
/// Identities arrive as ICS ATTENDEE values ("mailto:ann@example.com");
/// the scheme prefix is stripped, then the mention table is consulted.
/// Unknown identities pass through cleaned, never dropped. Empty input
/// yields a single placeholder entry so the attendees line always renders.
pub fn resolve(raw: &[String], mentions: &HashMap<String, String>) -> Vec<String> {
    if raw.is_empty() {
        return vec![NO_ATTENDEES.to_string()];
    }

    raw.iter()
        .map(|identity| {
            let cleaned = identity
                .strip_prefix("mailto:")
                .or_else(|| identity.strip_prefix("MAILTO:"))
                .unwrap_or(identity)
                .trim();
            mentions
                .get(cleaned)
                .cloned()
                .unwrap_or_else(|| cleaned.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentions() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("ann@example.com".to_string(), "@ann".to_string());
        map
    }

    #[test]
    fn test_known_identity_becomes_mention() {
        let raw = vec!["mailto:ann@example.com".to_string()];
        assert_eq!(resolve(&raw, &mentions()), vec!["@ann"]);
    }

    #[test]
    fn test_unknown_identity_passes_through_cleaned() {
        let raw = vec!["mailto:stranger@example.com".to_string()];
        assert_eq!(resolve(&raw, &mentions()), vec!["stranger@example.com"]);
    }

    #[test]
    fn test_uppercase_prefix_is_stripped() {
        let raw = vec!["MAILTO:ann@example.com".to_string()];
        assert_eq!(resolve(&raw, &mentions()), vec!["@ann"]);
    }

    #[test]
    fn test_identity_without_prefix_kept() {
        let raw = vec!["Conference room 2".to_string()];
        assert_eq!(resolve(&raw, &mentions()), vec!["Conference room 2"]);
    }

    #[test]
    fn test_empty_input_yields_placeholder() {
        assert_eq!(resolve(&[], &mentions()), vec![NO_ATTENDEES]);
    }

    #[test]
    fn test_order_is_preserved() {
        let raw = vec![
            "mailto:zed@example.com".to_string(),
            "mailto:ann@example.com".to_string(),
        ];
        assert_eq!(resolve(&raw, &mentions()), vec!["zed@example.com", "@ann"]);
    }
}
