use regex::Regex;
use std::sync::LazyLock;

// Three letters, two digits, then the cluster suffix: "prx11a".
static HOST_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{3}[0-9]{2}([a-z]+)").unwrap());

/// Check a host name against the naming convention and return its cluster
/// letter(s), upper-cased. `None` if the name does not follow the convention.
pub fn cluster_letter(host: &str) -> Option<String> {
    HOST_NAME.captures(host)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names_yield_cluster() {
        assert_eq!(cluster_letter("prx11a").as_deref(), Some("A"));
        assert_eq!(cluster_letter("web02bc").as_deref(), Some("BC"));
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert!(cluster_letter("prx11").is_none());
        assert!(cluster_letter("px11a").is_none());
        assert!(cluster_letter("PRX11A").is_none());
        assert!(cluster_letter("").is_none());
    }
}
