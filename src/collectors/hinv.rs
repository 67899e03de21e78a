use crate::models::disk::ServerInventory;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

// "Rack location:   Datacenter A, Rack 12, position: 20,21"
static RACK_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Rack location:\s+(.*),\s\w").unwrap());
static POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)position:\s(\d+,\d+|\d+)").unwrap());
static ASSET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Serial\s:\s(\w+)[ \t]*$").unwrap());
static MODEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)HW type\s:\s(.*?)[ \t]*$").unwrap());
static WARRANTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)HW\swarranty\s\(epoch\)\s:\s(\d+)").unwrap());

/// Pull location and asset data out of the monitoring system's hardware
/// inventory. Never fails: missing fields stay `None`.
pub fn extract_inventory(text: &str) -> ServerInventory {
    let text = text.replace("\r\n", "\n");

    let (location, rack) = match capture(&RACK_LOCATION, &text) {
        Some(loc) => {
            let mut parts = loc.split(", ");
            (non_empty(parts.next()), non_empty(parts.next()))
        }
        None => (None, None),
    };

    let inv = ServerInventory {
        location,
        rack,
        rack_unit:      capture(&POSITION, &text),
        asset_tag:      capture(&ASSET_TAG, &text),
        model:          capture(&MODEL, &text),
        warranty_epoch: warranty_epoch(&text),
    };

    let required = [
        ("location",  &inv.location),
        ("rack",      &inv.rack),
        ("rack unit", &inv.rack_unit),
        ("asset tag", &inv.asset_tag),
        ("model",     &inv.model),
    ];
    for (name, value) in required {
        if value.is_none() {
            warn!(field = name, "hardware inventory is missing a field");
        }
    }
    inv
}

fn warranty_epoch(text: &str) -> Option<i64> {
    let raw = match capture(&WARRANTY, text) {
        Some(r) => r,
        None => {
            debug!("no warranty epoch in inventory");
            return None;
        }
    };
    match raw.parse::<i64>() {
        Ok(secs) => Some(secs),
        Err(e) => {
            warn!(raw = %raw, error = %e, "unparseable warranty epoch");
            None
        }
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
pub(crate) const SAMPLE_HINV: &str = "\
prx11a|hinv|green||1526478000|1526478000|1526481600|0|0|10.0.0.1|0|
green Wed May 16 14:00:00 2018 Hardware inventory OK

Rack location:   Datacenter A, Rack 12, position: 20,21
Serial : 7XKQ2L2
HW type : PowerEdge R720
HW warranty (epoch) : 1735689600
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_full_inventory() {
        let inv = extract_inventory(SAMPLE_HINV);
        assert_eq!(inv.location.as_deref(), Some("Datacenter A"));
        assert_eq!(inv.rack.as_deref(), Some("Rack 12"));
        assert_eq!(inv.rack_unit.as_deref(), Some("20,21"));
        assert_eq!(inv.asset_tag.as_deref(), Some("7XKQ2L2"));
        assert_eq!(inv.model.as_deref(), Some("PowerEdge R720"));
        assert_eq!(inv.warranty_epoch, Some(1_735_689_600));
    }

    #[test]
    fn single_rack_unit() {
        let inv = extract_inventory("Rack location:   Site B, Rack 3, position: 7\n");
        assert_eq!(inv.rack_unit.as_deref(), Some("7"));
        assert_eq!(inv.location.as_deref(), Some("Site B"));
    }

    #[test]
    fn missing_fields_are_none_not_errors() {
        let inv = extract_inventory("HW type : PowerEdge R630\n");
        assert_eq!(inv.model.as_deref(), Some("PowerEdge R630"));
        assert!(inv.location.is_none());
        assert!(inv.rack.is_none());
        assert!(inv.asset_tag.is_none());
        assert!(inv.warranty_epoch.is_none());

        assert_eq!(extract_inventory(""), ServerInventory::default());
    }

    #[test]
    fn overflowing_warranty_is_dropped() {
        let inv = extract_inventory("HW warranty (epoch) : 99999999999999999999999\n");
        assert!(inv.warranty_epoch.is_none());
    }
}
