use crate::models::disk::ControllerSelfTest;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static RAID_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Virtual Disk.*(RAID-\d+)").unwrap());
static RAID_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Virtual Disk.*is\s(\w+):?").unwrap());
static TEST_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\|hw-disk\|(\w+)\|").unwrap());

/// Parse the monitoring system's disk health check.
///
/// This report is cached by the monitoring server, so it is available even
/// when the host itself is not. Missing fields are logged and left blank.
pub fn extract_self_test(text: &str) -> ControllerSelfTest {
    ControllerSelfTest {
        raid_type:   field(&RAID_TYPE, text, "RAID type"),
        raid_status: field(&RAID_STATUS, text, "RAID status"),
        test_status: field(&TEST_STATUS, text, "Test status"),
    }
}

fn field(re: &Regex, text: &str, name: &str) -> String {
    match re.captures(text).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().to_string(),
        None => {
            warn!(field = name, "disk health check is missing a field");
            String::new()
        }
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_HWDISK: &str = "\
prx11a|hw-disk|red||1526478000|1526478000|1526481600|0|0|10.0.0.1|0|
red Wed May 16 14:00:00 2018 RAID check

red Virtual Disk 0 (RAID-10) is Degraded: 1 physical disk(s) failed
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_raid_and_test_status() {
        let t = extract_self_test(SAMPLE_HWDISK);
        assert_eq!(t.raid_type, "RAID-10");
        assert_eq!(t.raid_status, "Degraded");
        assert_eq!(t.test_status, "red");
    }

    #[test]
    fn missing_fields_stay_blank() {
        let t = extract_self_test("host|hw-disk|green|\nno virtual disks\n");
        assert_eq!(t.test_status, "green");
        assert_eq!(t.raid_type, "");
        assert_eq!(t.raid_status, "");
        assert_eq!(extract_self_test(""), ControllerSelfTest::default());
    }
}
