use crate::models::disk::{DiskRecord, DiskState};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Marketing sizes for the raw capacities the controller reports.
/// Closed list: an unlisted raw value maps to an empty display string.
const CAPACITY_TABLE: [(&str, &str); 6] = [
    ("418.63 GB",   "450 GB"),
    ("558.38 GB",   "600 GB"),
    ("931.00 GB",   "1 TB"),
    ("1,862.50 GB", "2 TB"),
    ("2,794.00 GB", "3 TB"),
    ("3,725.50 GB", "4 TB"),
];

/// Look up the human-facing size for a raw controller capacity.
pub fn capacity_display(raw: &str) -> &'static str {
    CAPACITY_TABLE.iter()
        .find(|(k, _)| *k == raw.trim())
        .map(|(_, v)| *v)
        .unwrap_or("")
}

// ── Field patterns ────────────────────────────────────────────────────

const FIELD_COUNT: usize = 10;

/// One regex per field, in the order the controller prints them.
/// Each captures the value in group 1.
static FIELDS: LazyLock<[(&'static str, Regex); FIELD_COUNT]> = LazyLock::new(|| {
    let re = |p: &str| Regex::new(&format!("(?m){}", p)).unwrap();
    [
        ("ID",                re(r"^ID[ \t]+:[ \t](.*?)[ \t]*$")),
        ("Status",            re(r"^Status[ \t]+:[ \t](.*?)[ \t]*$")),
        ("State",             re(r"^State[ \t]+:[ \t](\w+)[ \t]*$")),
        ("Bus Protocol",      re(r"^Bus Protocol.*:[ \t](\w+)[ \t]*$")),
        ("Media",             re(r"^Media.*:[ \t](\w+)[ \t]*$")),
        ("Failure Predicted", re(r"^Failure Predicted.*:[ \t](\w+)[ \t]*$")),
        ("Progress",          re(r"^Progress.*:[ \t](.*?)[ \t]*$")),
        ("Capacity",          re(r"^Capacity.*:[ \t](.*?)[ \t]\(.*$")),
        ("Product ID",        re(r"^Product ID.*:[ \t](\w+)[ \t]*$")),
        ("Serial No.",        re(r"^Serial.*:[ \t](\w+)[ \t]*$")),
    ]
});

static BLOCK_SEP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

// ── Extraction ────────────────────────────────────────────────────────

/// Split a controller physical-disk report into blank-line separated blocks
/// and turn every complete block into a `DiskRecord`.
///
/// Blocks where any field is missing or repeated are dropped whole.
pub fn extract_disks(report: &str) -> Vec<DiskRecord> {
    let text = report.replace("\r\n", "\n");
    let mut disks = Vec::new();

    for (n, block) in BLOCK_SEP.split(&text).enumerate() {
        if block.trim().is_empty() { continue; }
        match parse_block(block) {
            Ok(disk) => disks.push(disk),
            Err(unmatched) if unmatched.len() == FIELD_COUNT => {
                debug!(block = n, "no disk fields in block, skipping");
            }
            Err(unmatched) => {
                warn!(block = n, fields = ?unmatched, "dropping incomplete disk block");
            }
        }
    }
    disks
}

/// Parse one block. On failure returns the names of the fields that did not
/// match exactly once.
fn parse_block(block: &str) -> Result<DiskRecord, Vec<&'static str>> {
    let mut values: [Option<String>; FIELD_COUNT] = Default::default();
    let mut unmatched = Vec::new();

    for (i, (name, re)) in FIELDS.iter().enumerate() {
        match single_capture(re, block) {
            Some(v) => values[i] = Some(v),
            None    => unmatched.push(*name),
        }
    }
    if !unmatched.is_empty() {
        return Err(unmatched);
    }

    let [id, status, state, bus, media, predicted, progress, capacity, product, serial] =
        values.map(Option::unwrap_or_default);

    let capacity_display = capacity_display(&capacity);
    if capacity_display.is_empty() {
        debug!(disk = %id, raw = %capacity, "capacity not in size table");
    }

    Ok(DiskRecord {
        id,
        status,
        state:             DiskState::parse(&state),
        bus_protocol:      bus,
        media,
        failure_predicted: predicted != "No",
        progress,
        capacity_display:  capacity_display.to_string(),
        capacity_raw:      capacity,
        product_id:        product,
        serial_number:     serial,
    })
}

/// Value of group 1 if the pattern matches exactly once in `block`.
fn single_capture(re: &Regex, block: &str) -> Option<String> {
    let mut caps = re.captures_iter(block);
    let first = caps.next()?;
    if caps.next().is_some() { return None; }
    first.get(1).map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
pub(crate) const SAMPLE_REPORT: &str = "\
List of Physical Disks on Controller PERC H710 Mini (Embedded)

Controller PERC H710 Mini (Embedded)
ID                              : 0:1:0
Status                          : Ok
Name                            : Physical Disk 0:1:0
State                           : Online
Power Status                    : Spun Up
Bus Protocol                    : SAS
Media                           : HDD
Failure Predicted               : No
Progress                        : Not Applicable
Capacity                        : 558.38 GB (599550590976 bytes)
Used RAID Disk Space            : 558.38 GB (599550590976 bytes)
Vendor ID                       : DELL(tm)
Product ID                      : ST600MM0006
Serial No.                      : S0M1ABCD
Part Number                     : CN0G8FWP7262236N0164A00

ID                              : 0:1:1
Status                          : Non-Critical
Name                            : Physical Disk 0:1:1
State                           : Rebuilding
Bus Protocol                    : SAS
Media                           : HDD
Failure Predicted               : No
Progress                        : 37%
Capacity                        : 931.00 GB (999653638144 bytes)
Product ID                      : ST1000NM0001
Serial No.                      : Z1N2EFGH
Part Number                     : CN0G8FWP7262236N0164A01

ID                              : 0:1:2
Status                          : Critical
Name                            : Physical Disk 0:1:2
State                           : Failed
Bus Protocol                    : SAS
Media                           : HDD
Failure Predicted               : Yes
Progress                        : Not Applicable
Capacity                        : 12.00 GB (12884901888 bytes)
Product ID                      : ST600MM0006
Serial No.                      : S0M1IJKL
Part Number                     : CN0G8FWP7262236N0164A02
";
