use chrono::{DateTime, Local, TimeZone};
use serde::{Serialize, Serializer};

/// Controller-reported state of one physical disk.
///
/// Only the three words the classifier acts on get their own variant;
/// everything else the controller may print is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiskState {
    Online,
    Ready,
    Rebuilding,
    Other(String),
}

impl DiskState {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Online"     => DiskState::Online,
            "Ready"      => DiskState::Ready,
            "Rebuilding" => DiskState::Rebuilding,
            other        => DiskState::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DiskState::Online     => "Online",
            DiskState::Ready      => "Ready",
            DiskState::Rebuilding => "Rebuilding",
            DiskState::Other(raw) => raw,
        }
    }
}

impl Serialize for DiskState {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}

/// One physical disk slot as observed in a single poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskRecord {
    pub id:                String,   // bus position, e.g. "0:0:0"
    pub status:            String,   // "Ok", "Critical", ...
    pub state:             DiskState,
    pub bus_protocol:      String,   // "SAS", "SATA"
    pub media:             String,   // "HDD", "SSD"
    pub failure_predicted: bool,
    pub progress:          String,   // "Not Applicable" or "42%"
    pub capacity_raw:      String,   // "558.38 GB"
    pub capacity_display:  String,   // "600 GB", empty when unknown
    pub product_id:        String,
    pub serial_number:     String,
}

impl DiskRecord {
    /// Drive bay as printed on the chassis: last character of the bus id.
    pub fn bay(&self) -> &str {
        match self.id.char_indices().last() {
            Some((i, _)) => &self.id[i..],
            None         => "",
        }
    }

    pub fn failure_predicted_label(&self) -> &'static str {
        if self.failure_predicted { "Yes" } else { "No" }
    }
}

/// Static facts about the host from the hardware inventory test.
///
/// Every field is optional: the inventory is routinely incomplete and the
/// caller gets whatever subset was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerInventory {
    pub location:       Option<String>,
    pub rack:           Option<String>,
    pub rack_unit:      Option<String>,
    pub asset_tag:      Option<String>,
    pub model:          Option<String>,
    /// Seconds since the Unix epoch. `None` means the inventory had no value.
    pub warranty_epoch: Option<i64>,
}

impl ServerInventory {
    pub fn warranty_date(&self) -> Option<DateTime<Local>> {
        self.warranty_epoch
            .and_then(|secs| Local.timestamp_opt(secs, 0).single())
    }
}

/// RAID health as seen by the monitoring system's own disk check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControllerSelfTest {
    pub raid_type:   String,
    pub raid_status: String,
    pub test_status: String,
}

impl ControllerSelfTest {
    /// Label/value pairs in report order.
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("RAID type",   &self.raid_type),
            ("RAID status", &self.raid_status),
            ("Test status", &self.test_status),
        ]
    }
}

#[cfg(test)]
pub(crate) fn sample_disk(id: &str, state: DiskState, predicted: bool) -> DiskRecord {
    DiskRecord {
        id:                id.to_string(),
        status:            "Ok".into(),
        state,
        bus_protocol:      "SAS".into(),
        media:             "HDD".into(),
        failure_predicted: predicted,
        progress:          "Not Applicable".into(),
        capacity_raw:      "558.38 GB".into(),
        capacity_display:  "600 GB".into(),
        product_id:        "ST3600057SS".into(),
        serial_number:     format!("SN{}", id.replace(':', "")),
    }
}
