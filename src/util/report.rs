use crate::config::{Site, TemplateConfig};
use crate::models::classification::ClassificationResult;
use crate::models::disk::DiskRecord;
use crate::models::server::ServerSnapshot;
use crate::util::human::{close_section, field, fmt_warranty, open_section, or_blank};
use crate::util::templates;

pub const OFFLINE_WARNING: &str =
    "The server may be offline! The following information may not be accurate.\n\n";

/// Which disk fields a listing shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiskView {
    /// Rebuild tracking: ends with progress
    Rebuild,
    /// Live screen: rebuild fields without the bus protocol
    Live,
    /// Tickets: ends with the failure prediction
    Ticket,
    /// Every extracted field
    Full,
}

pub fn disk_fields(d: &DiskRecord, view: DiskView) -> Vec<(&'static str, String)> {
    let mut f = vec![
        ("ID",         d.id.clone()),
        ("Status",     d.status.clone()),
        ("State",      d.state.label().to_string()),
    ];
    match view {
        DiskView::Rebuild | DiskView::Live | DiskView::Ticket => {
            f.push(("Serial No.", d.serial_number.clone()));
            f.push(("Capacity",   d.capacity_display.clone()));
            if view != DiskView::Live {
                f.push(("Bus Protocol", d.bus_protocol.clone()));
            }
            if view == DiskView::Ticket {
                f.push(("Failure Predicted", d.failure_predicted_label().to_string()));
            } else {
                f.push(("Progress", d.progress.clone()));
            }
        }
        DiskView::Full => {
            f.push(("Bus Protocol",      d.bus_protocol.clone()));
            f.push(("Media",             d.media.clone()));
            f.push(("Failure Predicted", d.failure_predicted_label().to_string()));
            f.push(("Progress",          d.progress.clone()));
            f.push(("Capacity",          d.capacity_display.clone()));
            f.push(("Raw capacity",      d.capacity_raw.clone()));
            f.push(("Product ID",        d.product_id.clone()));
            f.push(("Serial No.",        d.serial_number.clone()));
        }
    }
    f
}

pub fn push_disks(out: &mut String, disks: &[DiskRecord], view: DiskView) {
    for d in disks {
        out.push('\n');
        for (label, value) in disk_fields(d, view) {
            out.push_str(&field(label, &value));
        }
    }
}

fn push_counts(out: &mut String, result: &ClassificationResult) {
    for (label, n) in result.counts() {
        out.push_str(&field(label, &n.to_string()));
    }
}

fn push_self_test(out: &mut String, snap: &ServerSnapshot) {
    for (label, value) in snap.self_test.fields() {
        out.push_str(&field(label, value));
    }
}

fn offline_prefix(out: &mut String, snap: &ServerSnapshot) {
    if !snap.disks.reachable {
        out.push_str(OFFLINE_WARNING);
    }
}

// ── Report modes ──────────────────────────────────────────────────────

/// Opening lines: which host and which cluster.
pub fn header(snap: &ServerSnapshot, site: &Site) -> String {
    format!(
        "Gathering disks information for {}\n\nCluster {} {} {}\n\n",
        snap.host, snap.cluster, site.name, site.code
    )
}

/// Physical location, asset data and warranty.
pub fn location(snap: &ServerSnapshot, site: &Site) -> String {
    let inv = &snap.inventory;
    let mut out = open_section("Server location");
    out.push_str(&field("Location",     or_blank(&inv.location)));
    out.push_str(&field("Rack",         or_blank(&inv.rack)));
    out.push_str(&field("RU",           or_blank(&inv.rack_unit)));
    out.push_str(&field("Asset tag",    or_blank(&inv.asset_tag)));
    out.push_str(&field("Server model", or_blank(&inv.model)));
    let epoch = inv.warranty_epoch.map(|e| e.to_string()).unwrap_or_default();
    out.push_str(&field("Warranty epoch", &epoch));
    match fmt_warranty(inv) {
        Some(date) => out.push_str(&field("Warranty", &date)),
        None       => out.push_str("\nThe Warranty epoch is missing\n"),
    }
    out.push_str(&format!("\nURL:\n{}\n", site.url));
    out.push_str(&close_section());
    out
}

/// Default report: health check, disk counts, rebuild details and, when
/// anything needs attention (or `force_templates`), the ticket templates.
pub fn full(snap: &ServerSnapshot, site: &Site, tpl: &TemplateConfig, force_templates: bool) -> String {
    let mut out = String::new();
    offline_prefix(&mut out, snap);

    out.push_str(&open_section("Disk health check"));
    push_self_test(&mut out, snap);
    out.push_str(&close_section());

    out.push_str(&open_section("Disk report"));
    push_counts(&mut out, &snap.disks);
    if !snap.disks.rebuilding.is_empty() {
        out.push_str("Details of disks rebuilding:\n");
        push_disks(&mut out, &snap.disks.rebuilding, DiskView::Rebuild);
    }
    out.push_str(&close_section());

    if snap.disks.has_findings() || force_templates {
        out.push_str(&templates::ticket(snap, tpl));
        out.push_str(&templates::delivery_email(snap, site, tpl));
        out.push_str(&templates::smart_hands(snap, tpl));
    }
    out
}

/// One screen summary: where it is, RAID health, how many disks per category.
pub fn compact(snap: &ServerSnapshot) -> String {
    let inv = &snap.inventory;
    let mut out = String::new();
    offline_prefix(&mut out, snap);
    out.push_str(&open_section("Compact report"));
    out.push_str(&field("Location",     or_blank(&inv.location)));
    out.push_str(&field("Rack",         or_blank(&inv.rack)));
    out.push_str(&field("RU",           or_blank(&inv.rack_unit)));
    out.push_str(&field("Asset tag",    or_blank(&inv.asset_tag)));
    out.push_str(&field("Server model", or_blank(&inv.model)));
    push_self_test(&mut out, snap);
    push_counts(&mut out, &snap.disks);
    out.push_str(&close_section());
    out
}

/// Every field of every disk, for audits and spare-part orders.
pub fn serial(snap: &ServerSnapshot) -> String {
    let mut out = String::new();
    offline_prefix(&mut out, snap);
    out.push_str(&open_section("Disk information and serial numbers"));
    push_self_test(&mut out, snap);
    push_disks(&mut out, &snap.disks.all, DiskView::Full);
    out.push_str(&close_section());
    out
}

/// Static summary printed after the live view closes.
pub fn rebuilding_summary(result: &ClassificationResult) -> String {
    let mut out = open_section("Disk(s) rebuilding");
    if !result.reachable {
        out.push_str("The server may be offline! Rebuild state is unknown.\n");
    }
    out.push_str(&format!("Rebuilding: {}\n", result.rebuilding.len()));
    push_disks(&mut out, &result.rebuilding, DiskView::Rebuild);
    out.push_str(&close_section());
    out
}

#[cfg(test)]
pub(crate) fn sample_snapshot() -> ServerSnapshot {
    use crate::classify::classify;
    use crate::collectors::{hinv, hwdisk, omreport};

    ServerSnapshot {
        host:          "prx11a".into(),
        cluster:       "A".into(),
        inventory:     hinv::extract_inventory(hinv::SAMPLE_HINV),
        self_test:     hwdisk::extract_self_test(hwdisk::SAMPLE_HWDISK),
        self_test_log: hwdisk::SAMPLE_HWDISK.to_string(),
        disks:         classify(&omreport::extract_disks(omreport::SAMPLE_REPORT)),
    }
}
