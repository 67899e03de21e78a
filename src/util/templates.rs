//! Copy-paste templates for the ticket, the spare-disk delivery request and
//! the remote-hands replacement request.

use crate::config::{Site, TemplateConfig};
use crate::models::disk::DiskRecord;
use crate::models::server::ServerSnapshot;
use crate::util::human::{close_section, field, fmt_warranty, open_section, or_blank};
use crate::util::report::{push_disks, DiskView};

const REVIEW_NOTE: &str = "NOTE: Review this template before using it!\n\n\n";

/// "600 GB SAS": what to order for a replacement.
fn disk_size(d: &DiskRecord) -> String {
    format!("{} {}", d.capacity_display, d.bus_protocol)
}

fn code_block(out: &mut String, title: &str, disks: &[DiskRecord]) {
    if disks.is_empty() { return; }
    out.push_str("-----\n{code:java}\n");
    out.push_str(&format!("{}: {}\n", title, disks.len()));
    push_disks(out, disks, DiskView::Ticket);
    out.push_str("{code}\n");
}

pub fn ticket(snap: &ServerSnapshot, tpl: &TemplateConfig) -> String {
    let inv = &snap.inventory;
    let mut out = open_section("Template: Ticket");
    out.push_str(&format!("{}?HOST={}&SERVICE=disk\n\n", tpl.status_url, snap.host));
    out.push_str(&format!("{}?HOST={}&SERVICE=log\n\n", tpl.log_url, snap.host));

    out.push_str("{code:java}\n");
    out.push_str(snap.self_test_log.trim_end());
    out.push_str("\n{code}\n");

    out.push_str("-----\n{code:java}\n");
    out.push_str(&field("Server model", or_blank(&inv.model)));
    out.push_str(&field("Asset tag",    or_blank(&inv.asset_tag)));
    let warranty = fmt_warranty(inv).unwrap_or_else(|| "no information available".into());
    out.push_str(&field("Warranty", &warranty));
    out.push_str("{code}\n");

    code_block(&mut out, "Failed disk(s)",               &snap.disks.failed);
    code_block(&mut out, "Predictive failure disk(s)",   &snap.disks.predictive_failure);
    code_block(&mut out, "Disks not in use in the RAID", &snap.disks.not_in_use);
    out.push_str(&close_section());
    out
}

pub fn delivery_email(snap: &ServerSnapshot, site: &Site, tpl: &TemplateConfig) -> String {
    let mut out = open_section("Template: Email to request a delivery");
    out.push_str(REVIEW_NOTE);

    match snap.disks.all.first() {
        Some(first) => {
            let size = disk_size(first);
            let dest = format!("Cluster {} {}", snap.cluster, site.name);
            out.push_str(&format!("Subject: {} HDD to {}\n\n", size, dest));
            out.push_str(&format!(
                "Body:\nPlease ship <N>x {size} disks as per subject please.\n\n\
                 === <N>x {size} disks to {dest} ===\n\n\
                 = Address\n{}\n{}\n\n\
                 = Contact details\n{}\n",
                or_blank(&snap.inventory.location),
                site.address,
                site.contact,
            ));
        }
        None => out.push_str("The server may be offline! Unable to print this section.\n"),
    }

    out.push_str(&format!("\n{}\n", tpl.closing));
    out.push_str(&close_section());
    out
}

pub fn smart_hands(snap: &ServerSnapshot, tpl: &TemplateConfig) -> String {
    let mut out = open_section("Template: Smart hands ticket");
    out.push_str(REVIEW_NOTE);

    if !snap.disks.reachable {
        out.push_str("The server is offline! Cannot prepare a replacement request.\n");
    } else if !snap.disks.needs_replacement.is_empty() {
        for disk in &snap.disks.needs_replacement {
            out.push_str(&format!("- Printing the template for disk: {} -\n\n", disk.id));
            out.push_str(&replacement_request(snap, disk));
        }
    } else if let Some(first) = snap.disks.all.first() {
        out.push_str("This is the mock template - DO NOT USE THIS TEMPLATE FOR A REAL REPLACEMENT\n\n");
        out.push_str(&replacement_request(snap, first));
    } else {
        out.push_str("No disks reported by the controller, nothing to replace.\n");
    }

    out.push_str(&format!("\n{}\n", tpl.closing));
    out.push_str(&close_section());
    out
}

fn replacement_request(snap: &ServerSnapshot, disk: &DiskRecord) -> String {
    let inv = &snap.inventory;
    format!(
        "Hello {location},\n\n\
         This is a remote hands request for replacing one HDD. Thanks for following these steps:\n\n\
         1. take one disk of size {size} from <...>\n\
         2. locate the server > {host} < and replace disk in bay {bay} (Serial number: {serial})\n\n\
         \x20   Server:    {host}\n\
         \x20   Rack:      {rack}\n\
         \x20   RU:        {ru}\n\
         \x20   Asset Tag: {asset}\n\
         \x20   Model:     {model}\n\n\
         3. label the broken disk as \"FAILED\"\n\n",
        location = or_blank(&inv.location),
        size     = disk_size(disk),
        host     = snap.host,
        bay      = disk.bay(),
        serial   = disk.serial_number,
        rack     = or_blank(&inv.rack),
        ru       = or_blank(&inv.rack_unit),
        asset    = or_blank(&inv.asset_tag),
        model    = or_blank(&inv.model),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::config::Config;
    use crate::models::classification::ClassificationResult;
    use crate::models::disk::{sample_disk, DiskState};
    use crate::util::report::sample_snapshot;

    #[test]
    fn ticket_quotes_log_and_lists_failed_disks() {
        let snap = sample_snapshot();
        let out = ticket(&snap, &TemplateConfig::default());
        assert!(out.contains("?HOST=prx11a&SERVICE=disk"));
        assert!(out.contains("Virtual Disk 0 (RAID-10) is Degraded"));
        assert!(out.contains("Failed disk(s): 1\n"));
        assert!(out.contains("Failure Predicted:   Yes\n"));
        assert!(!out.contains("Predictive failure disk(s)"));
        assert!(out.contains("Server model:        PowerEdge R720\n"));
    }

    #[test]
    fn delivery_uses_first_disk_size_and_site() {
        let snap = sample_snapshot();
        let site = Config::default().sites["A"].clone();
        let out = delivery_email(&snap, &site, &TemplateConfig::default());
        assert!(out.contains("Subject: 600 GB SAS HDD to Cluster A Cluster A Location\n"));
        assert!(out.contains("= Address\nDatacenter A\nCluster A Address\n"));
    }

    #[test]
    fn smart_hands_one_request_per_failed_disk() {
        let snap = sample_snapshot();
        let out = smart_hands(&snap, &TemplateConfig::default());
        assert!(out.contains("- Printing the template for disk: 0:1:2 -"));
        assert!(out.contains("replace disk in bay 2 (Serial number: S0M1IJKL)"));
        assert!(out.contains("    Rack:      Rack 12\n"));
        assert!(!out.contains("mock template"));
    }

    #[test]
    fn smart_hands_mock_when_nothing_failed() {
        let mut snap = sample_snapshot();
        snap.disks = classify(&[sample_disk("0:0:4", DiskState::Online, false)]);
        let out = smart_hands(&snap, &TemplateConfig::default());
        assert!(out.contains("DO NOT USE THIS TEMPLATE"));
        assert!(out.contains("bay 4"));
    }

    #[test]
    fn smart_hands_refuses_when_unreachable() {
        let mut snap = sample_snapshot();
        snap.disks = ClassificationResult::unreachable();
        let out = smart_hands(&snap, &TemplateConfig::default());
        assert!(out.contains("The server is offline!"));
        assert!(!out.contains("remote hands request"));
    }
}
