use crate::models::disk::ServerInventory;

const SECTION_WIDTH: usize = 80;

/// "Label:" padded to a 20-column gutter, then the value.
pub fn field(label: &str, value: &str) -> String {
    format!("{:<20} {}\n", format!("{}:", label), value)
}

/// "===== Title =====" centred over the report width.
pub fn open_section(title: &str) -> String {
    format!("{:=^width$}\n", format!(" {} ", title), width = SECTION_WIDTH)
}

pub fn close_section() -> String {
    format!("{}\n\n", "-".repeat(SECTION_WIDTH))
}

/// Value of an optional inventory field, blank when missing.
pub fn or_blank(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("")
}

/// Warranty end date, or `None` when the inventory has no usable epoch.
pub fn fmt_warranty(inv: &ServerInventory) -> Option<String> {
    inv.warranty_date().map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_uses_twenty_column_gutter() {
        assert_eq!(field("RAID type", "RAID-5"), "RAID type:           RAID-5\n");
    }

    #[test]
    fn section_header_is_centred() {
        let s = open_section("Disk report");
        assert_eq!(s.trim_end().len(), SECTION_WIDTH);
        assert!(s.starts_with("==="));
        assert!(s.contains(" Disk report "));
    }
}
