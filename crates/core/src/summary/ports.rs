//! Port interfaces for presenting slots

/// Localised date and time strings for user-facing text.
pub trait SlotFormatter: Send + Sync {
    /// Format a `YYYY-MM-DD` date
    fn format_date(&self, date: &str) -> String;

    /// Format the one-hour span starting at `hour`
    fn format_hour_range(&self, hour: u32) -> String;
}

/// Locale-free formatter: dates verbatim, 24h hour spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoSlotFormatter;

impl SlotFormatter for IsoSlotFormatter {
    fn format_date(&self, date: &str) -> String {
        date.to_string()
    }

    fn format_hour_range(&self, hour: u32) -> String {
        format!("{:02}:00-{:02}:00", hour, (hour + 1) % 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_formatter_wraps_midnight() {
        let formatter = IsoSlotFormatter;
        assert_eq!(formatter.format_hour_range(9), "09:00-10:00");
        assert_eq!(formatter.format_hour_range(23), "23:00-00:00");
        assert_eq!(formatter.format_date("2024-03-04"), "2024-03-04");
    }
}
