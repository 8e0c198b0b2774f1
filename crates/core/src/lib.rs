use serde::{Deserialize, Serialize};

/// Accumulated play time for one title, as stored in the ledger file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRecord {
    #[serde(rename = "titleId")]
    pub id: u64,
    #[serde(rename = "title")]
    pub label: String,
    #[serde(rename = "totalPlayTimeMs", default)]
    pub total_duration_ms: u64,
}

impl DurationRecord {
    pub fn new(id: u64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            total_duration_ms: 0,
        }
    }

    /// Adds one session to the total and takes over the latest label.
    pub fn add_session(&mut self, label: &str, delta_ms: u64) {
        self.total_duration_ms = self.total_duration_ms.saturating_add(delta_ms);
        if self.label != label {
            self.label = label.to_string();
        }
    }

    pub fn formatted(&self) -> String {
        format_duration(self.total_duration_ms)
    }
}

/// Whole-second decomposition of a millisecond duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationParts {
    pub fn from_millis(ms: u64) -> Self {
        let total_seconds = ms / 1000;
        Self {
            hours: total_seconds / 3600,
            minutes: (total_seconds % 3600) / 60,
            seconds: total_seconds % 60,
        }
    }
}

impl std::fmt::Display for DurationParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.hours > 0 {
            write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
        } else if self.minutes > 0 {
            write!(f, "{}m {}s", self.minutes, self.seconds)
        } else {
            write!(f, "{}s", self.seconds)
        }
    }
}

/// Formats a duration as `1h 2m 5s`, dropping leading zero units.
pub fn format_duration(ms: u64) -> String {
    DurationParts::from_millis(ms).to_string()
}

/// Parses a session length given either as plain milliseconds (`65000`) or
/// with units (`1h2m5s`, `90s`, `250ms`).
pub fn parse_duration_ms(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(ms) = value.parse::<u64>() {
        return Some(ms);
    }

    let mut total: u64 = 0;
    let mut rest = value;
    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return None;
        }
        let amount = rest[..digits_end].parse::<u64>().ok()?;
        rest = &rest[digits_end..];
        let unit_end = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let factor = match &rest[..unit_end] {
            "h" => 3_600_000,
            "m" => 60_000,
            "s" => 1_000,
            "ms" => 1,
            _ => return None,
        };
        total = total.checked_add(amount.checked_mul(factor)?)?;
        rest = &rest[unit_end..];
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_drops_leading_zero_units() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(500), "0s");
        assert_eq!(format_duration(59_999), "59s");
        assert_eq!(format_duration(60_000), "1m 0s");
        assert_eq!(format_duration(65_000), "1m 5s");
        assert_eq!(format_duration(3_600_000), "1h 0m 0s");
        assert_eq!(format_duration(3_725_000), "1h 2m 5s");
    }

    #[test]
    fn format_keeps_counting_hours_past_a_day() {
        assert_eq!(format_duration(90_061_000), "25h 1m 1s");
    }

    #[test]
    fn parts_truncate_sub_second_remainder() {
        let parts = DurationParts::from_millis(3_725_999);
        assert_eq!(
            parts,
            DurationParts {
                hours: 1,
                minutes: 2,
                seconds: 5,
            }
        );
    }

    #[test]
    fn add_session_saturates_and_replaces_label() {
        let mut record = DurationRecord::new(7, "Old Name");
        record.add_session("New Name", u64::MAX - 1);
        record.add_session("New Name", 10);
        assert_eq!(record.total_duration_ms, u64::MAX);
        assert_eq!(record.label, "New Name");
    }

    #[test]
    fn record_uses_ledger_field_names() {
        let record = DurationRecord {
            id: 0x0004_0000_0005_5D00,
            label: "Zelda".to_string(),
            total_duration_ms: 1500,
        };
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(
            json,
            r#"{"titleId":1125899907194112,"title":"Zelda","totalPlayTimeMs":1500}"#
        );
    }

    #[test]
    fn record_without_total_defaults_to_zero() {
        let record: DurationRecord =
            serde_json::from_str(r#"{"titleId":3,"title":"Fresh"}"#).expect("parse");
        assert_eq!(record.total_duration_ms, 0);
        assert_eq!(record.label, "Fresh");
    }

    #[test]
    fn parse_duration_accepts_millis_and_units() {
        assert_eq!(parse_duration_ms("65000"), Some(65_000));
        assert_eq!(parse_duration_ms("1h2m5s"), Some(3_725_000));
        assert_eq!(parse_duration_ms("90s"), Some(90_000));
        assert_eq!(parse_duration_ms("1m250ms"), Some(60_250));
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert_eq!(parse_duration_ms(""), None);
        assert_eq!(parse_duration_ms("h"), None);
        assert_eq!(parse_duration_ms("5d"), None);
        assert_eq!(parse_duration_ms("-5"), None);
    }
}
