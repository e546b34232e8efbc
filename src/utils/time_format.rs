//! `lastUpdateTime` as kept in the bus registry
//!
//! Written as `%Y-%m-%d %H:%M:%S` in UTC. Reading also takes RFC 3339 and the
//! bare "10:30 AM" clock times that older boards stored; those are placed on
//! today's local date.

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, Utc};
use serde::{de::Error, Deserialize, Deserializer, Serializer};

const STORED: &str = "%Y-%m-%d %H:%M:%S";
const CLOCK: &str = "%I:%M %p";

pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&at.format(STORED))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_update_time(raw.trim())
        .ok_or_else(|| D::Error::custom(format!("unrecognized update time {:?}", raw)))
}

fn parse_update_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, STORED) {
        return Some(naive.and_utc());
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }

    let clock = NaiveTime::parse_from_str(raw, CLOCK).ok()?;
    Local::now()
        .date_naive()
        .and_time(clock)
        .and_local_timezone(Local)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
}

/// Full timestamp for detail views, e.g. "2024-03-01 09:45 UTC"
pub fn format_datetime(at: &DateTime<Utc>) -> String {
    format!("{} UTC", at.format("%Y-%m-%d %H:%M"))
}

/// Wall-clock "10:30 AM" in the local timezone, as shown on bus cards
pub fn format_clock(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(CLOCK).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, Deserialize)]
    struct Stamp {
        #[serde(with = "super")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_stored_and_rfc3339_agree() {
        let stored: Stamp = serde_json::from_str(r#"{"at":"2024-03-01 09:45:00"}"#).unwrap();
        let rfc: Stamp = serde_json::from_str(r#"{"at":"2024-03-01T15:15:00+05:30"}"#).unwrap();
        assert_eq!(stored.at, rfc.at);
        assert_eq!(format_datetime(&stored.at), "2024-03-01 09:45 UTC");
        assert_eq!(
            serde_json::to_string(&stored).unwrap(),
            r#"{"at":"2024-03-01 09:45:00"}"#
        );
    }

    #[test]
    fn test_clock_only_times_land_on_today() {
        let stamp: Stamp = serde_json::from_str(r#"{"at":"10:30 AM"}"#).unwrap();
        assert_eq!(format_clock(&stamp.at), "10:30 AM");
        assert_eq!(
            stamp.at.with_timezone(&Local).date_naive(),
            Local::now().date_naive()
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Stamp>(r#"{"at":"yesterday"}"#).is_err());
    }
}
