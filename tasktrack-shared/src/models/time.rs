/// Timestamp wire format
///
/// Timestamps serialize as RFC 3339 UTC with exactly three fractional
/// digits (`2024-07-08T09:10:11.123Z`). The fixed width keeps the strings
/// in chronological order under plain lexicographic comparison, which the
/// store's order-by relies on.
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "super")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_fixed_width_keeps_lexicographic_order_chronological() {
        let earlier = Stamped {
            at: "2024-07-08T09:10:11.123Z".parse().unwrap(),
        };
        let later = Stamped {
            at: "2024-07-08T09:10:11.124Z".parse().unwrap(),
        };

        let a = serde_json::to_value(&earlier).unwrap()["at"]
            .as_str()
            .unwrap()
            .to_string();
        let b = serde_json::to_value(&later).unwrap()["at"]
            .as_str()
            .unwrap()
            .to_string();

        assert!(a < b);
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_roundtrip_truncates_to_milliseconds() {
        let original = Stamped {
            at: "2024-07-08T09:10:11.123456789Z".parse().unwrap(),
        };

        let json = serde_json::to_string(&original).unwrap();
        let restored: Stamped = serde_json::from_str(&json).unwrap();

        assert_eq!(
            restored.at,
            "2024-07-08T09:10:11.123Z".parse::<DateTime<Utc>>().unwrap()
        );
    }
}
