use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

/// Timestamp format used by the API, e.g. `2018-10-31 01:23:10` (UTC).
const API_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn api_time<'de, D>(de: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(de)?;
    let naive = NaiveDateTime::parse_from_str(&s, API_TIME_FORMAT).map_err(de::Error::custom)?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Deserializes the 0/1 integers the API uses for booleans, accepting
/// actual booleans too.
pub(crate) fn bool_from_int<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct IntBoolVisitor;

    impl Visitor<'_> for IntBoolVisitor {
        type Value = bool;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("0, 1 or bool")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(de::Error::invalid_value(
                    de::Unexpected::Unsigned(other),
                    &self,
                )),
            }
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(de::Error::invalid_value(
                    de::Unexpected::Signed(other),
                    &self,
                )),
            }
        }
    }

    de.deserialize_any(IntBoolVisitor)
}
