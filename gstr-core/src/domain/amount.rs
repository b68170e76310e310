//! Decimal amounts as JSON numbers
//!
//! The return format wants plain numbers: `18`, `1800`, `100.5`. Values are
//! rounded to two places; integral values go out as integers.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serializer};

/// Round half away from zero to the two places the return format carries
pub fn round2(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let rounded = round2(*value);
    if rounded.fract().is_zero() {
        if let Some(i) = rounded.to_i64() {
            return serializer.serialize_i64(i);
        }
    }
    match rounded.to_f64() {
        Some(f) => serializer.serialize_f64(f),
        None => Err(serde::ser::Error::custom(format!("amount out of range: {}", rounded))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Int(i64),
    Float(f64),
    Str(String),
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match RawAmount::deserialize(deserializer)? {
        RawAmount::Int(i) => Ok(Decimal::from(i)),
        RawAmount::Float(f) => Decimal::from_f64(f)
            .ok_or_else(|| serde::de::Error::custom(format!("amount out of range: {}", f))),
        RawAmount::Str(s) => s
            .trim()
            .parse::<Decimal>()
            .map_err(|e| serde::de::Error::custom(format!("invalid amount '{}': {}", s, e))),
    }
}

/// Same encoding for optional amounts
pub mod option {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => super::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super")] Decimal);

        Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(d)| d))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Line {
        #[serde(with = "super")]
        txval: Decimal,
        #[serde(default, with = "super::option", skip_serializing_if = "Option::is_none")]
        iamt: Option<Decimal>,
    }

    #[test]
    fn test_integral_amounts_serialize_as_integers() {
        let line = Line { txval: Decimal::new(100000, 2), iamt: None };
        assert_eq!(serde_json::to_string(&line).unwrap(), r#"{"txval":1000}"#);
    }

    #[test]
    fn test_fractional_amounts_round_to_two_places() {
        let line = Line { txval: Decimal::new(100505, 3), iamt: Some(Decimal::new(1805, 2)) };
        assert_eq!(
            serde_json::to_string(&line).unwrap(),
            r#"{"txval":100.51,"iamt":18.05}"#
        );
    }

    #[test]
    fn test_midpoints_round_away_from_zero() {
        assert_eq!(round2(Decimal::new(125, 3)), Decimal::new(13, 2));
        assert_eq!(round2(Decimal::new(-125, 3)), Decimal::new(-13, 2));
        assert_eq!(round2(Decimal::new(1124, 3)), Decimal::new(112, 2));
    }

    #[test]
    fn test_deserialize_numbers_and_strings() {
        let line: Line = serde_json::from_str(r#"{"txval":"250.75","iamt":45}"#).unwrap();
        assert_eq!(line.txval, Decimal::new(25075, 2));
        assert_eq!(line.iamt, Some(Decimal::new(45, 0)));

        let line: Line = serde_json::from_str(r#"{"txval":0.1}"#).unwrap();
        assert_eq!(line.txval, Decimal::new(1, 1));
        assert_eq!(line.iamt, None);
    }
}
