//! serde impls for src/options.rs
use std::fmt::{self, Formatter};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::TimeOfDay;

impl Serialize for TimeOfDay {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(TimeOfDayVisitor)
    }
}

struct TimeOfDayVisitor;

impl<'de> Visitor<'de> for TimeOfDayVisitor {
    type Value = TimeOfDay;

    #[inline]
    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a time in HH:MM format")
    }

    #[inline]
    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_test::{assert_de_tokens_error, assert_tokens, Token};

    use super::TimeOfDay;

    #[test]
    fn test_time_of_day_serde() {
        assert_tokens(&TimeOfDay::new(9, 0).unwrap(), &[Token::Str("09:00")]);
        assert_tokens(&TimeOfDay::new(23, 45).unwrap(), &[Token::Str("23:45")]);

        assert_de_tokens_error::<TimeOfDay>(
            &[Token::Str("25:00")],
            "invalid hours in \"25:00\"",
        );
    }
}
