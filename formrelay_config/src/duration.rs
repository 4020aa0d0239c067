use std::ops::Deref;

use serde::Deserialize;

/// Humane duration format for config files: whitespace separated `<n><unit>`
/// parts where the unit is one of `s`, `m`, `h`, `d` (e.g. `"15m"`,
/// `"1h 30m"`, `"30d"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut out = std::time::Duration::default();
        for part in s.split_whitespace() {
            let mut bytes = part.bytes();
            let mut seconds = 0;
            for b in bytes.by_ref() {
                match b {
                    b'0'..=b'9' => seconds = seconds * 10 + (b - b'0') as u64,
                    b's' => break,
                    b'm' => {
                        seconds *= 60;
                        break;
                    }
                    b'h' => {
                        seconds *= 3600;
                        break;
                    }
                    b'd' => {
                        seconds *= 24 * 3600;
                        break;
                    }
                    _ => return Err(serde::de::Error::custom("Invalid duration")),
                }
            }
            if bytes.next().is_some() {
                return Err(serde::de::Error::custom("Invalid duration"));
            }
            out += std::time::Duration::from_secs(seconds);
        }
        Ok(Self(out))
    }
}

#[cfg(test)]
mod tests {
    use serde::de::{value::StrDeserializer, Deserialize};

    use super::*;

    #[test]
    fn parse_valid() {
        for (input, expected) in [
            ("0s", 0),
            ("30s", 30),
            ("15m", 15 * 60),
            ("2h", 2 * 3600),
            ("30d", 30 * 24 * 3600),
            ("1h 30m", 3600 + 30 * 60),
            ("1d 2h 3m 4s", 24 * 3600 + 2 * 3600 + 3 * 60 + 4),
        ] {
            let deserializer = StrDeserializer::<serde::de::value::Error>::new(input);
            let duration = Duration::deserialize(deserializer).unwrap();
            assert_eq!(duration.0, std::time::Duration::from_secs(expected));
        }
    }

    #[test]
    fn parse_invalid() {
        for input in ["x", "5m3", "m5", "12w"] {
            let deserializer = StrDeserializer::<serde::de::value::Error>::new(input);
            assert!(Duration::deserialize(deserializer).is_err());
        }
    }
}
