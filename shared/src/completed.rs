//! The `completed` flag crosses the wire as `0`/`1`, but older clients (and
//! hand-written requests) send `true`/`false`. Everything that accepts the flag
//! funnels through [`normalize`], so the rest of the code only sees `bool`.

use serde::{Deserialize, Deserializer, Serializer};

/// Any accepted spelling of the completed flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CompletedInput {
    Flag(bool),
    Number(i64),
}

/// Collapses an incoming flag to a strict boolean. Any non-zero number counts
/// as completed.
pub fn normalize(input: CompletedInput) -> bool {
    match input {
        CompletedInput::Flag(flag) => flag,
        CompletedInput::Number(n) => n != 0,
    }
}

/// The stored/serialized form: `1` for completed, `0` otherwise.
pub fn as_int(completed: bool) -> u8 {
    u8::from(completed)
}

pub fn serialize<S: Serializer>(completed: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(as_int(*completed))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    CompletedInput::deserialize(deserializer).map(normalize)
}

pub fn deserialize_opt<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<bool>, D::Error> {
    Option::<CompletedInput>::deserialize(deserializer).map(|input| input.map(normalize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_every_spelling() {
        assert!(normalize(CompletedInput::Flag(true)));
        assert!(!normalize(CompletedInput::Flag(false)));
        assert!(normalize(CompletedInput::Number(1)));
        assert!(!normalize(CompletedInput::Number(0)));
        assert!(normalize(CompletedInput::Number(7)));
    }

    #[test]
    fn parses_bool_and_int_from_json() {
        let parsed: Vec<CompletedInput> = serde_json::from_str("[true, 0, 1, false]").unwrap();
        let flags: Vec<bool> = parsed.into_iter().map(normalize).collect();
        assert_eq!(flags, vec![true, false, true, false]);
    }

    #[test]
    fn rejects_strings() {
        assert!(serde_json::from_str::<CompletedInput>("\"yes\"").is_err());
    }
}
