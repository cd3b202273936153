pub mod error;
mod messaging;
mod payload;

pub use messaging::*;
pub use payload::*;

pub static CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// External account identifier, e.g. a chat id
pub type ChatId = i64;
/// Pot identifier, printed on the device
pub type PotId = i64;

/// Number of readings returned by a data query when no limit is requested
pub const DEFAULT_READINGS_WINDOW: usize = 10;
/// Upper bound for a requested readings window
pub const MAX_READINGS_WINDOW: usize = 100;

/*
 * identifier parsing
 */

pub fn parse_pot_id(raw: &str) -> Result<PotId, error::ValidationError> {
    raw.trim()
        .parse::<PotId>()
        .map_err(|_| error::ValidationError::InvalidPotId(raw.to_owned()))
}

pub fn parse_chat_id(raw: &str) -> Result<ChatId, error::ValidationError> {
    raw.trim()
        .parse::<ChatId>()
        .map_err(|_| error::ValidationError::InvalidAccountId(raw.to_owned()))
}

pub fn parse_window(raw: Option<&str>, default: usize) -> Result<usize, error::ValidationError> {
    let raw = match raw {
        Some(raw) => raw,
        None => return Ok(default),
    };

    match raw.trim().parse::<usize>() {
        Ok(limit) if (1..=MAX_READINGS_WINDOW).contains(&limit) => Ok(limit),
        _ => Err(error::ValidationError::InvalidLimit(
            raw.to_owned(),
            MAX_READINGS_WINDOW,
        )),
    }
}

#[cfg(test)]
mod test {
    use super::error::ValidationError;
    use super::*;

    #[test]
    fn test_parse_pot_id() {
        assert_eq!(Ok(42), parse_pot_id("42"));
        assert_eq!(Ok(-7), parse_pot_id("-7"));
        assert_eq!(
            Err(ValidationError::InvalidPotId("abc".to_owned())),
            parse_pot_id("abc")
        );
        assert!(parse_pot_id("4.2").is_err());
        assert!(parse_pot_id("").is_err());
    }

    #[test]
    fn test_parse_chat_id() {
        assert_eq!(Ok(5_123_456_789), parse_chat_id("5123456789"));
        assert_eq!(
            Err(ValidationError::InvalidAccountId("me".to_owned())),
            parse_chat_id("me")
        );
    }

    #[test]
    fn test_parse_window() {
        assert_eq!(Ok(10), parse_window(None, 10));
        assert_eq!(Ok(1), parse_window(Some("1"), 10));
        assert_eq!(Ok(100), parse_window(Some("100"), 10));
        assert!(parse_window(Some("0"), 10).is_err());
        assert!(parse_window(Some("101"), 10).is_err());
        assert!(parse_window(Some("-1"), 10).is_err());
        assert!(parse_window(Some("ten"), 10).is_err());
    }
}
