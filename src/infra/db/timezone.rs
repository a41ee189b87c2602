use chrono_tz::Tz;
use thiserror::Error;

/// The profile's `timezone` column, stored as an IANA zone name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProfileZone(pub Tz);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("stored profile timezone `{0}` is not an IANA zone name")]
pub struct UnknownZone(pub String);

impl TryFrom<String> for ProfileZone {
    type Error = UnknownZone;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.trim()
            .parse::<Tz>()
            .map(ProfileZone)
            .map_err(|_| UnknownZone(raw))
    }
}

impl From<ProfileZone> for Tz {
    fn from(zone: ProfileZone) -> Self {
        zone.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_value_parses_as_zone() {
        let zone = ProfileZone::try_from("Europe/Berlin".to_string()).expect("zone");
        assert_eq!(Tz::from(zone), chrono_tz::Europe::Berlin);
    }

    #[test]
    fn unknown_zone_names_the_stored_value() {
        let err = ProfileZone::try_from("Mars/Olympus".to_string()).expect_err("unknown");
        assert_eq!(err, UnknownZone("Mars/Olympus".to_string()));
        assert!(err.to_string().contains("`Mars/Olympus`"));
    }
}
