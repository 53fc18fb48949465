use crate::{error::Error, exercise::ExerciseKind};
use std::{fmt, str::FromStr};

/// How lenient every strategy's thresholds are. Larger is more lenient.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Sensitivity(u8);

impl Sensitivity {
    pub const MIN: u8 = 5;
    pub const MAX: u8 = 25;
    pub const DEFAULT: u8 = 15;

    pub fn new(value: u8) -> Result<Self, Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidSensitivity(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_f32(self) -> f32 {
        f32::from(self.0)
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl FromStr for Sensitivity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|e| Error::ParseSensitivity(s.to_owned(), e))?;
        Self::new(value)
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-facing configuration, applied by the frame loop between frames.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub kind: ExerciseKind,
    pub sensitivity: Sensitivity,
    pub debug: bool,
}

impl Settings {
    pub fn new(kind: ExerciseKind, sensitivity: Sensitivity) -> Self {
        Self {
            kind,
            sensitivity,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert!(Sensitivity::new(5).is_ok());
        assert!(Sensitivity::new(25).is_ok());
        assert!(matches!(
            Sensitivity::new(4),
            Err(Error::InvalidSensitivity(4))
        ));
        assert!(matches!(
            Sensitivity::new(26),
            Err(Error::InvalidSensitivity(26))
        ));
    }

    #[test]
    fn default_is_mid_range() {
        assert_eq!(Sensitivity::default().get(), 15);
    }

    #[test]
    fn parse() {
        assert_eq!("20".parse::<Sensitivity>().unwrap().get(), 20);
        assert!(matches!(
            "abc".parse::<Sensitivity>(),
            Err(Error::ParseSensitivity(..))
        ));
        assert!(matches!(
            "99".parse::<Sensitivity>(),
            Err(Error::InvalidSensitivity(99))
        ));
    }
}
