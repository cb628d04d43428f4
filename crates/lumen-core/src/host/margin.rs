//! Root margin parsing.
//!
//! Accepts CSS `rootMargin` shorthand: one to four lengths, each either
//! `<n>px`, `<n>%` or a bare `0`. Expansion follows CSS (top, right, bottom,
//! left).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// A single margin length
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    /// Resolve against a reference size (percentages are of `reference`)
    pub fn resolve(&self, reference: f64) -> f64 {
        match *self {
            Length::Px(px) => px,
            Length::Percent(pct) => reference * pct / 100.0,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{v}px"),
            Length::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// Viewport inset, positive values grow the observed region
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    pub fn is_zero(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|l| matches!(*l, Length::Px(v) | Length::Percent(v) if v == 0.0))
    }
}

fn invalid(input: &str, reason: impl Into<String>) -> Error {
    Error::InvalidMargin {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn parse_length(input: &str, token: &str) -> Result<Length> {
    let (number, make): (&str, fn(f64) -> Length) = if let Some(n) = token.strip_suffix("px") {
        (n, Length::Px)
    } else if let Some(n) = token.strip_suffix('%') {
        (n, Length::Percent)
    } else if token == "0" {
        return Ok(Length::Px(0.0));
    } else {
        return Err(invalid(input, format!("'{token}' must be in px or %")));
    };

    let value: f64 = number
        .parse()
        .map_err(|_| invalid(input, format!("'{token}' is not a number")))?;
    if !value.is_finite() {
        return Err(invalid(input, format!("'{token}' is not finite")));
    }
    Ok(make(value))
}

impl FromStr for RootMargin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tokens = s
            .split_whitespace()
            .map(|t| parse_length(s, t))
            .collect::<Result<Vec<_>>>()?;

        match tokens.as_slice() {
            [] => Ok(RootMargin::default()),
            [all] => Ok(RootMargin {
                top: *all,
                right: *all,
                bottom: *all,
                left: *all,
            }),
            [vertical, horizontal] => Ok(RootMargin {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(RootMargin {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(RootMargin {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(invalid(s, "expected at most four lengths")),
        }
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl Serialize for RootMargin {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RootMargin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let margin: RootMargin = "0px".parse().unwrap();
        assert_eq!(margin, RootMargin::default());
        assert!(margin.is_zero());
        assert_eq!("".parse::<RootMargin>().unwrap(), RootMargin::default());
    }

    #[test]
    fn test_shorthand_expansion() {
        let margin: RootMargin = "10px 20%".parse().unwrap();
        assert_eq!(margin.top, Length::Px(10.0));
        assert_eq!(margin.bottom, Length::Px(10.0));
        assert_eq!(margin.left, Length::Percent(20.0));
        assert_eq!(margin.right, Length::Percent(20.0));

        let margin: RootMargin = "1px 2px 3px".parse().unwrap();
        assert_eq!(margin.top, Length::Px(1.0));
        assert_eq!(margin.right, Length::Px(2.0));
        assert_eq!(margin.bottom, Length::Px(3.0));
        assert_eq!(margin.left, Length::Px(2.0));

        let margin: RootMargin = "-1px 0 4px 5%".parse().unwrap();
        assert_eq!(margin.top, Length::Px(-1.0));
        assert_eq!(margin.left, Length::Percent(5.0));
        assert!(!margin.is_zero());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!("10em".parse::<RootMargin>().is_err());
        assert!("abcpx".parse::<RootMargin>().is_err());
        assert!("1px 1px 1px 1px 1px".parse::<RootMargin>().is_err());
        assert!(matches!(
            "5".parse::<RootMargin>(),
            Err(Error::InvalidMargin { .. })
        ));
    }

    #[test]
    fn test_percent_resolves_against_reference() {
        assert_eq!(Length::Percent(50.0).resolve(40.0), 20.0);
        assert_eq!(Length::Px(3.0).resolve(40.0), 3.0);
    }
}
