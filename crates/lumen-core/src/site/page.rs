use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Routable pages of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Industries,
    Login,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Industries, Page::Login];

    pub fn name(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Industries => "industries",
            Page::Login => "login",
        }
    }

    /// Navigation label
    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Industries => "Industries",
            Page::Login => "Sign in",
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Industries => "/industries",
            Page::Login => "/login",
        }
    }

    /// Position in navigation order
    pub fn index(&self) -> usize {
        match self {
            Page::Home => 0,
            Page::Industries => 1,
            Page::Login => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Page> {
        Self::ALL.get(index).copied()
    }

    /// Next page in navigation order, wrapping around
    pub fn next(&self) -> Page {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Page {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Page {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" | "/" => Ok(Page::Home),
            "industries" | "/industries" => Ok(Page::Industries),
            "login" | "/login" => Ok(Page::Login),
            _ => Err(Error::UnknownPage(s.to_string())),
        }
    }
}

/// Document metadata of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub route: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_routes() {
        assert_eq!("home".parse::<Page>().unwrap(), Page::Home);
        assert_eq!("/".parse::<Page>().unwrap(), Page::Home);
        assert_eq!("Industries".parse::<Page>().unwrap(), Page::Industries);
        assert_eq!("/login".parse::<Page>().unwrap(), Page::Login);
        assert!(matches!(
            "/pricing".parse::<Page>(),
            Err(Error::UnknownPage(p)) if p == "/pricing"
        ));
    }

    #[test]
    fn test_navigation_wraps() {
        assert_eq!(Page::Home.next(), Page::Industries);
        assert_eq!(Page::Login.next(), Page::Home);
        assert_eq!(Page::Home.prev(), Page::Login);
        assert_eq!(Page::from_index(2), Some(Page::Login));
        assert_eq!(Page::from_index(3), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Page::Home.label(), "Home");
        assert_eq!(Page::Login.label(), "Sign in");
    }
}
