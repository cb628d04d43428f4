//! Site content: pages, their metadata and the sections they are built from.
//!
//! [`Site::builtin`] ships the default copy. A TOML file can replace any
//! page wholesale; pages it leaves out keep the built-in content.

mod login;
mod page;

pub use login::{Field, FieldError, LoginForm};
pub use page::{Page, PageMeta};

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub body: String,
}

/// Building block of a page. Every section is revealed when it scrolls into view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Hero {
        eyebrow: String,
        headline: String,
        /// Typed out character by character
        tagline: String,
        cta: String,
    },
    Stats {
        items: Vec<Stat>,
    },
    Cards {
        heading: String,
        cards: Vec<Card>,
    },
    LoginForm {
        heading: String,
    },
}

impl Section {
    pub fn kind(&self) -> &'static str {
        match self {
            Section::Hero { .. } => "hero",
            Section::Stats { .. } => "stats",
            Section::Cards { .. } => "cards",
            Section::LoginForm { .. } => "login_form",
        }
    }

    /// Text the typewriter reveals, if this section has any
    pub fn typed_text(&self) -> Option<&str> {
        match self {
            Section::Hero { tagline, .. } => Some(tagline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub meta: PageMeta,
    pub sections: Vec<Section>,
}

impl PageContent {
    /// The first typed text on the page
    pub fn typed_text(&self) -> Option<&str> {
        self.sections.iter().find_map(Section::typed_text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub brand: String,
    pub footer: String,
    pub home: PageContent,
    pub industries: PageContent,
    pub login: PageContent,
}

/// Shape of an override file; everything is optional
#[derive(Debug, Default, Deserialize)]
struct SiteOverrides {
    brand: Option<String>,
    footer: Option<String>,
    home: Option<PageContent>,
    industries: Option<PageContent>,
    login: Option<PageContent>,
}

impl Site {
    pub fn page(&self, page: Page) -> &PageContent {
        match page {
            Page::Home => &self.home,
            Page::Industries => &self.industries,
            Page::Login => &self.login,
        }
    }

    pub fn meta(&self, page: Page) -> &PageMeta {
        &self.page(page).meta
    }

    /// Built-in content with overrides from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let site = Self::from_toml(&content)?;
        debug!(path = %path.display(), "loaded site overrides");
        Ok(site)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let overrides: SiteOverrides = toml::from_str(content)?;
        let mut site = Self::builtin();
        if let Some(brand) = overrides.brand {
            site.brand = brand;
        }
        if let Some(footer) = overrides.footer {
            site.footer = footer;
        }
        if let Some(home) = overrides.home {
            site.home = home;
        }
        if let Some(industries) = overrides.industries {
            site.industries = industries;
        }
        if let Some(login) = overrides.login {
            site.login = login;
        }
        Ok(site)
    }

    pub fn builtin() -> Self {
        Self {
            brand: "Lumen".to_string(),
            footer: "© Lumen Systems. Built for teams that ship.".to_string(),
            home: PageContent {
                meta: meta(
                    Page::Home,
                    "Lumen | Operational clarity for growing teams",
                    "Dashboards, alerts and reports that keep every team on the same page.",
                ),
                sections: vec![
                    Section::Hero {
                        eyebrow: "Operational intelligence".to_string(),
                        headline: "See your whole business in one place".to_string(),
                        tagline: "Lumen turns scattered data into decisions your team can act on."
                            .to_string(),
                        cta: "Get started".to_string(),
                    },
                    Section::Stats {
                        items: vec![
                            stat("2,400+", "teams onboarded"),
                            stat("99.98%", "uptime last year"),
                            stat("35%", "faster reporting"),
                            stat("24/7", "human support"),
                        ],
                    },
                    Section::Cards {
                        heading: "Why teams choose Lumen".to_string(),
                        cards: vec![
                            card(
                                "Unified data",
                                "Connect billing, CRM and support tools without writing glue code.",
                            ),
                            card(
                                "Live dashboards",
                                "Metrics refresh as events arrive, so meetings start with today's numbers.",
                            ),
                            card(
                                "Smart alerts",
                                "Thresholds and anomaly detection route issues to the right owner.",
                            ),
                        ],
                    },
                    Section::Cards {
                        heading: "How it works".to_string(),
                        cards: vec![
                            card("Connect", "Link your sources in minutes with guided setup."),
                            card("Model", "Define the metrics that matter once, reuse them everywhere."),
                            card("Share", "Publish views to teams, partners or the whole company."),
                        ],
                    },
                ],
            },
            industries: PageContent {
                meta: meta(
                    Page::Industries,
                    "Industries | Lumen",
                    "How retail, logistics, healthcare and finance teams run on Lumen.",
                ),
                sections: vec![
                    Section::Hero {
                        eyebrow: "Industries".to_string(),
                        headline: "Built for the way your sector works".to_string(),
                        tagline: "From storefronts to supply chains, one platform adapts to your workflow."
                            .to_string(),
                        cta: "Talk to sales".to_string(),
                    },
                    Section::Cards {
                        heading: "Who we serve".to_string(),
                        cards: vec![
                            card(
                                "Retail",
                                "Track sell-through, inventory and promotions across every location.",
                            ),
                            card(
                                "Logistics",
                                "Follow shipments end to end and spot delays before customers do.",
                            ),
                            card(
                                "Healthcare",
                                "Monitor capacity and scheduling with audit-ready reporting.",
                            ),
                            card(
                                "Financial services",
                                "Reconcile, forecast and report with controls your auditors trust.",
                            ),
                        ],
                    },
                    Section::Stats {
                        items: vec![
                            stat("12", "industries served"),
                            stat("40+", "countries"),
                            stat("3x", "faster month-end close"),
                        ],
                    },
                ],
            },
            login: PageContent {
                meta: meta(Page::Login, "Sign in | Lumen", "Sign in to your Lumen workspace."),
                sections: vec![Section::LoginForm {
                    heading: "Welcome back".to_string(),
                }],
            },
        }
    }
}

fn meta(page: Page, title: &str, description: &str) -> PageMeta {
    PageMeta {
        title: title.to_string(),
        description: description.to_string(),
        route: page.route().to_string(),
    }
}

fn stat(value: &str, label: &str) -> Stat {
    Stat {
        value: value.to_string(),
        label: label.to_string(),
    }
}

fn card(title: &str, body: &str) -> Card {
    Card {
        title: title.to_string(),
        body: body.to_string(),
    }
}
