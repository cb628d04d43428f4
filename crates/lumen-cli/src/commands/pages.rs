use anyhow::Result;
use serde::Serialize;

use lumen_core::{Page, Site};

/// One page as listed by `lumen pages`
#[derive(Debug, Serialize)]
pub struct PageSummary<'a> {
    pub name: &'static str,
    pub route: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub sections: Vec<&'static str>,
    /// Text revealed by the typewriter, if the page has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typed: Option<&'a str>,
}

pub fn summaries(site: &Site) -> Vec<PageSummary<'_>> {
    Page::ALL
        .iter()
        .map(|&page| {
            let content = site.page(page);
            PageSummary {
                name: page.name(),
                route: &content.meta.route,
                title: &content.meta.title,
                description: &content.meta.description,
                sections: content.sections.iter().map(|s| s.kind()).collect(),
                typed: content.typed_text(),
            }
        })
        .collect()
}

pub fn run(site: &Site, json: bool) -> Result<()> {
    let pages = summaries(site);

    if json {
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }

    println!("Pages ({}):\n", pages.len());
    for (i, page) in pages.iter().enumerate() {
        println!("  {} {} ({})", i + 1, page.name, page.route);
        println!("    Title: {}", page.title);
        println!("    Description: {}", page.description);
        println!("    Sections: {}", page.sections.join(", "));
        if let Some(typed) = page.typed {
            println!("    Typed: {}", typed);
        }
        println!();
    }

    Ok(())
}
