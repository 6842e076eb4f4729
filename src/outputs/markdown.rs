//! Markdown rendering of the article panel.
//!
//! # Layout
//!
//! ```text
//! #### **election** near *Paris, Berlin*
//!
//! - [**Paris votes**](https://example.com/a)
//!   *Jane Roe* – *Paris*
//!   Polls opened at 8am
//!   *Sat Oct 10 2026*
//! ```
//!
//! Only articles with a locale tag are listed. Entries whose locale matches
//! the selected locale are prefixed with `▶`. An empty list renders a single
//! `No articles` entry.

use crate::config::PanelInputs;
use crate::models::{ClassifiedArticle, PanelState};
use crate::utils::{display_date, format_content};
use std::fmt::Write;

const HIGHLIGHT: &str = "▶ ";
const UNTITLED: &str = "*(untitled)*";

/// Render the heading line for the current inputs.
pub fn heading(inputs: &PanelInputs) -> String {
    let mut out = String::from("#### ");
    match inputs.topic.as_deref() {
        Some(topic) => write!(out, "**{}**", topic).unwrap(),
        None => out.push_str("News"),
    }
    if !inputs.locales.is_empty() {
        write!(out, " near *{}*", inputs.locales.join(", ")).unwrap();
    }
    out
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

/// Render one list entry.
///
/// Missing titles, authors and URLs are left out rather than rendered as
/// empty markup.
pub fn article_entry(classified: &ClassifiedArticle, selected: Option<&str>) -> String {
    let article = &classified.article;
    let highlighted = selected.is_some() && classified.locale() == selected;
    let mut out = String::new();

    let label = match non_empty(&article.title) {
        Some(title) => format!("**{}**", title),
        None => UNTITLED.to_string(),
    };
    out.push_str("- ");
    if highlighted {
        out.push_str(HIGHLIGHT);
    }
    match non_empty(&article.url) {
        Some(url) => write!(out, "[{}]({})", label, url).unwrap(),
        None => out.push_str(&label),
    }

    let byline: Vec<String> = non_empty(&article.author)
        .into_iter()
        .chain(classified.locale())
        .map(|part| format!("*{}*", part))
        .collect();
    if !byline.is_empty() {
        write!(out, "\n  {}", byline.join(" – ")).unwrap();
    }

    let text = format_content(article.display_text());
    if !text.trim().is_empty() {
        write!(out, "\n  {}", text.trim_end()).unwrap();
    }
    write!(out, "\n  *{}*", display_date(article.published_at.as_deref())).unwrap();
    out
}

/// Render the whole panel for `state`.
pub fn render_panel(inputs: &PanelInputs, state: &PanelState) -> String {
    let mut md = String::new();
    writeln!(md, "{}\n", heading(inputs)).unwrap();

    match state {
        PanelState::Loading => writeln!(md, "- Loading…").unwrap(),
        PanelState::Failed { message } => writeln!(md, "- Failed: {}", message).unwrap(),
        PanelState::Loaded { articles } => {
            let selected = inputs.selected_locale.as_deref();
            let mut listed = 0usize;
            for classified in articles.iter().filter(|a| a.locale().is_some()) {
                writeln!(md, "{}", article_entry(classified, selected)).unwrap();
                listed += 1;
            }
            if listed == 0 {
                writeln!(md, "- No articles").unwrap();
            }
        }
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Article;

    fn inputs(locales: &[&str], topic: Option<&str>, selected: Option<&str>) -> PanelInputs {
        PanelInputs::new(
            locales.iter().map(|s| s.to_string()).collect(),
            topic.map(String::from),
            selected.map(String::from),
        )
    }

    fn classified(title: &str, locale: Option<&str>) -> ClassifiedArticle {
        ClassifiedArticle {
            article: Article {
                title: Some(title.to_string()),
                author: Some("Jane Roe".to_string()),
                url: Some(format!("https://example.com/{}", title.len())),
                content: Some("<p>Body</p> text [+99 chars]".to_string()),
                published_at: Some("2026-10-10T12:00:00Z".to_string()),
                ..Default::default()
            },
            locale: locale.map(String::from),
        }
    }

    #[test]
    fn test_heading_default() {
        assert_eq!(heading(&inputs(&[], None, None)), "#### News");
    }

    #[test]
    fn test_heading_topic_and_locales() {
        assert_eq!(
            heading(&inputs(&["Paris", "Berlin"], Some("election"), None)),
            "#### **election** near *Paris, Berlin*"
        );
        assert_eq!(
            heading(&inputs(&["Rome"], None, None)),
            "#### News near *Rome*"
        );
    }

    #[test]
    fn test_render_drops_unclassified_articles() {
        let state = PanelState::Loaded {
            articles: vec![
                classified("Paris votes", Some("Paris")),
                classified("Unrelated story", None),
            ],
        };
        let md = render_panel(&inputs(&["Paris"], None, None), &state);
        assert!(md.contains("Paris votes"));
        assert!(!md.contains("Unrelated story"));
        assert!(!md.contains("No articles"));
    }

    #[test]
    fn test_render_placeholder_when_nothing_classified() {
        let state = PanelState::Loaded {
            articles: vec![classified("Unrelated story", None)],
        };
        let md = render_panel(&inputs(&["Paris"], None, None), &state);
        assert!(md.contains("- No articles"));
        assert!(!md.contains("Unrelated story"));

        let empty = PanelState::Loaded { articles: vec![] };
        assert!(render_panel(&inputs(&[], None, None), &empty).contains("- No articles"));
    }

    #[test]
    fn test_entry_formatting() {
        let entry = article_entry(&classified("Paris votes", Some("Paris")), None);
        let lines: Vec<&str> = entry.lines().collect();
        assert_eq!(lines[0], "- [**Paris votes**](https://example.com/11)");
        assert_eq!(lines[1], "  *Jane Roe* – *Paris*");
        assert_eq!(lines[2], "  Body text");
        assert!(lines[3].ends_with("Oct 10 2026*"));
    }

    #[test]
    fn test_entry_without_title_author_or_url() {
        let bare = ClassifiedArticle {
            article: Article {
                content: Some("Paris news".to_string()),
                ..Default::default()
            },
            locale: Some("Paris".to_string()),
        };
        let entry = article_entry(&bare, Some("Paris"));
        assert_eq!(
            entry,
            "- ▶ *(untitled)*\n  *Paris*\n  Paris news\n  *Invalid Date*"
        );
        assert!(!entry.contains("****"));
        assert!(!entry.contains("]()"));
        assert!(!entry.contains("  ** "));
    }

    #[test]
    fn test_entry_without_url_keeps_bold_title() {
        let mut entry = classified("Paris votes", Some("Paris"));
        entry.article.url = None;
        entry.article.author = Some(String::new());
        let lines: Vec<String> = article_entry(&entry, None).lines().map(String::from).collect();
        assert_eq!(lines[0], "- **Paris votes**");
        assert_eq!(lines[1], "  *Paris*");
    }

    #[test]
    fn test_selected_locale_is_highlighted() {
        let state = PanelState::Loaded {
            articles: vec![
                classified("Paris votes", Some("Paris")),
                classified("Berlin votes", Some("Berlin")),
            ],
        };
        let md = render_panel(&inputs(&["Paris", "Berlin"], None, Some("Berlin")), &state);
        assert!(md.contains("- ▶ [**Berlin votes**]"));
        assert!(md.contains("- [**Paris votes**]"));
    }

    #[test]
    fn test_render_loading_and_failed() {
        let i = inputs(&[], None, None);
        assert!(render_panel(&i, &PanelState::Loading).contains("Loading…"));
        let failed = PanelState::Failed {
            message: "HTTP 401".to_string(),
        };
        assert!(render_panel(&i, &failed).contains("- Failed: HTTP 401"));
    }
}
