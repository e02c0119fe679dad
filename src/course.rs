//! Course page structure: named sections and their content-page links.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::profile::Profile;
use crate::slug::slugify;

static SECTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.section").expect("valid selector"));
static SECTION_NAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".sectionname").expect("valid selector"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

const SECTION_NAME_ATTR: &str = "data-sectionname";

/// Characters trimmed from heading ends after noise phrases are removed.
const NAME_SEPARATORS: [char; 8] = [' ', '-', '–', '—', ':', '|', ',', '.'];

/// One course unit: display name, filesystem-safe slug, and its content
/// pages in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub slug: String,
    pub page_urls: Vec<Url>,
}

/// Splits a course overview page into sections. Containers and the
/// anchors within them keep document order; a section whose links all
/// point elsewhere is still emitted with an empty page list.
#[must_use]
pub fn extract_sections(course_html: &str, course_url: &Url, profile: &Profile) -> Vec<Section> {
    let document = Html::parse_document(course_html);
    let noise = noise_pattern(&profile.heading_noise_phrases);

    document
        .select(&SECTION_SELECTOR)
        .map(|container| {
            let name = section_name(container, noise.as_ref());
            let slug = slugify(&name);
            let page_urls = page_links(container, course_url, &profile.page_link_marker);
            Section {
                name,
                slug,
                page_urls,
            }
        })
        .collect()
}

/// Resolves a section's display name. Preference order: the container's
/// `data-sectionname` attribute, the `.sectionname` heading text with
/// decorative phrases stripped, the container's `id`, then `unknown`.
fn section_name(container: ElementRef<'_>, noise: Option<&Regex>) -> String {
    if let Some(attr) = container.value().attr(SECTION_NAME_ATTR) {
        let attr = attr.trim();
        if !attr.is_empty() {
            return attr.to_owned();
        }
    }

    if let Some(heading) = container.select(&SECTION_NAME_SELECTOR).next() {
        let text: String = heading.text().collect();
        let cleaned = strip_heading_noise(&text, noise);
        if !cleaned.is_empty() {
            return cleaned;
        }
    }

    container
        .value()
        .attr("id")
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Case-insensitive alternation over the configured noise phrases,
/// longest alternative first so shorter phrases cannot pre-empt longer
/// ones. `None` disables stripping.
fn noise_pattern(phrases: &[String]) -> Option<Regex> {
    let mut alternatives: Vec<&str> = phrases
        .iter()
        .map(String::as_str)
        .filter(|phrase| !phrase.is_empty())
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    alternatives.sort_by_key(|phrase| std::cmp::Reverse(phrase.len()));

    let escaped: Vec<String> = alternatives.iter().map(|p| regex::escape(p)).collect();
    match Regex::new(&format!("(?i){}", escaped.join("|"))) {
        Ok(pattern) => Some(pattern),
        Err(err) => {
            tracing::warn!(?err, "heading noise phrases did not compile; keeping headings as-is");
            None
        }
    }
}

fn strip_heading_noise(heading: &str, noise: Option<&Regex>) -> String {
    let text = collapse_whitespace(heading);
    let Some(noise) = noise else {
        return text;
    };
    let stripped = collapse_whitespace(&noise.replace_all(&text, ""));
    stripped.trim_matches(&NAME_SEPARATORS[..]).to_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn page_links(container: ElementRef<'_>, course_url: &Url, page_link_marker: &str) -> Vec<Url> {
    container
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| href.contains(page_link_marker))
        .filter_map(|href| match course_url.join(href) {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::debug!(href, ?err, "skipping unresolvable content link");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course_url() -> Url {
        Url::parse("https://campus.example/course/view.php?id=7").expect("parse course url")
    }

    fn sections(html: &str) -> Vec<Section> {
        extract_sections(html, &course_url(), &Profile::default())
    }

    #[test]
    fn keeps_sections_and_links_in_document_order() {
        let html = r#"
            <ul>
              <li class="section"><h3 class="sectionname">Alpha</h3>
                <a href="/mod/page/view.php?id=1">one</a>
                <a href="https://campus.example/mod/page/view.php?id=2">two</a>
              </li>
              <li class="section"><h3 class="sectionname">Beta</h3>
                <a href="/mod/page/view.php?id=3">three</a>
              </li>
            </ul>"#;

        let sections = sections(html);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "Alpha");
        assert_eq!(sections[0].slug, "Alpha");
        assert_eq!(
            sections[0]
                .page_urls
                .iter()
                .map(Url::as_str)
                .collect::<Vec<_>>(),
            vec![
                "https://campus.example/mod/page/view.php?id=1",
                "https://campus.example/mod/page/view.php?id=2",
            ]
        );
        assert_eq!(sections[1].name, "Beta");
        assert_eq!(
            sections[1]
                .page_urls
                .iter()
                .map(Url::as_str)
                .collect::<Vec<_>>(),
            vec!["https://campus.example/mod/page/view.php?id=3"]
        );
    }

    #[test]
    fn emits_sections_without_content_links() {
        let html = r#"
            <li class="section"><h3 class="sectionname">Quiet Week</h3>
              <a href="/mod/forum/view.php?id=9">a forum, not a page</a>
            </li>"#;

        let sections = sections(html);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "Quiet Week");
        assert!(sections[0].page_urls.is_empty());
    }

    #[test]
    fn prefers_the_sectionname_attribute_over_the_heading() {
        let html = r#"
            <li class="section" data-sectionname="Week 1" id="section-1">
              <h3 class="sectionname">Week 1 - לחצו כאן לצפייה</h3>
            </li>"#;

        assert_eq!(sections(html)[0].name, "Week 1");
    }

    #[test]
    fn strips_decorative_phrases_from_headings() {
        let html = r#"
            <li class="section">
              <h3 class="sectionname">יחידה 2 - לחצו כאן לצפייה</h3>
            </li>"#;

        let sections = sections(html);
        assert_eq!(sections[0].name, "יחידה 2");
        assert_eq!(sections[0].slug, "יחידה_2");
    }

    #[test]
    fn strips_phrases_case_insensitively() {
        let html = r#"
            <li class="section">
              <h3 class="sectionname">Intro: CLICK HERE</h3>
            </li>"#;

        assert_eq!(sections(html)[0].name, "Intro");
    }

    #[test]
    fn falls_back_to_the_container_id_when_only_noise_remains() {
        let html = r#"
            <li class="section" id="section-3">
              <h3 class="sectionname">לחצו כאן</h3>
            </li>"#;

        assert_eq!(sections(html)[0].name, "section-3");
    }

    #[test]
    fn names_a_bare_container_unknown() {
        let html = r#"<li class="section"><p>no heading at all</p></li>"#;

        let sections = sections(html);
        assert_eq!(sections[0].name, "unknown");
        assert_eq!(sections[0].slug, "unknown");
    }

    #[test]
    fn heading_whitespace_is_collapsed() {
        let html = "<li class=\"section\"><h3 class=\"sectionname\">Unit\n   One</h3></li>";

        let sections = sections(html);
        assert_eq!(sections[0].name, "Unit One");
        assert_eq!(sections[0].slug, "Unit_One");
    }

    #[test]
    fn skips_unresolvable_hrefs() {
        let html = r#"
            <li class="section"><h3 class="sectionname">Gap</h3>
              <a href="http://[broken]/mod/page/view.php">broken</a>
              <a href="/mod/page/view.php?id=4">fine</a>
            </li>"#;

        let sections = sections(html);
        assert_eq!(
            sections[0]
                .page_urls
                .iter()
                .map(Url::as_str)
                .collect::<Vec<_>>(),
            vec!["https://campus.example/mod/page/view.php?id=4"]
        );
    }

    #[test]
    fn custom_marker_narrows_link_selection() {
        let html = r#"
            <li class="section"><h3 class="sectionname">Custom</h3>
              <a href="/mod/page/view.php?id=1">page</a>
              <a href="/mod/lesson/view.php?id=2">lesson</a>
            </li>"#;

        let profile = Profile {
            page_link_marker: "mod/lesson/view.php".to_owned(),
            ..Profile::default()
        };
        let sections = extract_sections(html, &course_url(), &profile);
        assert_eq!(
            sections[0]
                .page_urls
                .iter()
                .map(Url::as_str)
                .collect::<Vec<_>>(),
            vec!["https://campus.example/mod/lesson/view.php?id=2"]
        );
    }
}
