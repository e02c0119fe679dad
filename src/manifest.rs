//! Orchestrates a full run: login, course fetch, section walk, manifest output.

use std::io::Write;
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::auth;
use crate::cli::{Cli, OutputFormat};
use crate::course::{self, Section};
use crate::formats::ManifestRecord;
use crate::media::MediaExtractor;
use crate::profile::Profile;

/// One mapped video: the derived filename and its direct download URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub filename: String,
    pub download_url: String,
}

/// All mapped videos of one course section. Sections without videos are
/// kept so the output mirrors the course structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionManifest {
    pub name: String,
    pub slug: String,
    pub entries: Vec<ManifestEntry>,
}

pub async fn run(args: Cli) -> anyhow::Result<()> {
    let profile = args.profile();

    let course_url = Url::parse(&args.course_url).context("parse --course-url")?;
    if course_url.scheme() != "http" && course_url.scheme() != "https" {
        anyhow::bail!("--course-url must be http/https: {course_url}");
    }
    let base_url = origin_url(&course_url)?;

    let client =
        build_client(Duration::from_secs(args.timeout_secs)).context("build http client")?;

    auth::login(&client, &base_url, &profile, &args.username, &args.password)
        .await
        .context("log in to the platform")?;

    let manifests = collect(&client, &course_url, &profile).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => write_text(&mut out, &manifests).context("write manifest")?,
        OutputFormat::Jsonl => write_jsonl(&mut out, &manifests).context("write manifest")?,
    }

    Ok(())
}

/// Fetches the course page and maps every section's content pages to
/// manifest entries, in document order. The client must already carry
/// an authenticated session.
pub async fn collect(
    client: &reqwest::Client,
    course_url: &Url,
    profile: &Profile,
) -> anyhow::Result<Vec<SectionManifest>> {
    let extractor = MediaExtractor::new(&profile.media_url_prefix)?;

    let course_html = fetch_page(client, course_url)
        .await
        .context("fetch course page")?;
    let sections = course::extract_sections(&course_html, course_url, profile);
    tracing::info!(sections = sections.len(), "extracted course structure");

    let mut manifests = Vec::with_capacity(sections.len());
    for section in sections {
        manifests.push(section_entries(client, &extractor, profile, section).await);
    }

    Ok(manifests)
}

/// Walks one section's pages. The filename counter is scoped to the
/// section and advances in page-then-reference order; a page that fails
/// to fetch is skipped so one broken page cannot sink the whole run.
async fn section_entries(
    client: &reqwest::Client,
    extractor: &MediaExtractor,
    profile: &Profile,
    section: Section,
) -> SectionManifest {
    let mut entries = Vec::new();
    let mut counter = 1usize;

    for page_url in &section.page_urls {
        let page_html = match fetch_page(client, page_url).await {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(url = %page_url, ?err, "skipping content page");
                continue;
            }
        };

        if !extractor.likely_references_host(&page_html) {
            tracing::debug!(url = %page_url, "page does not mention the media host");
            continue;
        }

        let media_ids = extractor.media_ids(&page_html);
        tracing::debug!(url = %page_url, count = media_ids.len(), "extracted media references");

        for media_id in media_ids {
            entries.push(ManifestEntry {
                filename: media_filename(&section.slug, counter),
                download_url: format!("{}{media_id}.mp4", profile.download_url_base),
            });
            counter += 1;
        }
    }

    tracing::info!(section = %section.slug, videos = entries.len(), "section mapped");
    SectionManifest {
        name: section.name,
        slug: section.slug,
        entries,
    }
}

/// Client used for every platform request. Cookie persistence carries
/// the session from the login handshake into the later page fetches.
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(concat!("vidmap/", env!("CARGO_PKG_VERSION")))
        .build()
}

async fn fetch_page(client: &reqwest::Client, url: &Url) -> anyhow::Result<String> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("GET {url} returned {status}");
    }

    response
        .text()
        .await
        .with_context(|| format!("read body of {url}"))
}

fn origin_url(course_url: &Url) -> anyhow::Result<Url> {
    let host = course_url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("--course-url must have a host: {course_url}"))?;
    let port = match course_url.port() {
        Some(port) => format!(":{port}"),
        None => String::new(),
    };

    Url::parse(&format!("{}://{host}{port}", course_url.scheme()))
        .context("derive platform base url")
}

fn media_filename(slug: &str, index: usize) -> String {
    format!("{slug}_{index:02}.mp4")
}

fn write_text(out: &mut impl Write, manifests: &[SectionManifest]) -> anyhow::Result<()> {
    for manifest in manifests {
        writeln!(out)?;
        writeln!(out, "Unit: {}", manifest.slug)?;
        for entry in &manifest.entries {
            writeln!(out, "  - {}", entry.filename)?;
            writeln!(out, "    {}", entry.download_url)?;
        }
    }
    out.flush().context("flush manifest")?;
    Ok(())
}

fn write_jsonl(out: &mut impl Write, manifests: &[SectionManifest]) -> anyhow::Result<()> {
    for manifest in manifests {
        for entry in &manifest.entries {
            let record = ManifestRecord {
                section: manifest.slug.clone(),
                filename: entry.filename.clone(),
                url: entry.download_url.clone(),
            };
            serde_json::to_writer(&mut *out, &record).context("serialize manifest record")?;
            out.write_all(b"\n").context("write manifest newline")?;
        }
    }
    out.flush().context("flush manifest")?;
    Ok(())
}
