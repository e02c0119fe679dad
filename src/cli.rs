use clap::{Parser, ValueEnum};

use crate::profile::{self, Profile};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Course overview page URL (must be http/https).
    #[arg(long)]
    pub course_url: String,

    /// Platform login username.
    #[arg(long)]
    pub username: String,

    /// Platform login password.
    #[arg(long)]
    pub password: String,

    /// Manifest output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Login form path on the platform host.
    #[arg(long, default_value = profile::DEFAULT_LOGIN_PATH)]
    pub login_path: String,

    /// Substring that flags a failed login, matched case-insensitively.
    #[arg(long, default_value = profile::DEFAULT_LOGIN_ERROR_MARKER)]
    pub login_error_marker: String,

    /// Substring that identifies content-page links on the course page.
    #[arg(long, default_value = profile::DEFAULT_PAGE_LINK_MARKER)]
    pub page_link_marker: String,

    /// URL prefix of embedded media references.
    #[arg(long, default_value = profile::DEFAULT_MEDIA_URL_PREFIX)]
    pub media_url_prefix: String,

    /// Base URL the download links are built from.
    #[arg(long, default_value = profile::DEFAULT_DOWNLOAD_URL_BASE)]
    pub download_url_base: String,

    /// Decorative heading phrase to strip; repeatable, replaces the built-in list.
    #[arg(long = "strip-phrase")]
    pub strip_phrases: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Jsonl,
}

impl Cli {
    /// Deployment profile assembled from the defaults and any overrides.
    #[must_use]
    pub fn profile(&self) -> Profile {
        let mut profile = Profile {
            login_path: self.login_path.clone(),
            login_error_marker: self.login_error_marker.clone(),
            page_link_marker: self.page_link_marker.clone(),
            media_url_prefix: self.media_url_prefix.clone(),
            download_url_base: self.download_url_base.clone(),
            ..Profile::default()
        };
        if !self.strip_phrases.is_empty() {
            profile.heading_noise_phrases = self.strip_phrases.clone();
        }
        profile
    }
}
