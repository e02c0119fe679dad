//! Per-deployment platform coupling: the literals that tie this tool to
//! one concrete installation of the course platform.

pub const DEFAULT_LOGIN_PATH: &str = "/login/index.php";
pub const DEFAULT_LOGIN_ERROR_MARKER: &str = "loginerrors";
pub const DEFAULT_PAGE_LINK_MARKER: &str = "mod/page/view.php";
pub const DEFAULT_MEDIA_URL_PREFIX: &str = "https://zoodle.macam.ac.il/jercol/media/";
pub const DEFAULT_DOWNLOAD_URL_BASE: &str = "https://zoodle.macam.ac.il/jercol/files/";

/// Decorative "click here"-style suffixes seen in section headings on
/// the default deployment. Ordered longest-first so removing one phrase
/// never leaves a tail of a longer one behind.
#[must_use]
pub fn default_heading_noise_phrases() -> Vec<String> {
    [
        "לחצו כאן לצפייה",
        "לחצו כאן",
        "לחץ כאן",
        "click here",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

#[derive(Debug, Clone)]
pub struct Profile {
    /// Login page path, resolved against the platform base URL.
    pub login_path: String,
    /// Substring of the login response body that marks rejected
    /// credentials (matched case-insensitively).
    pub login_error_marker: String,
    /// Substring of an anchor href that marks a content page.
    pub page_link_marker: String,
    /// Absolute URL prefix of embedded media references; the media id
    /// is the alphanumeric run that follows it.
    pub media_url_prefix: String,
    /// Absolute URL prefix that download links are built from, by
    /// appending the media id and `.mp4`.
    pub download_url_base: String,
    /// Decorative phrases to strip from section headings.
    pub heading_noise_phrases: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            login_error_marker: DEFAULT_LOGIN_ERROR_MARKER.to_owned(),
            page_link_marker: DEFAULT_PAGE_LINK_MARKER.to_owned(),
            media_url_prefix: DEFAULT_MEDIA_URL_PREFIX.to_owned(),
            download_url_base: DEFAULT_DOWNLOAD_URL_BASE.to_owned(),
            heading_noise_phrases: default_heading_noise_phrases(),
        }
    }
}
