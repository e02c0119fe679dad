//! Two-step credential handshake against the platform login endpoint.

use std::sync::LazyLock;

use reqwest::StatusCode;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use crate::profile::Profile;

static LOGIN_TOKEN_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[name="logintoken"]"#).expect("valid selector"));

const USERNAME_FIELD: &str = "username";
const PASSWORD_FIELD: &str = "password";
const LOGIN_TOKEN_FIELD: &str = "logintoken";

/// Failures while establishing an authenticated platform session.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Transport-level failure talking to the platform.
    #[error("login request failed")]
    Http(#[from] reqwest::Error),

    /// A login request came back with a non-success status.
    #[error("login request to {url} returned {status}")]
    Status { url: Url, status: StatusCode },

    /// The login page no longer carries a `logintoken` input, so the
    /// platform layout has changed out from under us.
    #[error("login page has no logintoken field")]
    MissingToken,

    /// The platform reported the sign-in attempt as failed.
    #[error("the platform rejected the sign-in; check your username and password")]
    InvalidCredentials,

    /// The configured login path does not resolve against the base URL.
    #[error("cannot build a login url from {base} and {path}")]
    LoginUrl {
        base: Url,
        path: String,
        #[source]
        source: url::ParseError,
    },
}

/// Authenticates the client's session: fetches the login form, scrapes
/// the CSRF token, and posts the credentials. On success the client's
/// cookie jar holds the session cookies; the platform signals failure
/// only through `profile.login_error_marker` in the response body.
pub async fn login(
    client: &reqwest::Client,
    base_url: &Url,
    profile: &Profile,
    username: &str,
    password: &str,
) -> Result<(), LoginError> {
    let login_url = base_url
        .join(&profile.login_path)
        .map_err(|source| LoginError::LoginUrl {
            base: base_url.clone(),
            path: profile.login_path.clone(),
            source,
        })?;

    tracing::debug!(url = %login_url, "fetching login form");
    let response = client.get(login_url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoginError::Status {
            url: login_url,
            status,
        });
    }
    let form_html = response.text().await?;

    let token = find_login_token(&form_html).ok_or(LoginError::MissingToken)?;

    tracing::debug!(url = %login_url, "posting credentials");
    let form = [
        (USERNAME_FIELD, username),
        (PASSWORD_FIELD, password),
        (LOGIN_TOKEN_FIELD, token.as_str()),
    ];
    let response = client.post(login_url.clone()).form(&form).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoginError::Status {
            url: login_url,
            status,
        });
    }

    let body = response.text().await?;
    let marker = profile.login_error_marker.to_lowercase();
    if body.to_lowercase().contains(&marker) {
        return Err(LoginError::InvalidCredentials);
    }

    tracing::info!("authenticated platform session established");
    Ok(())
}

/// The `logintoken` hidden-input value from the login form, if the form
/// still carries one. An empty value is passed through as-is.
fn find_login_token(login_html: &str) -> Option<String> {
    let document = Html::parse_document(login_html);
    document
        .select(&LOGIN_TOKEN_SELECTOR)
        .find_map(|input| input.value().attr("value"))
        .map(str::to_owned)
}
