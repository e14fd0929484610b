use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::credentials::Credentials;
use crate::error::PsnError;
use crate::types::{ProfileResponse, TitleListPage, TitleStats, TokenResponse, TrophyTitle, TrophyTitlePage};

const AUTH_BASE: &str = "https://ca.account.sony.com/api/authz/v3/oauth";
const GAME_LIST_URL: &str = "https://m.np.playstation.com/api/gamelist/v2/users/me/titles";
const TROPHY_TITLES_URL: &str = "https://m.np.playstation.com/api/trophy/v1/users/me/trophyTitles";
const PROFILE_URL: &str =
    "https://us-prof.np.community.playstation.net/userProfile/v1/users/me/profile2";

const REDIRECT_URI: &str = "com.scee.psxandroid.scecompcall://redirect";
const CLIENT_ID: &str = "09515159-7237-4370-9b40-3806e67c0891";
const SCOPE: &str = "psn:mobile.v2.core psn:clientapp";
// Pre-encoded "client_id:client_secret" for the mobile app's token endpoint.
const TOKEN_AUTH_BASIC: &str = "MDk1MTUxNTktNzIzNy00MzcwLTliNDAtMzgwNmU2N2MwODkxOnVjUGprYTV0bnRCMktxc1A=";

const GAME_LIST_PAGE_SIZE: u32 = 200;
const TROPHY_PAGE_SIZE: u32 = 400;
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(300);

/// HTTP client for the PSN API with token auth and rate limiting.
pub struct PsnClient {
    http: reqwest::Client,
    access_token: String,
    last_request: Arc<Mutex<Instant>>,
}

impl PsnClient {
    /// Exchange the NPSSO token for an access token and resolve the account's
    /// online id. Authentication failure here is fatal for the run.
    pub async fn connect(creds: Credentials) -> Result<(Self, String), PsnError> {
        // Redirects stay manual: the authorize endpoint hands back the code
        // in a Location header for an app-scheme URI reqwest can't follow.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(30))
            .build()?;

        let access_token = exchange_npsso(&http, &creds.npsso).await?;

        let client = Self {
            http,
            access_token,
            last_request: Arc::new(Mutex::new(Instant::now() - MIN_REQUEST_INTERVAL)),
        };

        let online_id = client.online_id().await?;
        Ok((client, online_id))
    }

    /// Fetch the authenticated account's online id.
    async fn online_id(&self) -> Result<String, PsnError> {
        let resp: ProfileResponse = self
            .get_json(PROFILE_URL, &[("fields", "onlineId".to_string())])
            .await?;
        Ok(resp.profile.online_id)
    }

    /// Fetch the complete game-list feed (playtime statistics), paginating
    /// until the API stops returning a next offset.
    pub async fn title_stats(&self) -> Result<Vec<TitleStats>, PsnError> {
        let mut titles = Vec::new();
        let mut offset = 0u32;

        loop {
            let page: TitleListPage = self
                .get_json(
                    GAME_LIST_URL,
                    &[
                        ("categories", "ps4_game,ps5_native_game".to_string()),
                        ("limit", GAME_LIST_PAGE_SIZE.to_string()),
                        ("offset", offset.to_string()),
                    ],
                )
                .await?;

            titles.extend(page.titles);
            match page.next_offset {
                Some(next) => offset = next,
                None => break,
            }
        }

        Ok(titles)
    }

    /// Fetch the complete trophy-title feed, paginating until exhaustion.
    pub async fn trophy_titles(&self) -> Result<Vec<TrophyTitle>, PsnError> {
        let mut titles = Vec::new();
        let mut offset = 0u32;

        loop {
            let page: TrophyTitlePage = self
                .get_json(
                    TROPHY_TITLES_URL,
                    &[
                        ("limit", TROPHY_PAGE_SIZE.to_string()),
                        ("offset", offset.to_string()),
                    ],
                )
                .await?;

            titles.extend(page.trophy_titles);
            match page.next_offset {
                Some(next) => offset = next,
                None => break,
            }
        }

        Ok(titles)
    }

    /// Perform an authenticated GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, PsnError> {
        self.rate_limit().await;

        let resp = self
            .http
            .get(url)
            .query(params)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PsnError::Authentication(
                "access token rejected; the NPSSO token may have expired".to_string(),
            ));
        }

        let text = resp.text().await?;
        if !status.is_success() {
            return Err(PsnError::Api {
                status: status.as_u16(),
                message: text[..text.len().min(200)].to_string(),
            });
        }

        let value: T = serde_json::from_str(&text).map_err(|e| PsnError::Api {
            status: status.as_u16(),
            message: format!("failed to parse response: {e}. Body: {}", &text[..text.len().min(200)]),
        })?;
        Ok(value)
    }

    /// Enforce rate limiting: wait until at least MIN_REQUEST_INTERVAL has
    /// passed since the last API request.
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < MIN_REQUEST_INTERVAL {
            tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// Run the NPSSO → authorization-code → access-token exchange.
async fn exchange_npsso(http: &reqwest::Client, npsso: &str) -> Result<String, PsnError> {
    let resp = http
        .get(format!("{AUTH_BASE}/authorize"))
        .query(&[
            ("access_type", "offline"),
            ("client_id", CLIENT_ID),
            ("redirect_uri", REDIRECT_URI),
            ("response_type", "code"),
            ("scope", SCOPE),
        ])
        .header(reqwest::header::COOKIE, format!("npsso={npsso}"))
        .send()
        .await?;

    let location = resp
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            PsnError::Authentication(
                "authorize endpoint did not redirect; NPSSO token is invalid or expired".to_string(),
            )
        })?;

    let code = location
        .split_once("code=")
        .map(|(_, rest)| rest.split('&').next().unwrap_or(rest))
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            PsnError::Authentication(format!(
                "no authorization code in redirect: {}",
                &location[..location.len().min(120)]
            ))
        })?;

    let resp = http
        .post(format!("{AUTH_BASE}/token"))
        .header(
            reqwest::header::AUTHORIZATION,
            format!("Basic {TOKEN_AUTH_BASIC}"),
        )
        .form(&[
            ("code", code),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
            ("token_format", "jwt"),
        ])
        .send()
        .await?;

    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(PsnError::Authentication(
            "token endpoint rejected the authorization code".to_string(),
        ));
    }
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(PsnError::Api {
            status: status.as_u16(),
            message: text[..text.len().min(200)].to_string(),
        });
    }

    let token: TokenResponse = resp.json().await?;
    Ok(token.access_token)
}
