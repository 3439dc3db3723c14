// recommend-service-rs/src/leetcode_client.rs
//
// Best-effort HTTP client for the public LeetCode statistics API.
//
// Every fetch resolves to Some(json) on success and None on any transport
// or status failure. The upstream is unauthenticated and best-effort, so
// there are no retries and no schema validation; failures degrade to
// defaults downstream instead of aborting the request.

use futures_util::future::join_all;
use reqwest::Client;
use serde_json::Value;
use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://alfa-leetcode-api.onrender.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw payloads feeding the recommendation pipeline, one per endpoint.
#[derive(Debug, Default)]
pub struct UserBundle {
    pub profile: Option<Value>,
    pub solved: Option<Value>,
    pub submissions: Option<Value>,
}

/// Raw payloads for the profile display endpoint.
#[derive(Debug, Default)]
pub struct ProfileOverview {
    pub profile: Option<Value>,
    pub solved: Option<Value>,
    pub contest: Option<Value>,
    pub submissions: Option<Value>,
    pub badges: Option<Value>,
    pub languages: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct LeetCodeClient {
    client: Client,
    base_url: String,
}

impl LeetCodeClient {
    /// Creates a client configured from environment variables
    /// (`LEETCODE_API_URL`, `LEETCODE_TIMEOUT_SECS`).
    pub fn new() -> Self {
        let base_url = config_rs::get_external_api_url("LEETCODE_API_URL", DEFAULT_BASE_URL);
        let timeout_secs = env::var("LEETCODE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self { client, base_url }
    }

    /// Constructor with an explicit base URL, bypassing the environment.
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, username: &str, suffix: &str) -> String {
        if suffix.is_empty() {
            format!("{}/{}", self.base_url, username)
        } else {
            format!("{}/{}/{}", self.base_url, username, suffix)
        }
    }

    /// Issue one GET, resolving to None on any failure. Each failed fetch
    /// leaves one diagnostic entry naming the handle and URL.
    async fn get_json(&self, username: &str, url: &str) -> Option<Value> {
        let response = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(err) => {
                log::warn!("[GET ERROR] user={} url={} err={}", username, url, err);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::warn!("[GET ERROR] user={} url={} status={}", username, url, status);
            return None;
        }

        match response.json::<Value>().await {
            Ok(json) => Some(json),
            Err(err) => {
                log::warn!("[GET ERROR] user={} url={} err={}", username, url, err);
                None
            }
        }
    }

    /// Fetch the three payloads feeding stats normalization. The fetches
    /// are independent and run concurrently; one failure does not cancel
    /// the others, so overall latency is bounded by the slowest fetch.
    pub async fn fetch_user_bundle(&self, username: &str, limit: u32) -> UserBundle {
        let profile_url = self.endpoint(username, "");
        let solved_url = self.endpoint(username, "solved");
        let submissions_url = format!("{}?limit={}", self.endpoint(username, "submission"), limit);

        let (profile, solved, submissions) = tokio::join!(
            self.get_json(username, &profile_url),
            self.get_json(username, &solved_url),
            self.get_json(username, &submissions_url),
        );

        UserBundle {
            profile,
            solved,
            submissions,
        }
    }

    /// Fetch the six-endpoint overview backing the profile display route,
    /// with the same per-fetch isolation as the recommendation bundle.
    pub async fn fetch_profile_overview(&self, username: &str) -> ProfileOverview {
        let suffixes = ["", "solved", "contest", "submission", "badges", "language"];
        let urls: Vec<String> = suffixes
            .iter()
            .map(|suffix| self.endpoint(username, suffix))
            .collect();

        let mut results = join_all(urls.iter().map(|url| self.get_json(username, url))).await;
        let mut drain = results.drain(..);

        ProfileOverview {
            profile: drain.next().flatten(),
            solved: drain.next().flatten(),
            contest: drain.next().flatten(),
            submissions: drain.next().flatten(),
            badges: drain.next().flatten(),
            languages: drain.next().flatten(),
        }
    }
}
