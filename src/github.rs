//! Fetches contribution calendars from the GitHub GraphQL API.

use std::time::Duration;

use log::{info, warn};

use crate::error::FetchError;
use crate::ir::ContributionCalendar;
use crate::source::{CalendarSource, GraphQlRequest, decode_graphql_response};

pub const GITHUB_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("contrib-svg/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct GitHubClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl GitHubClient {
    pub fn new() -> Self {
        Self::with_endpoint(GITHUB_GRAPHQL_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarSource for GitHubClient {
    fn fetch_calendar(
        &self,
        login: &str,
        year: i32,
        token: &str,
    ) -> Result<ContributionCalendar, FetchError> {
        if token.trim().is_empty() {
            return Err(FetchError::MissingToken);
        }
        info!("Fetching contributions for {login} in {year}");
        let request = GraphQlRequest::contributions(login, year);
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {token}"))
            .send_json(&request);

        match response {
            Ok(response) => {
                let body = response
                    .into_string()
                    .map_err(|err| FetchError::Transport(err.to_string()))?;
                decode_graphql_response(&body)
            }
            Err(ureq::Error::Status(401, response)) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Bad credentials".to_string());
                warn!("GitHub rejected the token for {login}");
                Err(FetchError::Unauthorized(message))
            }
            Err(ureq::Error::Status(status, response)) => {
                let message = response.into_string().unwrap_or_default();
                warn!("GitHub returned HTTP {status} for {login}");
                Err(FetchError::Status { status, message })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(FetchError::Transport(transport.to_string()))
            }
        }
    }
}
