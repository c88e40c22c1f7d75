//! Where calendars come from: the `CalendarSource` seam plus decoding of
//! the GitHub GraphQL payloads, which is shared by the network client and by
//! JSON files saved from it.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::ir::ContributionCalendar;

pub const CONTRIBUTIONS_QUERY: &str = r#"
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            date
            weekday
            contributionCount
            contributionLevel
          }
        }
      }
    }
  }
}
"#;

/// Supplies one year of contributions for a login.
pub trait CalendarSource {
    fn fetch_calendar(
        &self,
        login: &str,
        year: i32,
        token: &str,
    ) -> Result<ContributionCalendar, FetchError>;
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub variables: QueryVariables,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryVariables {
    pub login: String,
    pub from: String,
    pub to: String,
}

impl GraphQlRequest {
    /// Query covering the whole calendar year in UTC.
    pub fn contributions(login: &str, year: i32) -> Self {
        Self {
            query: CONTRIBUTIONS_QUERY,
            variables: QueryVariables {
                login: login.to_string(),
                from: format!("{year:04}-01-01T00:00:00Z"),
                to: format!("{year:04}-12-31T23:59:59Z"),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: ContributionCalendar,
}

/// Extracts the calendar from a GraphQL response body.
pub fn decode_graphql_response(body: &str) -> Result<ContributionCalendar, FetchError> {
    let response: GraphQlResponse = serde_json::from_str(body)?;
    graphql_calendar(response)
}

fn graphql_calendar(response: GraphQlResponse) -> Result<ContributionCalendar, FetchError> {
    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(FetchError::GraphQl(messages.join("; ")));
    }
    response
        .data
        .and_then(|data| data.user)
        .map(|user| user.contributions_collection.contribution_calendar)
        .ok_or(FetchError::UserNotFound)
}

/// Accepts either a bare calendar object or a full GraphQL response.
pub fn calendar_from_json(input: &str) -> Result<ContributionCalendar, FetchError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    let is_envelope = value.get("data").is_some() || value.get("errors").is_some();
    if is_envelope {
        let response: GraphQlResponse = serde_json::from_value(value)?;
        graphql_calendar(response)
    } else {
        Ok(serde_json::from_value(value)?)
    }
}
