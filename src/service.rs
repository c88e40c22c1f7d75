//! HTTP boundary: routes graph requests to a [`CalendarSource`] and the
//! renderer, and turns every outcome into a single plain response.
//!
//! Routes:
//! - `GET /` health text
//! - `GET /graph/{user}?year=&text=&theme=&color=`
//! - `GET /api/graph?user=&year=&text=&theme=&color=`

use std::io::Cursor;

use anyhow::anyhow;
use chrono::Datelike;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::config::{Config, is_valid_color};
use crate::error::FetchError;
use crate::source::CalendarSource;
use crate::theme::Theme;
use crate::{RenderOptions, render_calendar};

static LOGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,38})$").unwrap());

const SVG_CONTENT_TYPE: &str = "image/svg+xml";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl ServiceResponse {
    fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: TEXT_CONTENT_TYPE,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    fn svg(body: String) -> Self {
        Self {
            status: 200,
            content_type: SVG_CONTENT_TYPE,
            headers: vec![
                (
                    "Cache-Control",
                    "no-store, no-cache, must-revalidate, max-age=0".to_string(),
                ),
                ("Pragma", "no-cache".to_string()),
                ("Expires", "0".to_string()),
                ("Access-Control-Allow-Origin", "*".to_string()),
            ],
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case("Content-Type") {
            return Some(self.content_type);
        }
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn into_tiny_http(self) -> tiny_http::Response<Cursor<Vec<u8>>> {
        let mut headers = Vec::with_capacity(self.headers.len() + 1);
        let all = std::iter::once(("Content-Type", self.content_type.to_string()))
            .chain(self.headers);
        for (name, value) in all {
            match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => headers.push(header),
                Err(()) => warn!("dropping invalid response header {name}"),
            }
        }
        let body = self.body.into_bytes();
        let len = body.len();
        tiny_http::Response::new(
            tiny_http::StatusCode(self.status),
            headers,
            Cursor::new(body),
            Some(len),
            None,
        )
    }
}

/// Per-request parameters after routing.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GraphRequest {
    login: String,
    year: i32,
    display_text: Option<String>,
    theme: Option<String>,
    text_color: Option<String>,
}

pub struct GraphService<S> {
    source: S,
    token: Option<String>,
    config: Config,
}

impl<S: CalendarSource> GraphService<S> {
    pub fn new(source: S, token: Option<String>, config: Config) -> Self {
        let token = token.filter(|token| !token.trim().is_empty());
        Self {
            source,
            token,
            config,
        }
    }

    /// Handles one request. `default_year` is used when the query carries no
    /// `year`.
    pub fn handle(&self, method: &str, raw_url: &str, default_year: i32) -> ServiceResponse {
        if !method.eq_ignore_ascii_case("GET") {
            return ServiceResponse::text(405, "Method Not Allowed");
        }
        let Ok(url) = Url::parse("http://localhost/").and_then(|base| base.join(raw_url)) else {
            return ServiceResponse::text(400, "Bad Request");
        };

        let path_login = match url.path() {
            "/" => {
                return ServiceResponse::text(
                    200,
                    "Contribution Graph API is running. Use /graph/<username>",
                );
            }
            "/api/graph" => None,
            path => match path.strip_prefix("/graph/") {
                Some(login) if !login.is_empty() && !login.contains('/') => {
                    Some(login.to_string())
                }
                _ => return ServiceResponse::text(404, "Not Found"),
            },
        };

        let Some(token) = self.token.as_deref() else {
            return ServiceResponse::text(500, FetchError::MissingToken.to_string());
        };

        let request = match parse_graph_request(&url, path_login, default_year) {
            Ok(request) => request,
            Err(message) => return ServiceResponse::text(400, message),
        };

        self.render(&request, token)
    }

    fn render(&self, request: &GraphRequest, token: &str) -> ServiceResponse {
        let calendar = match self.source.fetch_calendar(&request.login, request.year, token) {
            Ok(calendar) => calendar,
            Err(FetchError::Unauthorized(message)) => {
                return ServiceResponse::text(401, format!("Unauthorized: {message}"));
            }
            Err(err) => {
                warn!("fetch failed for {}: {err}", request.login);
                return ServiceResponse::text(500, format!("Error generating SVG: {err}"));
            }
        };

        let mut config = self.config.clone();
        if let Some(theme) = request.theme.as_deref().and_then(Theme::from_name) {
            config.set_theme(theme);
        }
        let mut options = RenderOptions::with_config(request.year, request.login.clone(), config);
        options.display_text = request.display_text.clone();
        options.text_color = request.text_color.clone();

        match render_calendar(&calendar, &options) {
            Ok(svg) => ServiceResponse::svg(svg),
            Err(err) => {
                warn!("render failed for {}: {err}", request.login);
                ServiceResponse::text(500, format!("Error generating SVG: {err}"))
            }
        }
    }
}

fn parse_graph_request(
    url: &Url,
    path_login: Option<String>,
    default_year: i32,
) -> Result<GraphRequest, String> {
    let mut login = path_login;
    let mut year = None;
    let mut display_text = None;
    let mut theme = None;
    let mut text_color = None;
    for (key, value) in url.query_pairs() {
        match &*key {
            "user" if login.is_none() => login = Some(value.into_owned()),
            "year" if !value.trim().is_empty() => year = Some(value.into_owned()),
            "text" if !value.is_empty() => display_text = Some(value.to_uppercase()),
            "theme" => theme = Some(value.into_owned()),
            "color" => text_color = Some(value.into_owned()),
            _ => {}
        }
    }

    let login = login
        .filter(|login| !login.is_empty())
        .ok_or_else(|| "Missing required query param: user".to_string())?;
    if !LOGIN_RE.is_match(&login) {
        return Err("Invalid user".to_string());
    }

    let year = match year {
        Some(raw) => match raw.trim().parse::<i32>() {
            Ok(year) if (1..=9999).contains(&year) => year,
            _ => return Err("Invalid query param: year".to_string()),
        },
        None => default_year,
    };

    if let Some(name) = theme.as_deref() {
        if Theme::from_name(name).is_none() {
            return Err("Invalid query param: theme".to_string());
        }
    }
    if let Some(color) = text_color.as_deref() {
        if !is_valid_color(color) {
            return Err("Invalid query param: color".to_string());
        }
    }

    Ok(GraphRequest {
        login,
        year,
        display_text,
        theme,
        text_color,
    })
}

/// Binds `addr` and serves requests on `workers` threads until the listener
/// fails.
pub fn serve<S: CalendarSource + Sync>(
    addr: &str,
    service: &GraphService<S>,
    workers: usize,
) -> anyhow::Result<()> {
    let server =
        tiny_http::Server::http(addr).map_err(|err| anyhow!("failed to bind {addr}: {err}"))?;
    info!("Listening on http://{addr} with {} workers", workers.max(1));
    if service.token.is_none() {
        warn!("GITHUB_TOKEN is not set; graph requests will fail");
    }
    serve_requests(&server, service, workers);
    Ok(())
}

/// Drains `server` from `workers` scoped threads. Returns once every worker
/// has been unblocked or the listener has failed.
fn serve_requests<S: CalendarSource + Sync>(
    server: &tiny_http::Server,
    service: &GraphService<S>,
    workers: usize,
) {
    std::thread::scope(|scope| {
        for _ in 0..workers.max(1) {
            scope.spawn(|| {
                for request in server.incoming_requests() {
                    respond(service, request);
                }
            });
        }
    });
}

fn respond<S: CalendarSource>(service: &GraphService<S>, request: tiny_http::Request) {
    let method = request.method().to_string();
    let raw_url = request.url().to_string();
    let default_year = chrono::Local::now().year();
    let response = service.handle(&method, &raw_url, default_year);
    info!("{method} {raw_url} -> {}", response.status);
    if let Err(err) = request.respond(response.into_tiny_http()) {
        warn!("failed to send response for {raw_url}: {err}");
    }
}
