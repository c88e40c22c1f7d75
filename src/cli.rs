use crate::config::{load_config, validate_color};
use crate::ir::ContributionCalendar;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::logging::init_logging;
use crate::render::write_output_svg;
use crate::source::calendar_from_json;
use crate::theme::Theme;
use crate::{RenderOptions, render_calendar};
use anyhow::{Result, anyhow};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "contrib-svg", version, about = "GitHub-style contribution graphs as SVG")]
pub struct Args {
    /// Log level (off, error, warn, info, debug, trace). RUST_LOG wins when set.
    #[arg(long = "log-level", global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one calendar to SVG
    Render(RenderArgs),
    /// Serve graphs over HTTP
    #[cfg(all(feature = "github", feature = "server"))]
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Calendar JSON (bare calendar or GraphQL response), or '-' for stdin
    #[arg(short = 'i', long = "input", conflicts_with = "user")]
    pub input: Option<PathBuf>,

    /// GitHub login to fetch instead of reading a file
    #[arg(short = 'u', long = "user")]
    pub user: Option<String>,

    /// GitHub token used with --user
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Year shown in the title. Defaults to the calendar's last year, then the current year.
    #[arg(short = 'y', long = "year")]
    pub year: Option<i32>,

    /// Display name for the accessible label. Defaults to --user.
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Text shown instead of the name in the accessible label (upper-cased)
    #[arg(short = 't', long = "text")]
    pub text: Option<String>,

    /// Title color override
    #[arg(long = "text-color")]
    pub text_color: Option<String>,

    /// Built-in theme. Palette and themeVariables from --configFile still apply on top.
    #[arg(long = "theme", value_enum)]
    pub theme: Option<ThemeName>,

    /// Config JSON file (theme, palette, themeVariables)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Also write the computed geometry as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,
}

#[cfg(all(feature = "github", feature = "server"))]
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short = 'b', long = "bind", default_value = "0.0.0.0:5000")]
    pub bind: String,

    /// Config JSON file applied to every response
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// GitHub token used for every upstream request
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Requests handled at the same time
    #[arg(short = 'w', long = "workers", default_value_t = 8)]
    pub workers: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Dark,
    Light,
}

impl ThemeName {
    fn theme(self) -> Theme {
        match self {
            ThemeName::Dark => Theme::github_dark(),
            ThemeName::Light => Theme::github_light(),
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level).map_err(anyhow::Error::msg)?;
    match args.command {
        Command::Render(render) => run_render(render),
        #[cfg(all(feature = "github", feature = "server"))]
        Command::Serve(serve) => run_serve(serve),
    }
}

fn run_render(args: RenderArgs) -> Result<()> {
    let config = render_config(args.config.as_deref(), args.theme)?;

    let (calendar, year) = match args.user.as_deref() {
        Some(user) => {
            let year = args.year.unwrap_or_else(current_year);
            (fetch_calendar(user, year, args.token.as_deref())?, year)
        }
        None => {
            let calendar = read_calendar(args.input.as_deref())?;
            let year = resolve_year(args.year, &calendar);
            (calendar, year)
        }
    };

    let subject = args
        .name
        .clone()
        .or_else(|| args.user.clone())
        .unwrap_or_else(|| "contributor".to_string());
    let mut options = RenderOptions::with_config(year, subject, config);
    options.display_text = args.text.as_deref().map(str::to_uppercase);
    if let Some(color) = args.text_color {
        options.text_color = Some(validate_color("--text-color", color)?);
    }

    let svg = render_calendar(&calendar, &options)?;
    write_output_svg(&svg, args.output.as_deref())?;

    if let Some(path) = args.dump_layout.as_deref() {
        let layout = compute_layout(&calendar, year, &options.theme, &options.layout)?;
        write_layout_dump(path, &layout)?;
        info!("wrote layout dump to {}", path.display());
    }
    Ok(())
}

fn render_config(path: Option<&Path>, theme: Option<ThemeName>) -> Result<crate::Config> {
    let mut config = load_config(path)?;
    if let Some(theme) = theme {
        config.set_theme(theme.theme());
    }
    Ok(config)
}

#[cfg(all(feature = "github", feature = "server"))]
fn run_serve(args: ServeArgs) -> Result<()> {
    use crate::github::GitHubClient;
    use crate::service::{GraphService, serve};

    let config = load_config(args.config.as_deref())?;
    let service = GraphService::new(GitHubClient::new(), args.token, config);
    serve(&args.bind, &service, args.workers)
}

#[cfg(feature = "github")]
fn fetch_calendar(user: &str, year: i32, token: Option<&str>) -> Result<ContributionCalendar> {
    use crate::error::FetchError;
    use crate::github::GitHubClient;
    use crate::source::CalendarSource;

    let token = token.ok_or(FetchError::MissingToken)?;
    Ok(GitHubClient::new().fetch_calendar(user, year, token)?)
}

#[cfg(not(feature = "github"))]
fn fetch_calendar(user: &str, _year: i32, _token: Option<&str>) -> Result<ContributionCalendar> {
    Err(anyhow!(
        "cannot fetch {user}: built without the `github` feature"
    ))
}

fn read_calendar(path: Option<&Path>) -> Result<ContributionCalendar> {
    let input = read_input(path)?;
    if input.trim().is_empty() {
        return Err(anyhow!("No calendar JSON found in input"));
    }
    Ok(calendar_from_json(&input)?)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn resolve_year(explicit: Option<i32>, calendar: &ContributionCalendar) -> i32 {
    explicit
        .or_else(|| calendar.year_hint())
        .unwrap_or_else(current_year)
}
