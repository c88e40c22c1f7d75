#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
#[cfg(feature = "github")]
pub mod github;
pub mod ir;
pub mod layout;
pub mod layout_dump;
#[cfg(feature = "cli")]
pub mod logging;
pub mod render;
#[cfg(feature = "server")]
pub mod service;
pub mod source;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use error::{FetchError, RenderError};
pub use format::{format_tooltip, format_tooltip_iso, ordinal_suffix};
pub use ir::{ContributionCalendar, ContributionDay, ContributionLevel, ContributionWeek, Grade};
pub use layout::{Layout, compute_layout};
pub use render::render_svg;
pub use source::{CalendarSource, calendar_from_json};
pub use theme::{Palette, Theme};

/// Everything a single render needs besides the calendar itself.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub year: i32,
    /// Display name of whoever the calendar belongs to.
    pub subject: String,
    pub theme: Theme,
    pub layout: LayoutConfig,
    /// Replaces the theme's title color for this render only.
    pub text_color: Option<String>,
    /// Replaces the subject in the document's accessible label.
    pub display_text: Option<String>,
}

impl RenderOptions {
    pub fn new(year: i32, subject: impl Into<String>) -> Self {
        Self {
            year,
            subject: subject.into(),
            theme: Theme::default(),
            layout: LayoutConfig::default(),
            text_color: None,
            display_text: None,
        }
    }

    pub fn with_config(year: i32, subject: impl Into<String>, config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            ..Self::new(year, subject)
        }
    }

    fn accessible_label(&self) -> String {
        let name = self.display_text.as_deref().unwrap_or(&self.subject);
        format!("{name}'s contributions in {}", self.year)
    }
}

/// Lays out and writes one calendar. Fails without producing any output when
/// the calendar is structurally invalid.
pub fn render_calendar(
    calendar: &ContributionCalendar,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let layout = compute_layout(calendar, options.year, &options.theme, &options.layout)?;
    let label = options.accessible_label();
    match options.text_color.as_deref() {
        Some(color) => {
            let mut theme = options.theme.clone();
            theme.text_color = color.to_string();
            Ok(render_svg(&layout, &theme, &label))
        }
        None => Ok(render_svg(&layout, &options.theme, &label)),
    }
}
