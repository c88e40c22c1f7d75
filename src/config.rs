use crate::ir::Grade;
use crate::theme::Theme;
use anyhow::{Context, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(#([0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})|(rgb|rgba|hsl|hsla)\(\s*[0-9.%]+(\s*[,/ ]\s*[0-9.%]+){2,3}\s*\)|[a-zA-Z]+)$",
    )
    .unwrap()
});

/// Geometry of the calendar card. All values are in SVG user units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub cell_size: u32,
    pub cell_gap: u32,
    pub cell_radius: u32,
    pub card_padding_left: u32,
    pub card_padding_top: u32,
    pub card_padding_right: u32,
    pub card_padding_bottom: u32,
    pub card_radius: u32,
    pub canvas_padding: u32,
    pub footer_height: u32,
    pub title_x: u32,
    pub title_y: u32,
    /// Distance from the title baseline to the top of the card.
    pub title_gap: u32,
    pub title_font_size: u32,
    pub weekday_label_offset_x: u32,
    pub weekday_font_size: u32,
    pub month_label_offset_y: u32,
    pub month_font_size: u32,
    pub legend_font_size: u32,
    pub legend_offset_bottom: u32,
    pub legend_offset_left: u32,
    pub legend_swatch_offset: u32,
    pub legend_swatch_size: u32,
    pub legend_swatch_step: u32,
    pub legend_swatch_rise: u32,
    pub legend_more_gap: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_size: 11,
            cell_gap: 3,
            cell_radius: 3,
            card_padding_left: 46,
            card_padding_top: 38,
            card_padding_right: 22,
            card_padding_bottom: 36,
            card_radius: 10,
            canvas_padding: 20,
            footer_height: 20,
            title_x: 24,
            title_y: 30,
            title_gap: 18,
            title_font_size: 18,
            weekday_label_offset_x: 6,
            weekday_font_size: 12,
            month_label_offset_y: 20,
            month_font_size: 14,
            legend_font_size: 14,
            legend_offset_bottom: 10,
            legend_offset_left: 6,
            legend_swatch_offset: 40,
            legend_swatch_size: 14,
            legend_swatch_step: 18,
            legend_swatch_rise: 11,
            legend_more_gap: 6,
        }
    }
}

impl LayoutConfig {
    /// Horizontal (and vertical) distance between neighbouring cells.
    pub fn cell_step(&self) -> u32 {
        self.cell_size + self.cell_gap
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    /// Palette and theme variables from the config file, kept so they
    /// survive a later preset switch.
    pub overrides: ThemeOverrides,
}

impl Config {
    /// Switches to `preset` and re-applies the file's overrides on top.
    pub fn set_theme(&mut self, preset: Theme) {
        self.theme = preset;
        self.overrides.apply(&mut self.theme);
    }
}

/// Validated color and font overrides layered onto a theme preset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeOverrides {
    palette: [Option<String>; 5],
    font_family: Option<String>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    month_label_color: Option<String>,
    card_color: Option<String>,
    border_color: Option<String>,
    background: Option<String>,
}

impl ThemeOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, theme: &mut Theme) {
        for grade in Grade::ALL {
            if let Some(color) = &self.palette[grade as usize] {
                *theme.palette.color_mut(grade) = color.clone();
            }
        }
        let fields = [
            (&self.font_family, &mut theme.font_family),
            (&self.text_color, &mut theme.text_color),
            (&self.muted_text_color, &mut theme.muted_text_color),
            (&self.month_label_color, &mut theme.month_label_color),
            (&self.card_color, &mut theme.card_color),
            (&self.border_color, &mut theme.border_color),
            (&self.background, &mut theme.background),
        ];
        for (value, target) in fields {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    month_label_color: Option<String>,
    card_color: Option<String>,
    border_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct PaletteFile {
    grade0: Option<String>,
    grade1: Option<String>,
    grade2: Option<String>,
    grade3: Option<String>,
    grade4: Option<String>,
}

impl PaletteFile {
    fn get(&self, grade: Grade) -> Option<&String> {
        match grade {
            Grade::Grade0 => self.grade0.as_ref(),
            Grade::Grade1 => self.grade1.as_ref(),
            Grade::Grade2 => self.grade2.as_ref(),
            Grade::Grade3 => self.grade3.as_ref(),
            Grade::Grade4 => self.grade4.as_ref(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    cell_size: Option<u32>,
    cell_gap: Option<u32>,
    cell_radius: Option<u32>,
    card_radius: Option<u32>,
    canvas_padding: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    palette: Option<PaletteFile>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("loading config file {}", path.display()))
}

/// Parses a JSON config (JSON5 accepted) on top of the default config.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .map_err(|json5_err| anyhow!("invalid config: {json_err} (as JSON5: {json5_err})"))?,
    };

    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme =
            Theme::from_name(theme_name).ok_or_else(|| anyhow!("unknown theme `{theme_name}`"))?;
    }

    if let Some(palette) = parsed.palette {
        for grade in Grade::ALL {
            if let Some(color) = palette.get(grade) {
                config.overrides.palette[grade as usize] =
                    Some(validate_color(grade.tag(), color.clone())?);
            }
        }
    }

    if let Some(vars) = parsed.theme_variables {
        let overrides = &mut config.overrides;
        overrides.font_family = vars.font_family;
        overrides.text_color = vars
            .text_color
            .map(|v| validate_color("textColor", v))
            .transpose()?;
        overrides.muted_text_color = vars
            .muted_text_color
            .map(|v| validate_color("mutedTextColor", v))
            .transpose()?;
        overrides.month_label_color = vars
            .month_label_color
            .map(|v| validate_color("monthLabelColor", v))
            .transpose()?;
        overrides.card_color = vars
            .card_color
            .map(|v| validate_color("cardColor", v))
            .transpose()?;
        overrides.border_color = vars
            .border_color
            .map(|v| validate_color("borderColor", v))
            .transpose()?;
        overrides.background = vars
            .background
            .map(|v| validate_color("background", v))
            .transpose()?;
    }
    config.overrides.apply(&mut config.theme);

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.cell_size {
            if v == 0 {
                return Err(anyhow!("layout.cellSize must be positive"));
            }
            config.layout.cell_size = v;
        }
        if let Some(v) = layout.cell_gap {
            config.layout.cell_gap = v;
        }
        if let Some(v) = layout.cell_radius {
            config.layout.cell_radius = v;
        }
        if let Some(v) = layout.card_radius {
            config.layout.card_radius = v;
        }
        if let Some(v) = layout.canvas_padding {
            config.layout.canvas_padding = v;
        }
    }

    Ok(config)
}

/// Accepts hex, `rgb()`/`hsl()` style functions and bare CSS color names.
pub fn validate_color(key: &str, value: String) -> anyhow::Result<String> {
    let trimmed = value.trim();
    if COLOR_RE.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(anyhow!("invalid color for {key}: `{value}`"))
    }
}

pub fn is_valid_color(value: &str) -> bool {
    COLOR_RE.is_match(value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ContributionCalendar, ContributionDay};
    use crate::layout::compute_layout;
    use crate::theme::Palette;
    use chrono::{Days, NaiveDate};

    #[test]
    fn empty_config_is_default() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.theme.palette, Palette::github_dark());
        assert_eq!(config.layout.cell_step(), 14);
    }

    #[test]
    fn partial_palette_overrides_listed_grades() {
        let config = parse_config(
            r##"{"theme": "light", "palette": {"grade4": "#ff0000"}}"##,
        )
        .unwrap();
        let light = Palette::github_light();
        assert_eq!(config.theme.palette.grade4, "#ff0000");
        assert_eq!(config.theme.palette.grade0, light.grade0);
        assert_eq!(config.theme.palette.grade3, light.grade3);
    }

    #[test]
    fn json5_config_is_accepted() {
        let config = parse_config(
            r#"{
                // comments are fine
                themeVariables: { textColor: 'rgb(10, 20, 30)', fontFamily: 'Inter' },
            }"#,
        )
        .unwrap();
        assert_eq!(config.theme.text_color, "rgb(10, 20, 30)");
        assert_eq!(config.theme.font_family, "Inter");
    }

    #[test]
    fn invalid_color_names_the_key() {
        let err = parse_config(r#"{"palette": {"grade2": "\"/><script>"}}"#).unwrap_err();
        assert!(format!("{err:#}").contains("grade2"));
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(parse_config(r#"{"theme": "sepia"}"#).is_err());
    }

    #[test]
    fn color_forms() {
        for ok in ["#fff", "#ffff", "#0d1117", "#00000000", "rebeccapurple", "hsl(120, 50%, 40%)"] {
            assert!(is_valid_color(ok), "{ok}");
        }
        for bad in ["#ggg", "#12345", "red;", "url(#x)", ""] {
            assert!(!is_valid_color(bad), "{bad}");
        }
    }

    fn weeks(count: u64) -> ContributionCalendar {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let mut calendar = ContributionCalendar::new();
        for offset in 0..count * 7 {
            calendar.push_day(ContributionDay::new(start + Days::new(offset), 1, Grade::Grade1));
        }
        calendar
    }

    #[test]
    fn layout_overrides_change_the_grid() {
        let config = parse_config(r#"{"layout": {"cellSize": 10, "cellGap": 2}}"#).unwrap();
        assert_eq!(config.layout.cell_step(), 12);
        for w in [1u64, 5, 53] {
            let layout = compute_layout(&weeks(w), 2023, &config.theme, &config.layout).unwrap();
            assert_eq!(layout.card.width, 46 + 22 + w as u32 * 12 - 2);
            assert!(layout.cells.iter().all(|cell| cell.size == 10));
        }
    }

    #[test]
    fn radius_and_padding_overrides() {
        let config = parse_config(
            r#"{"layout": {"cellRadius": 0, "cardRadius": 4, "canvasPadding": 8}}"#,
        )
        .unwrap();
        assert_eq!(config.layout.cell_radius, 0);
        assert_eq!(config.layout.card_radius, 4);
        assert_eq!(config.layout.canvas_padding, 8);
        assert_eq!(config.layout.cell_size, 11);
    }

    #[test]
    fn zero_cell_size_is_rejected() {
        let err = parse_config(r#"{"layout": {"cellSize": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("cellSize"));
    }

    #[test]
    fn preset_switch_keeps_file_overrides() {
        let mut config = parse_config(
            r##"{"palette": {"grade4": "#0a3069"}, "themeVariables": {"fontFamily": "Inter"}}"##,
        )
        .unwrap();
        assert!(!config.overrides.is_empty());
        config.set_theme(Theme::github_light());
        assert_eq!(config.theme.palette.grade4, "#0a3069");
        assert_eq!(config.theme.font_family, "Inter");
        assert_eq!(config.theme.palette.grade1, Palette::github_light().grade1);
        assert_eq!(config.theme.card_color, Theme::github_light().card_color);
    }
}
