use contrib_svg::config::is_valid_color;
use contrib_svg::{RenderOptions, Theme, calendar_from_json, render_calendar};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContribRenderOptions {
    year: Option<i32>,
    subject: Option<String>,
    theme: Option<String>,
    text_color: Option<String>,
    text: Option<String>,
}

fn build_render_options(
    options: ContribRenderOptions,
    fallback_year: Option<i32>,
) -> Result<RenderOptions, String> {
    let year = options
        .year
        .or(fallback_year)
        .ok_or_else(|| "year is required for an empty calendar".to_string())?;
    let subject = options.subject.unwrap_or_else(|| "contributor".to_string());
    let mut render_options = RenderOptions::new(year, subject);

    if let Some(name) = options.theme.as_deref() {
        render_options.theme =
            Theme::from_name(name).ok_or_else(|| format!("unknown theme `{name}`"))?;
    }
    if let Some(color) = options.text_color {
        if !is_valid_color(&color) {
            return Err(format!("invalid textColor `{color}`"));
        }
        render_options.text_color = Some(color);
    }
    render_options.display_text = options.text.map(|text| text.to_uppercase());

    Ok(render_options)
}

fn render(calendar_json: &str, options_json: Option<&str>) -> Result<String, String> {
    let calendar = calendar_from_json(calendar_json).map_err(|error| error.to_string())?;
    let options = match options_json {
        Some(raw) => serde_json::from_str::<ContribRenderOptions>(raw)
            .map_err(|error| error.to_string())?,
        None => ContribRenderOptions::default(),
    };
    let render_options = build_render_options(options, calendar.year_hint())?;
    render_calendar(&calendar, &render_options).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn render_contrib_svg(
    calendar_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    render(calendar_json, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}
