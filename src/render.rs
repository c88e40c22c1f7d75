use crate::layout::{Layout, TextLabel};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(layout: &Layout, theme: &Theme, accessible_label: &str) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;
    let font_family = escape_xml(&theme.font_family);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" role=\"img\" aria-label=\"{}\">",
        escape_xml(accessible_label)
    ));

    svg.push_str(&format!(
        "<rect width=\"{width}\" height=\"{height}\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    let title = &layout.title;
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" font-family=\"{font_family}\" font-size=\"{}\" fill=\"{}\">{}: <tspan font-weight=\"700\">{}</tspan> contributions</text>",
        title.x,
        title.y,
        title.font_size,
        escape_xml(&theme.text_color),
        title.year,
        title.total_contributions
    ));

    let card = &layout.card;
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        card.x,
        card.y,
        card.width,
        card.height,
        escape_xml(&theme.card_color),
        escape_xml(&theme.border_color),
        r = card.radius
    ));

    for label in &layout.weekday_labels {
        svg.push_str(&text_label_svg(label, &font_family, &theme.muted_text_color));
    }

    for label in &layout.month_labels {
        svg.push_str(&text_label_svg(label, &font_family, &theme.month_label_color));
    }

    for cell in &layout.cells {
        svg.push_str(&format!(
            "<rect class=\"day\" x=\"{}\" y=\"{}\" width=\"{s}\" height=\"{s}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" data-date=\"{}\" data-count=\"{}\"><title>{}</title></rect>",
            cell.x,
            cell.y,
            escape_xml(&cell.fill),
            cell.date.format("%Y-%m-%d"),
            cell.count,
            escape_xml(&cell.tooltip),
            s = cell.size,
            r = cell.radius
        ));
    }

    let legend = &layout.legend;
    svg.push_str(&text_label_svg(&legend.less, &font_family, &theme.muted_text_color));
    for swatch in &legend.swatches {
        svg.push_str(&format!(
            "<rect class=\"legend-swatch\" x=\"{}\" y=\"{}\" width=\"{s}\" height=\"{s}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\"/>",
            swatch.x,
            swatch.y,
            escape_xml(&swatch.fill),
            s = swatch.size,
            r = swatch.radius
        ));
    }
    svg.push_str(&text_label_svg(&legend.more, &font_family, &theme.muted_text_color));

    svg.push_str("</svg>");
    svg
}

fn text_label_svg(label: &TextLabel, font_family: &str, fill: &str) -> String {
    format!(
        "<text x=\"{}\" y=\"{}\" font-family=\"{font_family}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        label.x,
        label.y,
        label.font_size,
        escape_xml(fill),
        escape_xml(&label.text)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
