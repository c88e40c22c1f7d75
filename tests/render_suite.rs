use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use contrib_svg::{
    ContributionCalendar, ContributionDay, FetchError, Grade, LayoutConfig, Palette, RenderOptions,
    Theme, calendar_from_json, compute_layout, load_config, render_calendar,
};

fn fixture_path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel)
}

fn load_fixture(rel: &str) -> ContributionCalendar {
    let input = std::fs::read_to_string(fixture_path(rel)).expect("fixture read failed");
    calendar_from_json(&input).expect("fixture decode failed")
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg tag");
    assert_eq!(
        svg.matches("<rect").count(),
        svg.matches("/>").count() + svg.matches("</rect>").count(),
        "{fixture}: unbalanced rect elements"
    );
}

/// Fill colors of the day cells, in document order.
fn cell_fills(svg: &str) -> Vec<String> {
    svg.split("<rect class=\"day\"")
        .skip(1)
        .map(|chunk| {
            let start = chunk.find("fill=\"").expect("cell without fill") + 6;
            let end = chunk[start..].find('"').expect("unterminated fill") + start;
            chunk[start..end].to_string()
        })
        .collect()
}

/// One year starting on 2024-01-01, one contribution per day, cycling
/// through the non-zero quartiles.
fn year_of_contributions() -> ContributionCalendar {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut calendar = ContributionCalendar::new();
    for offset in 0..365u64 {
        let grade = [Grade::Grade1, Grade::Grade2, Grade::Grade3, Grade::Grade4][offset as usize % 4];
        calendar.push_day(ContributionDay::new(start + Days::new(offset), 1, grade));
    }
    calendar
}

#[test]
fn renders_graphql_fixture() {
    let calendar = load_fixture("graphql_response.json");
    let svg = render_calendar(&calendar, &RenderOptions::new(2024, "octocat")).unwrap();
    assert_valid_svg(&svg, "graphql_response.json");

    assert!(svg.contains("viewBox=\"0 0 133 229\""));
    assert!(svg.contains("2024: <tspan font-weight=\"700\">63</tspan> contributions"));
    assert_eq!(svg.matches("<title>").count(), 14);
    assert_eq!(svg.matches(">Jan</text>").count(), 1);
    assert_eq!(svg.matches(">Feb</text>").count(), 1);
    assert!(svg.contains("<title>No contributions on January 28th, 2024</title>"));
    assert!(svg.contains("<title>1 contribution on January 29th, 2024</title>"));
    assert!(svg.contains("<title>18 contributions on February 9th, 2024</title>"));
}

#[test]
fn full_year_end_to_end() {
    let calendar = year_of_contributions();
    assert_eq!(calendar.total_contributions, 365);

    let options = RenderOptions::new(2024, "octocat");
    let svg = render_calendar(&calendar, &options).unwrap();
    assert_valid_svg(&svg, "full year");

    assert!(svg.contains("2024: <tspan font-weight=\"700\">365</tspan> contributions"));
    let fills = cell_fills(&svg);
    assert_eq!(fills.len(), 365);
    let grade0 = Palette::github_dark().grade0;
    assert!(fills.iter().all(|fill| *fill != grade0));
    assert_eq!(svg.matches("class=\"legend-swatch\"").count(), 5);
    assert!(svg.contains(">Less</text>"));
    assert!(svg.contains(">More</text>"));

    // Twelve months, twelve labels.
    for month in [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ] {
        assert_eq!(svg.matches(&format!(">{month}</text>")).count(), 1, "{month}");
    }
}

#[test]
fn rendering_is_byte_identical() {
    let calendar = year_of_contributions();
    let mut options = RenderOptions::new(2024, "octocat");
    options.text_color = Some("#c9d1d9".to_string());
    let first = render_calendar(&calendar, &options).unwrap();
    let second = render_calendar(&calendar, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn count_beats_level_and_unknown_levels_fall_back() {
    let calendar = load_fixture("calendar.json");
    let theme = Theme::github_dark();
    let layout = compute_layout(&calendar, 2023, &theme, &LayoutConfig::default()).unwrap();
    let fills: Vec<&str> = layout.cells.iter().map(|cell| cell.fill.as_str()).collect();
    assert_eq!(
        fills,
        [
            theme.palette.grade0.as_str(),
            theme.palette.grade1.as_str(),
            theme.palette.grade4.as_str(),
            theme.palette.grade0.as_str(),
        ]
    );
    // Partial weeks still take full columns.
    assert_eq!(layout.card.width, 46 + 22 + 2 * 14 - 3);
    assert_eq!(layout.month_labels.len(), 1);
    assert_eq!(layout.month_labels[0].text, "Dec");
}

#[test]
fn graphql_errors_surface_from_fixture() {
    let input = std::fs::read_to_string(fixture_path("graphql_not_found.json")).unwrap();
    let err = calendar_from_json(&input).unwrap_err();
    assert!(matches!(err, FetchError::GraphQl(_)));
    assert!(err.to_string().contains("nobody-here"));
}

#[test]
fn config_file_drives_render() {
    let path = fixture_path("config_light.json");
    let config = load_config(Some(path.as_path())).unwrap();
    assert_eq!(config.theme.card_color, Theme::github_light().card_color);

    let calendar = load_fixture("graphql_response.json");
    let options = RenderOptions::with_config(2024, "octocat", config);
    let svg = render_calendar(&calendar, &options).unwrap();
    assert!(svg.contains("fill=\"#0a3069\""));
    assert!(svg.contains("font-family=\"Inter, sans-serif\""));
    assert!(svg.contains("font-size=\"18\" fill=\"#1f2328\""));
}
