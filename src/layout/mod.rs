mod types;

pub use types::*;

use std::collections::BTreeSet;

use chrono::Datelike;
use log::{debug, warn};

use crate::config::LayoutConfig;
use crate::error::RenderError;
use crate::format::{format_tooltip, short_month_name};
use crate::ir::{ContributionCalendar, ContributionLevel, Grade};
use crate::theme::{Palette, Theme};

const DAYS_PER_WEEK: u32 = 7;

/// Rows that get a weekday label. The others stay blank to avoid clutter.
const WEEKDAY_LABELS: [(u32, &str); 3] = [(1, "Mon"), (3, "Wed"), (5, "Fri")];

pub fn compute_layout(
    calendar: &ContributionCalendar,
    year: i32,
    theme: &Theme,
    config: &LayoutConfig,
) -> Result<Layout, RenderError> {
    validate_calendar(calendar)?;
    for tag in unrecognized_levels(calendar) {
        warn!("unrecognized contribution level `{tag}`; drawing it as grade1");
    }

    let step = config.cell_step();
    let columns = calendar.weeks.len();
    let card_width = config.card_padding_left + config.card_padding_right + columns as u32 * step
        - config.cell_gap;
    let card_height =
        config.card_padding_top + config.card_padding_bottom + DAYS_PER_WEEK * step
            - config.cell_gap;

    let width = card_width + config.canvas_padding * 2;
    let height = card_height + config.canvas_padding * 2 + config.footer_height;

    let card = CardLayout {
        x: config.canvas_padding,
        y: config.title_y + config.title_gap,
        width: card_width,
        height: card_height,
        radius: config.card_radius,
    };
    let inner_left = card.x + config.card_padding_left;
    let inner_top = card.y + config.card_padding_top;

    let title = TitleLayout {
        x: config.title_x,
        y: config.title_y,
        font_size: config.title_font_size,
        year,
        total_contributions: calendar.total_contributions,
    };

    let weekday_labels = WEEKDAY_LABELS
        .iter()
        .map(|(row, text)| TextLabel {
            x: card.x + config.weekday_label_offset_x,
            y: inner_top + row * step + config.cell_size.saturating_sub(1),
            text: (*text).to_string(),
            font_size: config.weekday_font_size,
        })
        .collect();

    let month_labels = month_labels(
        calendar,
        inner_left,
        card.y + config.month_label_offset_y,
        config,
    );

    let mut cells = Vec::with_capacity(calendar.day_count());
    for (column, week) in calendar.weeks.iter().enumerate() {
        let x = inner_left + column as u32 * step;
        for day in &week.contribution_days {
            let grade = Palette::grade_for(day);
            cells.push(CellLayout {
                x,
                y: inner_top + u32::from(day.weekday) * step,
                size: config.cell_size,
                radius: config.cell_radius,
                column,
                weekday: day.weekday,
                date: day.date,
                count: day.contribution_count,
                grade,
                fill: theme.palette.color(grade).to_string(),
                tooltip: format_tooltip(day.contribution_count, day.date),
            });
        }
    }

    let legend = legend_layout(&card, inner_left, theme, config);

    debug!(
        "calendar layout: {columns} columns, {} cells, {} month labels, {width}x{height}",
        cells.len(),
        month_labels.len()
    );

    Ok(Layout {
        width,
        height,
        columns,
        card,
        title,
        weekday_labels,
        month_labels,
        cells,
        legend,
    })
}

/// One label per month transition, placed at the first week whose first day
/// falls in that month. Empty weeks keep their column but get no label.
fn month_labels(
    calendar: &ContributionCalendar,
    inner_left: u32,
    y: u32,
    config: &LayoutConfig,
) -> Vec<TextLabel> {
    let mut labels = Vec::new();
    let mut last_month = None;
    for (column, week) in calendar.weeks.iter().enumerate() {
        let Some(first_day) = week.contribution_days.first() else {
            continue;
        };
        let month = first_day.date.month();
        if last_month == Some(month) {
            continue;
        }
        last_month = Some(month);
        labels.push(TextLabel {
            x: inner_left + column as u32 * config.cell_step(),
            y,
            text: short_month_name(first_day.date),
            font_size: config.month_font_size,
        });
    }
    labels
}

fn legend_layout(
    card: &CardLayout,
    inner_left: u32,
    theme: &Theme,
    config: &LayoutConfig,
) -> LegendLayout {
    let legend_y = (card.y + card.height).saturating_sub(config.legend_offset_bottom);
    let legend_x = inner_left.saturating_sub(config.legend_offset_left);

    let less = TextLabel {
        x: legend_x,
        y: legend_y,
        text: "Less".to_string(),
        font_size: config.legend_font_size,
    };

    let mut square_x = legend_x + config.legend_swatch_offset;
    let mut swatches = Vec::with_capacity(Grade::ALL.len());
    for grade in Grade::ALL {
        swatches.push(SwatchLayout {
            x: square_x,
            y: legend_y.saturating_sub(config.legend_swatch_rise),
            size: config.legend_swatch_size,
            radius: config.cell_radius,
            grade,
            fill: theme.palette.color(grade).to_string(),
        });
        square_x += config.legend_swatch_step;
    }

    let more = TextLabel {
        x: square_x + config.legend_more_gap,
        y: legend_y,
        text: "More".to_string(),
        font_size: config.legend_font_size,
    };

    LegendLayout {
        less,
        swatches,
        more,
    }
}

/// Distinct level tags that fall back to grade1, i.e. unknown tags on days
/// with a non-zero count.
pub fn unrecognized_levels(calendar: &ContributionCalendar) -> BTreeSet<&str> {
    calendar
        .days()
        .filter(|day| day.contribution_count > 0)
        .filter_map(|day| match &day.contribution_level {
            ContributionLevel::Unrecognized(tag) => Some(tag.as_str()),
            ContributionLevel::Known(_) => None,
        })
        .collect()
}

/// Structural checks on source data. Date gaps are tolerated; they only
/// leave holes in the grid.
pub fn validate_calendar(calendar: &ContributionCalendar) -> Result<(), RenderError> {
    if calendar.weeks.is_empty() {
        return Err(RenderError::EmptyCalendar);
    }
    for (week_idx, week) in calendar.weeks.iter().enumerate() {
        if week.contribution_days.len() > DAYS_PER_WEEK as usize {
            return Err(RenderError::TooManyDays {
                week: week_idx,
                days: week.contribution_days.len(),
            });
        }
        let mut previous: Option<u8> = None;
        for day in &week.contribution_days {
            if u32::from(day.weekday) >= DAYS_PER_WEEK {
                return Err(RenderError::InvalidWeekday {
                    week: week_idx,
                    date: day.date,
                    weekday: day.weekday,
                });
            }
            if let Some(prev) = previous {
                if day.weekday <= prev {
                    return Err(RenderError::UnorderedWeekday {
                        week: week_idx,
                        date: day.date,
                        previous: prev,
                    });
                }
            }
            previous = Some(day.weekday);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ContributionDay, ContributionWeek};
    use chrono::{Days, NaiveDate};

    fn calendar_from(start: NaiveDate, days: u64) -> ContributionCalendar {
        let mut calendar = ContributionCalendar::new();
        for offset in 0..days {
            let date = start + Days::new(offset);
            let count = (offset % 5) as u32;
            calendar.push_day(ContributionDay::new(date, count, Grade::Grade2));
        }
        calendar
    }

    fn weeks(count: usize) -> ContributionCalendar {
        // 2023-01-01 is a Sunday, so every week is full.
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        calendar_from(start, count as u64 * 7)
    }

    fn layout(calendar: &ContributionCalendar) -> Layout {
        compute_layout(calendar, 2023, &Theme::github_dark(), &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn card_width_tracks_week_count() {
        for w in [1usize, 26, 52, 53] {
            let l = layout(&weeks(w));
            assert_eq!(l.card.width, 46 + 22 + w as u32 * 14 - 3);
            assert_eq!(l.width, l.card.width + 40);
            assert_eq!(l.columns, w);
        }
    }

    #[test]
    fn row_geometry_is_independent_of_week_count() {
        let small = layout(&weeks(2));
        let large = layout(&weeks(53));
        assert_eq!(small.card.height, large.card.height);
        assert_eq!(small.height, large.height);
        assert_eq!(small.card.height, 38 + 36 + 7 * 14 - 3);
        assert_eq!(small.height, small.card.height + 40 + 20);
        assert!(small.cells.iter().chain(&large.cells).all(|c| c.size == 11));
        let saturday = |l: &Layout| l.cells.iter().find(|c| c.weekday == 6).unwrap().y;
        assert_eq!(saturday(&small), saturday(&large));
    }

    #[test]
    fn cells_sit_on_week_column_and_weekday_row() {
        let l = layout(&weeks(3));
        let card_y = 30 + 18;
        let inner_left = 20 + 46;
        let inner_top = card_y + 38;
        let cell = l
            .cells
            .iter()
            .find(|c| c.column == 2 && c.weekday == 4)
            .unwrap();
        assert_eq!(cell.x, inner_left + 2 * 14);
        assert_eq!(cell.y, inner_top + 4 * 14);
        assert_eq!(l.cells.len(), 21);
    }

    #[test]
    fn partial_final_week_reserves_a_full_column() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let full = calendar_from(start, 14);
        let partial = calendar_from(start, 15);
        assert_eq!(partial.weeks.len(), 3);
        assert_eq!(layout(&partial).card.width, layout(&full).card.width + 14);
    }

    #[test]
    fn weekday_labels_are_centered_on_their_rows() {
        let l = layout(&weeks(1));
        let texts: Vec<&str> = l.weekday_labels.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["Mon", "Wed", "Fri"]);
        let inner_top = 30 + 18 + 38;
        assert_eq!(l.weekday_labels[0].y, inner_top + 14 + 10);
        assert_eq!(l.weekday_labels[2].y, inner_top + 5 * 14 + 10);
        assert!(l.weekday_labels.iter().all(|t| t.x == 26));
    }

    #[test]
    fn month_labels_emit_once_per_transition() {
        // Weeks starting Jan 1, 8, 15, 22, 29, Feb 5, 12.
        let l = layout(&weeks(7));
        let months: Vec<(&str, u32)> = l
            .month_labels
            .iter()
            .map(|t| (t.text.as_str(), t.x))
            .collect();
        assert_eq!(months, [("Jan", 66), ("Feb", 66 + 5 * 14)]);
    }

    #[test]
    fn month_labels_skip_empty_weeks() {
        let mut calendar = weeks(2);
        calendar.weeks.insert(1, ContributionWeek::default());
        let l = layout(&calendar);
        assert_eq!(l.columns, 3);
        assert_eq!(l.month_labels.len(), 1);
    }

    #[test]
    fn legend_has_five_ordered_swatches() {
        let l = layout(&weeks(4));
        let legend_y = 48 + l.card.height - 10;
        assert_eq!(l.legend.less.text, "Less");
        assert_eq!(l.legend.less.x, 60);
        assert_eq!(l.legend.less.y, legend_y);
        let xs: Vec<u32> = l.legend.swatches.iter().map(|s| s.x).collect();
        assert_eq!(xs, [100, 118, 136, 154, 172]);
        let grades: Vec<Grade> = l.legend.swatches.iter().map(|s| s.grade).collect();
        assert_eq!(grades, Grade::ALL);
        assert_eq!(l.legend.more.x, 190 + 6);
    }

    #[test]
    fn zero_counts_use_grade0() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let mut calendar = ContributionCalendar::new();
        calendar.push_day(ContributionDay::new(
            date,
            0,
            ContributionLevel::from("FOURTH_QUARTILE".to_string()),
        ));
        let l = layout(&calendar);
        assert_eq!(l.cells[0].grade, Grade::Grade0);
        assert_eq!(l.cells[0].fill, Theme::github_dark().palette.grade0);
        assert_eq!(l.cells[0].tooltip, "No contributions on March 3rd, 2024");
    }

    #[test]
    fn malformed_calendars_are_rejected() {
        assert_eq!(
            validate_calendar(&ContributionCalendar::new()),
            Err(RenderError::EmptyCalendar)
        );

        let mut bad_weekday = weeks(1);
        bad_weekday.weeks[0].contribution_days[3].weekday = 9;
        assert!(matches!(
            validate_calendar(&bad_weekday),
            Err(RenderError::InvalidWeekday { weekday: 9, .. })
        ));

        let mut unordered = weeks(1);
        unordered.weeks[0].contribution_days.swap(1, 2);
        assert!(matches!(
            validate_calendar(&unordered),
            Err(RenderError::UnorderedWeekday { week: 0, .. })
        ));

        let mut crowded = weeks(2);
        let extra = crowded.weeks[1].contribution_days[0].clone();
        crowded.weeks[0].contribution_days.push(extra);
        assert_eq!(
            validate_calendar(&crowded),
            Err(RenderError::TooManyDays { week: 0, days: 8 })
        );
    }

    #[test]
    fn unknown_levels_are_collected_once() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut calendar = ContributionCalendar::new();
        for offset in 0..30u64 {
            let tag = if offset % 2 == 0 { "SPARKLING" } else { "GLOWING" };
            let count = if offset == 1 { 0 } else { 1 };
            calendar.push_day(ContributionDay::new(
                start + Days::new(offset),
                count,
                ContributionLevel::from(tag.to_string()),
            ));
        }
        calendar.push_day(ContributionDay::new(
            start + Days::new(30),
            0,
            ContributionLevel::from("ZERO_ONLY".to_string()),
        ));
        let tags: Vec<&str> = unrecognized_levels(&calendar).into_iter().collect();
        assert_eq!(tags, ["GLOWING", "SPARKLING"]);
        assert!(unrecognized_levels(&weeks(2)).is_empty());
    }
}
