use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Discrete activity bucket used to pick a palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    Grade0,
    Grade1,
    Grade2,
    Grade3,
    Grade4,
}

impl Grade {
    pub const ALL: [Grade; 5] = [
        Grade::Grade0,
        Grade::Grade1,
        Grade::Grade2,
        Grade::Grade3,
        Grade::Grade4,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Grade::Grade0 => "grade0",
            Grade::Grade1 => "grade1",
            Grade::Grade2 => "grade2",
            Grade::Grade3 => "grade3",
            Grade::Grade4 => "grade4",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "grade0" | "NONE" => Some(Grade::Grade0),
            "grade1" | "FIRST_QUARTILE" => Some(Grade::Grade1),
            "grade2" | "SECOND_QUARTILE" => Some(Grade::Grade2),
            "grade3" | "THIRD_QUARTILE" => Some(Grade::Grade3),
            "grade4" | "FOURTH_QUARTILE" => Some(Grade::Grade4),
            _ => None,
        }
    }
}

/// Level tag as reported by the data source. GitHub sends quartile names;
/// palette-style `gradeN` tags are accepted too. Anything else is kept so it
/// can be reported and rendered with the fallback color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContributionLevel {
    Known(Grade),
    Unrecognized(String),
}

impl ContributionLevel {
    pub fn grade(&self) -> Option<Grade> {
        match self {
            ContributionLevel::Known(grade) => Some(*grade),
            ContributionLevel::Unrecognized(_) => None,
        }
    }
}

impl From<String> for ContributionLevel {
    fn from(value: String) -> Self {
        match Grade::from_tag(value.trim()) {
            Some(grade) => ContributionLevel::Known(grade),
            None => ContributionLevel::Unrecognized(value),
        }
    }
}

impl From<ContributionLevel> for String {
    fn from(value: ContributionLevel) -> Self {
        match value {
            ContributionLevel::Known(grade) => match grade {
                Grade::Grade0 => "NONE",
                Grade::Grade1 => "FIRST_QUARTILE",
                Grade::Grade2 => "SECOND_QUARTILE",
                Grade::Grade3 => "THIRD_QUARTILE",
                Grade::Grade4 => "FOURTH_QUARTILE",
            }
            .to_string(),
            ContributionLevel::Unrecognized(tag) => tag,
        }
    }
}

impl From<Grade> for ContributionLevel {
    fn from(grade: Grade) -> Self {
        ContributionLevel::Known(grade)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub date: NaiveDate,
    /// 0 = Sunday through 6 = Saturday.
    pub weekday: u8,
    pub contribution_count: u32,
    pub contribution_level: ContributionLevel,
}

impl ContributionDay {
    /// Builds a day whose weekday is derived from the date.
    pub fn new(date: NaiveDate, count: u32, level: impl Into<ContributionLevel>) -> Self {
        Self {
            date,
            weekday: date.weekday().num_days_from_sunday() as u8,
            contribution_count: count,
            contribution_level: level.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    pub contribution_days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u32,
    pub weeks: Vec<ContributionWeek>,
}

impl ContributionCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a day, opening a new week whenever the weekday does not move
    /// forward. Keeps `total_contributions` in step with the added counts.
    pub fn push_day(&mut self, day: ContributionDay) {
        let needs_new_week = match self.weeks.last().and_then(|w| w.contribution_days.last()) {
            Some(last) => day.weekday <= last.weekday,
            None => true,
        };
        if needs_new_week {
            self.weeks.push(ContributionWeek::default());
        }
        self.total_contributions += day.contribution_count;
        if let Some(week) = self.weeks.last_mut() {
            week.contribution_days.push(day);
        }
    }

    pub fn days(&self) -> impl Iterator<Item = &ContributionDay> {
        self.weeks.iter().flat_map(|week| week.contribution_days.iter())
    }

    pub fn day_count(&self) -> usize {
        self.weeks.iter().map(|week| week.contribution_days.len()).sum()
    }

    /// Year of the most recent day, if any.
    pub fn year_hint(&self) -> Option<i32> {
        self.days().last().map(|day| day.date.year())
    }
}
