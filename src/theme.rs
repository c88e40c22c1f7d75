use serde::{Deserialize, Serialize};

use crate::ir::{ContributionDay, ContributionLevel, Grade};

/// Cell colors, one per grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub grade0: String,
    pub grade1: String,
    pub grade2: String,
    pub grade3: String,
    pub grade4: String,
}

impl Palette {
    pub fn github_dark() -> Self {
        Self {
            grade0: "#151B23".to_string(),
            grade1: "#0e4429".to_string(),
            grade2: "#006d32".to_string(),
            grade3: "#26a641".to_string(),
            grade4: "#39d353".to_string(),
        }
    }

    pub fn github_light() -> Self {
        Self {
            grade0: "#ebedf0".to_string(),
            grade1: "#9be9a8".to_string(),
            grade2: "#40c463".to_string(),
            grade3: "#30a14e".to_string(),
            grade4: "#216e39".to_string(),
        }
    }

    pub fn color(&self, grade: Grade) -> &str {
        match grade {
            Grade::Grade0 => &self.grade0,
            Grade::Grade1 => &self.grade1,
            Grade::Grade2 => &self.grade2,
            Grade::Grade3 => &self.grade3,
            Grade::Grade4 => &self.grade4,
        }
    }

    pub fn color_mut(&mut self, grade: Grade) -> &mut String {
        match grade {
            Grade::Grade0 => &mut self.grade0,
            Grade::Grade1 => &mut self.grade1,
            Grade::Grade2 => &mut self.grade2,
            Grade::Grade3 => &mut self.grade3,
            Grade::Grade4 => &mut self.grade4,
        }
    }

    /// Grade a day is drawn with. A zero count is always `grade0`, whatever
    /// level the source reported; unknown level tags fall back to `grade1`.
    pub fn grade_for(day: &ContributionDay) -> Grade {
        if day.contribution_count == 0 {
            return Grade::Grade0;
        }
        match &day.contribution_level {
            ContributionLevel::Known(grade) => *grade,
            ContributionLevel::Unrecognized(_) => Grade::Grade1,
        }
    }

    pub fn resolve(&self, day: &ContributionDay) -> &str {
        self.color(Self::grade_for(day))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::github_dark()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub card_color: String,
    pub border_color: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub month_label_color: String,
    pub palette: Palette,
}

impl Theme {
    pub fn github_dark() -> Self {
        Self {
            font_family: "system-ui,-apple-system,BlinkMacSystemFont,Segoe UI,sans-serif"
                .to_string(),
            background: "#00000000".to_string(),
            card_color: "#0d1117".to_string(),
            border_color: "#30363d".to_string(),
            text_color: "#8b949e".to_string(),
            muted_text_color: "#8b949e".to_string(),
            month_label_color: "#e6edf3".to_string(),
            palette: Palette::github_dark(),
        }
    }

    pub fn github_light() -> Self {
        Self {
            font_family: "system-ui,-apple-system,BlinkMacSystemFont,Segoe UI,sans-serif"
                .to_string(),
            background: "#00000000".to_string(),
            card_color: "#ffffff".to_string(),
            border_color: "#d0d7de".to_string(),
            text_color: "#57606a".to_string(),
            muted_text_color: "#57606a".to_string(),
            month_label_color: "#24292f".to_string(),
            palette: Palette::github_light(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" | "github-dark" | "github_dark" => Some(Self::github_dark()),
            "light" | "github-light" | "github_light" => Some(Self::github_light()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::github_dark()
    }
}
