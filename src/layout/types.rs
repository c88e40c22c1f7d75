use chrono::NaiveDate;

use crate::ir::Grade;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLabel {
    pub x: u32,
    pub y: u32,
    pub text: String,
    pub font_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLayout {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub radius: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLayout {
    pub x: u32,
    pub y: u32,
    pub font_size: u32,
    pub year: i32,
    pub total_contributions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellLayout {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub radius: u32,
    pub column: usize,
    pub weekday: u8,
    pub date: NaiveDate,
    pub count: u32,
    pub grade: Grade,
    pub fill: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwatchLayout {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub radius: u32,
    pub grade: Grade,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendLayout {
    pub less: TextLabel,
    pub swatches: Vec<SwatchLayout>,
    pub more: TextLabel,
}

/// Fully positioned calendar, ready to be written out as SVG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub columns: usize,
    pub card: CardLayout,
    pub title: TitleLayout,
    pub weekday_labels: Vec<TextLabel>,
    pub month_labels: Vec<TextLabel>,
    pub cells: Vec<CellLayout>,
    pub legend: LegendLayout,
}
