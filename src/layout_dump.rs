use crate::layout::{Layout, TextLabel};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub year: i32,
    pub total_contributions: u32,
    pub width: u32,
    pub height: u32,
    pub columns: usize,
    pub card: RectDump,
    pub weekday_labels: Vec<LabelDump>,
    pub month_labels: Vec<LabelDump>,
    pub cells: Vec<CellDump>,
    pub legend: Vec<SwatchDump>,
}

#[derive(Debug, Serialize)]
pub struct RectDump {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub text: String,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Serialize)]
pub struct CellDump {
    pub date: String,
    pub count: u32,
    pub grade: String,
    pub fill: String,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Serialize)]
pub struct SwatchDump {
    pub grade: String,
    pub fill: String,
    pub x: u32,
    pub y: u32,
}

fn label_dump(label: &TextLabel) -> LabelDump {
    LabelDump {
        text: label.text.clone(),
        x: label.x,
        y: label.y,
    }
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let cells = layout
            .cells
            .iter()
            .map(|cell| CellDump {
                date: cell.date.format("%Y-%m-%d").to_string(),
                count: cell.count,
                grade: cell.grade.tag().to_string(),
                fill: cell.fill.clone(),
                x: cell.x,
                y: cell.y,
            })
            .collect();

        let legend = layout
            .legend
            .swatches
            .iter()
            .map(|swatch| SwatchDump {
                grade: swatch.grade.tag().to_string(),
                fill: swatch.fill.clone(),
                x: swatch.x,
                y: swatch.y,
            })
            .collect();

        LayoutDump {
            year: layout.title.year,
            total_contributions: layout.title.total_contributions,
            width: layout.width,
            height: layout.height,
            columns: layout.columns,
            card: RectDump {
                x: layout.card.x,
                y: layout.card.y,
                width: layout.card.width,
                height: layout.card.height,
            },
            weekday_labels: layout.weekday_labels.iter().map(label_dump).collect(),
            month_labels: layout.month_labels.iter().map(label_dump).collect(),
            cells,
            legend,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
