//! Chart-ready series, tables and page views handed to the rendering side.

use crate::domain::model::{
    CompanyStat, DomainComparison, DomainCount, DomainSalary, DomainStat, LocationStat,
    SalaryRangeCount,
};
use crate::utils::error::{InsightsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_DATA: &str = "No data available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Pie,
    Scatter,
}

/// `series[i][j]` is the value of series `i` at `labels[j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series_names: Vec<String>,
    pub series: Vec<Vec<f64>>,
}

/// A record that can be plotted: one label, one value per series.
pub trait ChartRow {
    fn label(&self) -> String;
    fn values(&self) -> Vec<f64>;
}

impl ChartData {
    pub fn from_rows<R: ChartRow>(kind: ChartKind, series_names: &[&str], rows: &[R]) -> Self {
        let mut series = vec![Vec::with_capacity(rows.len()); series_names.len()];
        let mut labels = Vec::with_capacity(rows.len());

        for row in rows {
            labels.push(row.label());
            let values = row.values();
            for (i, column) in series.iter_mut().enumerate() {
                column.push(values.get(i).copied().unwrap_or(0.0));
            }
        }

        Self {
            kind,
            labels,
            series_names: series_names.iter().map(|s| s.to_string()).collect(),
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl ChartRow for DomainCount {
    fn label(&self) -> String {
        self.domain.clone()
    }
    fn values(&self) -> Vec<f64> {
        vec![self.count as f64]
    }
}

impl ChartRow for DomainSalary {
    fn label(&self) -> String {
        self.domain.clone()
    }
    fn values(&self) -> Vec<f64> {
        vec![self.avg_salary.round()]
    }
}

/// Plotted as salary (x) against demand (y).
impl ChartRow for DomainStat {
    fn label(&self) -> String {
        self.domain.clone()
    }
    fn values(&self) -> Vec<f64> {
        vec![self.avg_salary.round(), self.count as f64]
    }
}

impl ChartRow for LocationStat {
    fn label(&self) -> String {
        self.city.clone()
    }
    fn values(&self) -> Vec<f64> {
        vec![self.count as f64]
    }
}

impl ChartRow for CompanyStat {
    fn label(&self) -> String {
        self.company.clone()
    }
    fn values(&self) -> Vec<f64> {
        vec![self.count as f64]
    }
}

impl ChartRow for SalaryRangeCount {
    fn label(&self) -> String {
        self.range.clone()
    }
    fn values(&self) -> Vec<f64> {
        vec![self.count as f64]
    }
}

impl ChartRow for DomainComparison {
    fn label(&self) -> String {
        self.domain.clone()
    }
    fn values(&self) -> Vec<f64> {
        vec![self.avg_salary.round(), self.count as f64]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum WidgetContent {
    Chart(ChartData),
    Table(Table),
    Text(String),
    /// Shown in place of the widget when its dataset failed or was empty.
    Unavailable { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub title: String,
    pub content: WidgetContent,
}

impl Widget {
    pub fn new(id: &str, title: &str, content: WidgetContent) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            content,
        }
    }

    pub fn chart(id: &str, title: &str, chart: ChartData) -> Self {
        if chart.is_empty() {
            return Self::unavailable(id, title, NO_DATA);
        }
        Self::new(id, title, WidgetContent::Chart(chart))
    }

    pub fn table(id: &str, title: &str, table: Table) -> Self {
        if table.rows.is_empty() {
            return Self::unavailable(id, title, NO_DATA);
        }
        Self::new(id, title, WidgetContent::Table(table))
    }

    pub fn text(id: &str, title: &str, text: impl Into<String>) -> Self {
        Self::new(id, title, WidgetContent::Text(text.into()))
    }

    pub fn unavailable(id: &str, title: &str, message: impl Into<String>) -> Self {
        Self::new(
            id,
            title,
            WidgetContent::Unavailable {
                message: message.into(),
            },
        )
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.content, WidgetContent::Unavailable { .. })
    }

    /// Tabular export of chart and table widgets; `None` for text.
    pub fn to_csv(&self) -> Result<Option<String>> {
        let (headers, rows): (Vec<String>, Vec<Vec<String>>) = match &self.content {
            WidgetContent::Chart(chart) => {
                let mut headers = vec!["label".to_string()];
                headers.extend(chart.series_names.iter().cloned());
                let rows = chart
                    .labels
                    .iter()
                    .enumerate()
                    .map(|(j, label)| {
                        let mut row = vec![label.clone()];
                        row.extend(chart.series.iter().map(|s| s[j].to_string()));
                        row
                    })
                    .collect();
                (headers, rows)
            }
            WidgetContent::Table(table) => (table.headers.clone(), table.rows.clone()),
            WidgetContent::Text(_) | WidgetContent::Unavailable { .. } => return Ok(None),
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&headers)?;
        for row in rows {
            writer.write_record(&row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| InsightsError::IoError(e.into_error()))?;

        String::from_utf8(bytes).map(Some).map_err(|e| InsightsError::ConfigError {
            message: format!("CSV output is not UTF-8: {}", e),
        })
    }
}

/// Everything one page shows after a render cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub page: String,
    pub generated_at: DateTime<Utc>,
    pub widgets: Vec<Widget>,
    /// Set when the page could not initialize at all.
    pub error: Option<String>,
}

impl PageView {
    pub fn new(page: &str) -> Self {
        Self {
            page: page.to_string(),
            generated_at: Utc::now(),
            widgets: Vec::new(),
            error: None,
        }
    }

    pub fn failed(page: &str, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new(page)
        }
    }

    pub fn push(&mut self, widget: Widget) {
        self.widgets.push(widget);
    }

    /// Swaps in a widget with the same id, or appends it.
    pub fn replace_widget(&mut self, widget: Widget) {
        match self.widgets.iter_mut().find(|w| w.id == widget.id) {
            Some(existing) => *existing = widget,
            None => self.widgets.push(widget),
        }
    }

    pub fn remove_widget(&mut self, id: &str) {
        self.widgets.retain(|w| w.id != id);
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Rounds and groups digits the Indian way: `₹1,23,456`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    format!("{}{}", symbol, format_number(amount))
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    if digits.len() <= 3 {
        return format!("{}{}", sign, digits);
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{}{},{}", sign, groups.join(","), last_three)
}

fn write_table(f: &mut fmt::Formatter<'_>, headers: &[String], rows: &[Vec<String>]) -> fmt::Result {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    writeln!(f, "  {}", line(headers).trim_end())?;
    for row in rows {
        writeln!(f, "  {}", line(row).trim_end())?;
    }
    Ok(())
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "── {} ──", self.title)?;
        match &self.content {
            WidgetContent::Chart(chart) => {
                let mut headers = vec![String::new()];
                headers.extend(chart.series_names.iter().cloned());
                let rows: Vec<Vec<String>> = chart
                    .labels
                    .iter()
                    .enumerate()
                    .map(|(j, label)| {
                        let mut row = vec![label.clone()];
                        row.extend(chart.series.iter().map(|s| format_number(s[j])));
                        row
                    })
                    .collect();
                write_table(f, &headers, &rows)
            }
            WidgetContent::Table(table) => write_table(f, &table.headers, &table.rows),
            WidgetContent::Text(text) => writeln!(f, "  {}", text),
            WidgetContent::Unavailable { message } => writeln!(f, "  ⚠️  {}", message),
        }
    }
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "═══ {} ═══", self.page)?;
        if let Some(error) = &self.error {
            return writeln!(f, "❌ {}", error);
        }
        for widget in &self.widgets {
            writeln!(f)?;
            write!(f, "{}", widget)?;
        }
        Ok(())
    }
}
