//! Declarative chart descriptors.
//!
//! A descriptor serializes to the configuration object the browser-side
//! charting library takes (`{"type", "data", "options"}`), so the front end
//! hands it over untouched.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Scatter,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    Counts(Vec<usize>),
    Values(Vec<f64>),
    Points(Vec<Point>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Counts(v) => v.len(),
            SeriesData::Values(v) => v.len(),
            SeriesData::Points(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: SeriesData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: AxisTitle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Plugins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
}

impl ChartOptions {
    pub fn is_empty(&self) -> bool {
        self.parsing.is_none() && self.plugins.is_none() && self.scales.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    #[serde(skip_serializing_if = "ChartOptions::is_empty")]
    pub options: ChartOptions,
}

impl ChartDescriptor {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            data: ChartData {
                labels: Vec::new(),
                datasets: Vec::new(),
            },
            options: ChartOptions::default(),
        }
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.data.labels = labels;
        self
    }

    pub fn with_dataset(mut self, label: Option<&str>, data: SeriesData) -> Self {
        self.data.datasets.push(ChartDataset {
            label: label.map(str::to_string),
            data,
        });
        self
    }

    pub fn with_tooltip(mut self) -> Self {
        self.options.plugins = Some(Plugins {
            tooltip: Tooltip { enabled: true },
        });
        self
    }

    pub fn with_axis_titles(mut self, x: &str, y: &str) -> Self {
        let axis = |text: &str| Axis {
            title: AxisTitle {
                display: true,
                text: text.to_string(),
            },
        };
        self.options.scales = Some(Scales {
            x: axis(x),
            y: axis(y),
        });
        self
    }

    pub fn without_parsing(mut self) -> Self {
        self.options.parsing = Some(false);
        self
    }

    /// `(x, y)` axis titles when the chart has them
    pub fn axis_titles(&self) -> Option<(&str, &str)> {
        self.options
            .scales
            .as_ref()
            .map(|s| (s.x.title.text.as_str(), s.y.title.text.as_str()))
    }

    pub fn first_series(&self) -> Option<&SeriesData> {
        self.data.datasets.first().map(|d| &d.data)
    }
}
