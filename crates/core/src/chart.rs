//! Plotly figure JSON, shaped like what a Plotly Express line chart emits so the
//! browser side can hand it to `Plotly.newPlot` unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
    pub name: String,
    pub x: Vec<NaiveDate>,
    /// `None` serializes as `null`, which Plotly draws as a gap.
    pub y: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub legend: Legend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: Title,
}

impl Trace {
    pub fn line(name: impl Into<String>, x: Vec<NaiveDate>, y: Vec<Option<f64>>) -> Self {
        Self {
            kind: "scatter".to_string(),
            mode: "lines".to_string(),
            name: name.into(),
            x,
            y,
        }
    }
}

/// Line chart of one or more series against a shared date axis.
pub fn line_chart(title: impl Into<String>, traces: Vec<Trace>) -> Figure {
    let title_of = |s: &str| Title {
        text: s.to_string(),
    };
    Figure {
        data: traces,
        layout: Layout {
            title: Title { text: title.into() },
            xaxis: Axis {
                title: title_of("Date"),
            },
            yaxis: Axis {
                title: title_of("value"),
            },
            legend: Legend {
                title: title_of("variable"),
            },
        },
    }
}
