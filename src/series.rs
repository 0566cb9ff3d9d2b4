//! Axis-ready series handed to a visualization sink.

use serde::Serialize;

/// Scale of a plot axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    /// Linear scale.
    #[default]
    Linear,
    /// Logarithmic scale.
    Log,
}

impl AxisScale {
    /// Log scale when `log` is set, linear otherwise.
    #[must_use]
    pub fn from_log(log: bool) -> Self {
        if log { Self::Log } else { Self::Linear }
    }
}

/// Whether an axis carries numbers or category indices.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AxisKind {
    /// Coordinates are the values themselves.
    #[default]
    Numeric,
    /// Coordinates are indices into `labels`; tick `i` sits at `values[i]`.
    Categorical {
        /// Tick positions, `0..labels.len()`.
        values: Vec<f64>,
        /// Tick labels, in first-occurrence order.
        labels: Vec<String>,
    },
}

/// Metadata of one plot axis.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Axis {
    /// Axis title.
    pub title: String,
    /// Numeric or categorical.
    pub kind: AxisKind,
    /// Linear or log.
    pub scale: AxisScale,
}

impl Axis {
    /// A linear numeric axis.
    pub fn numeric(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: AxisKind::Numeric,
            scale: AxisScale::Linear,
        }
    }

    /// Sets the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: AxisScale) -> Self {
        self.scale = scale;
        self
    }

    /// Returns the tick labels if the axis is categorical.
    #[must_use]
    pub fn tick_labels(&self) -> Option<&[String]> {
        match &self.kind {
            AxisKind::Numeric => None,
            AxisKind::Categorical { labels, .. } => Some(labels),
        }
    }
}

/// Scatter coordinates with one trial number per point.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScatterSeries {
    /// X coordinates.
    pub x: Vec<f64>,
    /// Y coordinates.
    pub y: Vec<f64>,
    /// Trial number of each point.
    pub trial_numbers: Vec<u64>,
    /// X axis metadata.
    pub x_axis: Axis,
    /// Y axis metadata.
    pub y_axis: Axis,
}

impl ScatterSeries {
    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Hover label of point `i`.
    #[must_use]
    pub fn label(&self, i: usize) -> Option<String> {
        self.trial_numbers
            .get(i)
            .map(|n| format!("Trial (number={n})"))
    }
}
