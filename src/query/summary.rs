use serde::{Deserialize, Serialize};

use crate::query::view::FilteredView;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    pub entity: String,
    pub value: f64,
}

/// Headline statistics of a view's measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSummary {
    /// Rows with a finite measure.
    pub count: usize,
    pub highest: Option<Extremum>,
    pub lowest: Option<Extremum>,
    pub mean: Option<f64>,
}

/// Computes count, extremes and mean over finite measures.
///
/// On equal values the first row in view order wins.
#[must_use]
pub fn summarize(view: &FilteredView) -> ViewSummary {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut highest: Option<Extremum> = None;
    let mut lowest: Option<Extremum> = None;

    for row in &view.rows {
        let Some(value) = row.finite_measure() else {
            continue;
        };
        count += 1;
        sum += value;
        if highest.as_ref().is_none_or(|best| value > best.value) {
            highest = Some(Extremum {
                entity: row.entity.clone(),
                value,
            });
        }
        if lowest.as_ref().is_none_or(|best| value < best.value) {
            lowest = Some(Extremum {
                entity: row.entity.clone(),
                value,
            });
        }
    }

    ViewSummary {
        count,
        highest,
        lowest,
        mean: (count > 0).then(|| sum / count as f64),
    }
}

/// Display card for one statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub title: String,
    pub value: String,
    pub caption: String,
}

/// Titles and formatting of the tile row rendered from a [`ViewSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOptions {
    #[serde(default)]
    pub count_title: Option<String>,
    #[serde(default = "default_count_caption")]
    pub count_caption: String,
    #[serde(default)]
    pub highest_title: Option<String>,
    #[serde(default)]
    pub lowest_title: Option<String>,
    #[serde(default)]
    pub mean_title: Option<String>,
    /// Caption of the mean tile when no category is selected.
    #[serde(default = "default_mean_caption")]
    pub mean_caption: String,
    #[serde(default = "default_precision")]
    pub precision: usize,
    #[serde(default)]
    pub unit: String,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            count_title: None,
            count_caption: default_count_caption(),
            highest_title: Some("Highest".to_owned()),
            lowest_title: Some("Lowest".to_owned()),
            mean_title: Some("Average".to_owned()),
            mean_caption: default_mean_caption(),
            precision: default_precision(),
            unit: String::new(),
        }
    }
}

fn default_count_caption() -> String {
    "Countries".to_owned()
}

fn default_mean_caption() -> String {
    "World".to_owned()
}

fn default_precision() -> usize {
    4
}

/// Renders the configured tiles in a fixed order: count, highest, lowest, mean.
///
/// Missing statistics render as `"n/a"` so the tile row keeps its shape.
#[must_use]
pub fn summary_tiles(
    summary: &ViewSummary,
    options: &SummaryOptions,
    category: Option<&str>,
) -> Vec<Tile> {
    let format_value = |value: Option<f64>| match value {
        Some(value) => format!("{value:.prec$}{}", options.unit, prec = options.precision),
        None => "n/a".to_owned(),
    };

    let mut tiles = Vec::with_capacity(4);
    if let Some(title) = &options.count_title {
        tiles.push(Tile {
            title: title.clone(),
            value: summary.count.to_string(),
            caption: options.count_caption.clone(),
        });
    }
    if let Some(title) = &options.highest_title {
        tiles.push(Tile {
            title: title.clone(),
            value: format_value(summary.highest.as_ref().map(|e| e.value)),
            caption: summary
                .highest
                .as_ref()
                .map(|e| e.entity.clone())
                .unwrap_or_default(),
        });
    }
    if let Some(title) = &options.lowest_title {
        tiles.push(Tile {
            title: title.clone(),
            value: format_value(summary.lowest.as_ref().map(|e| e.value)),
            caption: summary
                .lowest
                .as_ref()
                .map(|e| e.entity.clone())
                .unwrap_or_default(),
        });
    }
    if let Some(title) = &options.mean_title {
        tiles.push(Tile {
            title: title.clone(),
            value: format_value(summary.mean),
            caption: category.unwrap_or(&options.mean_caption).to_owned(),
        });
    }
    tiles
}
