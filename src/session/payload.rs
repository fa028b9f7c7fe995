use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    foundation::{
        core::DisplayValue,
        error::{VizError, VizResult},
    },
    playback::step::{Step, Timeline},
};

/// A visualization as produced by the generator.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationPayload {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub educational: Option<Educational>,
    #[serde(default)]
    pub initial_state: Option<InitialState>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub complexity: Option<Complexity>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Complexity {
    #[serde(default)]
    pub time: DisplayValue,
    #[serde(default)]
    pub space: DisplayValue,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Educational {
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub when_to_use: Option<String>,
    #[serde(default)]
    pub common_problems: Vec<String>,
}

/// Nodes and edges present before the first step, in `CREATE_NODE` / `CREATE_EDGE` shape.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct InitialState {
    #[serde(default)]
    pub nodes: Vec<Value>,
    #[serde(default)]
    pub edges: Vec<Value>,
}

/// Header shown above the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionInfo {
    pub title: String,
    /// `Time: X, Space: Y` when complexity metadata was given.
    pub subtitle: Option<String>,
    /// Educational block rendered as plain text.
    pub educational: Option<String>,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            subtitle: None,
            educational: None,
        }
    }
}

pub const DEFAULT_TITLE: &str = "Visualization";

impl Educational {
    /// Plain-text rendering with one section per present field; `None` when all are empty.
    pub fn to_text(&self) -> Option<String> {
        let mut sections = Vec::new();
        if let Some(d) = self.definition.as_deref().filter(|s| !s.trim().is_empty()) {
            sections.push(format!("Definition: {}", d.trim()));
        }
        if !self.key_points.is_empty() {
            sections.push(bullets("Key Points:", &self.key_points));
        }
        if let Some(w) = self.when_to_use.as_deref().filter(|s| !s.trim().is_empty()) {
            sections.push(format!("When to Use: {}", w.trim()));
        }
        if !self.common_problems.is_empty() {
            sections.push(bullets("Common Problems:", &self.common_problems));
        }
        (!sections.is_empty()).then(|| sections.join("\n\n"))
    }
}

fn bullets(heading: &str, items: &[String]) -> String {
    let mut out = heading.to_owned();
    for item in items {
        out.push_str("\n  - ");
        out.push_str(item.trim());
    }
    out
}

impl InitialState {
    /// Setup commands: every node first, then every edge.
    pub fn setup_commands(&self) -> Vec<Value> {
        let wrap = |tag: &str, params: &Value| json!({ "command": tag, "params": params });
        self.nodes
            .iter()
            .map(|n| wrap("CREATE_NODE", n))
            .chain(self.edges.iter().map(|e| wrap("CREATE_EDGE", e)))
            .collect()
    }
}

impl VisualizationPayload {
    pub fn from_json(src: &str) -> VizResult<Self> {
        serde_json::from_str(src).map_err(|e| VizError::serde(format!("visualization payload: {e}")))
    }

    pub fn from_value(value: Value) -> VizResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| VizError::serde(format!("visualization payload: {e}")))
    }

    pub fn info(&self) -> SessionInfo {
        let title = self
            .topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_owned();
        let subtitle = self
            .metadata
            .as_ref()
            .and_then(|m| m.complexity.as_ref())
            .map(|c| format!("Time: {}, Space: {}", c.time, c.space));
        SessionInfo {
            title,
            subtitle,
            educational: self.educational.as_ref().and_then(Educational::to_text),
        }
    }

    /// Split into what the session shows and what playback runs. The payload is gone after.
    pub fn into_parts(self) -> (SessionInfo, Timeline) {
        let info = self.info();
        let setup = self
            .initial_state
            .as_ref()
            .map(InitialState::setup_commands)
            .unwrap_or_default();
        (info, Timeline::new(self.steps).with_setup(setup))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/payload.rs"]
mod tests;
