use std::{fmt, str::FromStr};

use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    command::{error::CommandError, wire::normalize},
    foundation::core::{DisplayValue, EntityId, Millis, Position},
};

macro_rules! command_tags {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Every command tag the interpreter understands.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum CommandTag {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )+
        }

        impl CommandTag {
            /// All tags, in table order.
            pub const ALL: &'static [CommandTag] = &[$(CommandTag::$variant),+];

            /// Wire spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl FromStr for CommandTag {
            type Err = CommandError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(CommandError::UnknownTag(s.to_owned())),
                }
            }
        }
    };
}

command_tags! {
    CreateNode => "CREATE_NODE",
    UpdateNode => "UPDATE_NODE",
    DeleteNode => "DELETE_NODE",
    MoveNode => "MOVE_NODE",
    Highlight => "HIGHLIGHT",
    Compare => "COMPARE",
    Pulse => "PULSE",
    CreateEdge => "CREATE_EDGE",
    DeleteEdge => "DELETE_EDGE",
    HighlightPath => "HIGHLIGHT_PATH",
    CreateArray => "CREATE_ARRAY",
    Swap => "SWAP",
    UpdateCell => "UPDATE_CELL",
    SetPointer => "SET_POINTER",
    AddLabel => "ADD_LABEL",
    AddAnnotation => "ADD_ANNOTATION",
}

impl fmt::Display for CommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn millis_800() -> Millis {
    Millis(800)
}
fn millis_1000() -> Millis {
    Millis(1000)
}
fn millis_2000() -> Millis {
    Millis(2000)
}
fn yes() -> bool {
    true
}
fn three() -> u32 {
    3
}

/// `CREATE_NODE`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNode {
    pub id: EntityId,
    #[serde(default)]
    pub value: DisplayValue,
    pub position: Position,
    #[serde(default)]
    pub style: Option<String>,
}

/// `UPDATE_NODE`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNode {
    pub id: EntityId,
    #[serde(default)]
    pub value: Option<DisplayValue>,
    #[serde(default)]
    pub style: Option<String>,
}

/// `DELETE_NODE`, `DELETE_EDGE`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntity {
    pub id: EntityId,
}

/// `MOVE_NODE`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveNode {
    pub id: EntityId,
    pub to: Position,
    #[serde(default = "millis_1000")]
    pub duration: Millis,
    /// CSS easing name; `ease-in-out` when absent.
    #[serde(default)]
    pub easing: Option<String>,
}

/// `HIGHLIGHT`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: EntityId,
    /// Cyan when absent.
    #[serde(default)]
    pub color: Option<String>,
    /// `high` when absent.
    #[serde(default)]
    pub intensity: Option<String>,
    #[serde(default = "millis_1000")]
    pub duration: Millis,
}

/// `COMPARE`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compare {
    pub elements: Vec<EntityId>,
    /// Informational only.
    #[serde(default)]
    pub operator: Option<String>,
    pub result: bool,
}

/// `PULSE`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pulse {
    pub id: EntityId,
    #[serde(default = "three")]
    pub count: u32,
    #[serde(default)]
    pub color: Option<String>,
}

/// `CREATE_EDGE`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEdge {
    pub id: EntityId,
    pub from: EntityId,
    pub to: EntityId,
    #[serde(default = "yes")]
    pub directed: bool,
    #[serde(default)]
    pub weight: Option<DisplayValue>,
    /// `solid` or `dashed`.
    #[serde(default)]
    pub style: Option<String>,
}

/// `HIGHLIGHT_PATH`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightPath {
    pub nodes: Vec<EntityId>,
    #[serde(default)]
    pub color: Option<String>,
    /// Hold time when not sequential.
    #[serde(default = "millis_2000")]
    pub duration: Millis,
    #[serde(default = "yes")]
    pub sequential: bool,
}

/// `CREATE_ARRAY`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArray {
    pub id: EntityId,
    pub values: Vec<DisplayValue>,
    pub position: Position,
}

/// `SWAP`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swap {
    pub array_id: EntityId,
    pub indices: (usize, usize),
    #[serde(default = "millis_800")]
    pub duration: Millis,
}

/// `UPDATE_CELL`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCell {
    pub array_id: EntityId,
    pub index: usize,
    pub value: DisplayValue,
    #[serde(default)]
    pub highlight: bool,
}

/// `SET_POINTER`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPointer {
    pub id: EntityId,
    pub array_id: EntityId,
    pub index: usize,
    #[serde(default)]
    pub label: Option<DisplayValue>,
    #[serde(default)]
    pub color: Option<String>,
}

/// `ADD_LABEL`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLabel {
    pub id: EntityId,
    pub text: DisplayValue,
    pub position: Position,
    /// `info`, `success`, `warning` or `error`.
    #[serde(default)]
    pub style: Option<String>,
}

/// `ADD_ANNOTATION`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAnnotation {
    pub id: EntityId,
    /// Only `arrow` is drawn.
    #[serde(rename = "type", default = "arrow")]
    pub kind: String,
    pub from: Position,
    pub to: Position,
    #[serde(default, alias = "text")]
    pub label: Option<DisplayValue>,
}

fn arrow() -> String {
    "arrow".to_owned()
}

/// A decoded, canonical command.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "command", content = "params", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    CreateNode(CreateNode),
    UpdateNode(UpdateNode),
    DeleteNode(DeleteEntity),
    MoveNode(MoveNode),
    Highlight(Highlight),
    Compare(Compare),
    Pulse(Pulse),
    CreateEdge(CreateEdge),
    DeleteEdge(DeleteEntity),
    HighlightPath(HighlightPath),
    CreateArray(CreateArray),
    Swap(Swap),
    UpdateCell(UpdateCell),
    SetPointer(SetPointer),
    AddLabel(AddLabel),
    AddAnnotation(AddAnnotation),
}

impl Command {
    /// Decode one raw command in either wire shape.
    pub fn decode(raw: &Value) -> Result<Self, CommandError> {
        let wire = normalize(raw)?;
        let tag: CommandTag = wire.tag.parse()?;
        let canonical = json!({ "command": tag.as_str(), "params": Value::Object(wire.payload) });
        let cmd: Self = serde_json::from_value(canonical)
            .map_err(|e| CommandError::malformed(tag.as_str(), e.to_string()))?;
        cmd.validate()?;
        Ok(cmd)
    }

    fn validate(&self) -> Result<(), CommandError> {
        match self {
            Self::Compare(c) if c.elements.len() < 2 => Err(CommandError::malformed(
                self.tag().as_str(),
                format!("needs at least 2 elements, got {}", c.elements.len()),
            )),
            _ => Ok(()),
        }
    }

    /// Tag of this command.
    pub fn tag(&self) -> CommandTag {
        match self {
            Self::CreateNode(_) => CommandTag::CreateNode,
            Self::UpdateNode(_) => CommandTag::UpdateNode,
            Self::DeleteNode(_) => CommandTag::DeleteNode,
            Self::MoveNode(_) => CommandTag::MoveNode,
            Self::Highlight(_) => CommandTag::Highlight,
            Self::Compare(_) => CommandTag::Compare,
            Self::Pulse(_) => CommandTag::Pulse,
            Self::CreateEdge(_) => CommandTag::CreateEdge,
            Self::DeleteEdge(_) => CommandTag::DeleteEdge,
            Self::HighlightPath(_) => CommandTag::HighlightPath,
            Self::CreateArray(_) => CommandTag::CreateArray,
            Self::Swap(_) => CommandTag::Swap,
            Self::UpdateCell(_) => CommandTag::UpdateCell,
            Self::SetPointer(_) => CommandTag::SetPointer,
            Self::AddLabel(_) => CommandTag::AddLabel,
            Self::AddAnnotation(_) => CommandTag::AddAnnotation,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/command/model.rs"]
mod tests;
