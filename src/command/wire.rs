use serde_json::{Map, Value};

use crate::command::error::CommandError;

/// A command reduced to its tag and canonical payload object.
#[derive(Clone, Debug, PartialEq)]
pub struct WireCommand {
    /// Raw tag string.
    pub tag: String,
    /// Payload fields.
    pub payload: Map<String, Value>,
}

/// Fold both accepted wire shapes into one.
///
/// `{ "command": T, "params": {..} }` uses the nested object. When `params` is absent or null,
/// every sibling field except `command` forms the payload. Any other `params` value is rejected.
pub fn normalize(raw: &Value) -> Result<WireCommand, CommandError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| CommandError::malformed("<none>", "command must be a JSON object"))?;

    let tag = match obj.get("command") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_owned(),
        _ => return Err(CommandError::MissingTag),
    };

    let payload = match obj.get("params") {
        None | Some(Value::Null) => obj
            .iter()
            .filter(|(k, _)| k.as_str() != "command" && k.as_str() != "params")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        Some(Value::Object(params)) => params.clone(),
        Some(other) => {
            return Err(CommandError::malformed(
                tag,
                format!("'params' must be an object, got {other}"),
            ));
        }
    };

    Ok(WireCommand { tag, payload })
}

#[cfg(test)]
#[path = "../../tests/unit/command/wire.rs"]
mod tests;
