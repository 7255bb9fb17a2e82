//! Desserialização tolerante de campos numéricos.
//!
//! Campos ausentes ou não numéricos viram 0 (ou `None` nos opcionais).
//! Strings numéricas (`"12.5"`) são aceitas.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Desserializa um número obrigatório; qualquer coisa não numérica vira 0.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce(&value).unwrap_or(0.0))
}

/// Desserializa um número opcional; valores não numéricos viram `None`.
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce(&value))
}

fn coerce(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
