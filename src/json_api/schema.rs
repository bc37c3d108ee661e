//! Wire types for `POST /imprimir`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body.
///
/// ```json
/// {
///   "nombreImpresora": "POS-80",
///   "anchoImpresora": "80mm",
///   "operaciones": [
///     { "nombre": "EscribirTexto", "argumentos": ["Hola\n"] },
///     { "nombre": "AbrirCajon", "argumentos": [] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    #[serde(default)]
    pub nombre_impresora: Option<String>,
    /// `"58mm"` selects narrow paper; anything else is 80mm.
    #[serde(default)]
    pub ancho_impresora: Option<String>,
    #[serde(default)]
    pub operaciones: Option<Vec<RawOperation>>,
}

/// One untyped operation as sent by the client.
///
/// Deserializes from any JSON value so that a single odd entry cannot
/// reject the whole request; a non-object entry has neither field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "Value")]
pub struct RawOperation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argumentos: Option<Value>,
}

impl From<Value> for RawOperation {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => Self {
                nombre: fields.remove("nombre"),
                argumentos: fields.remove("argumentos"),
            },
            _ => Self::default(),
        }
    }
}

/// Response body for `/imprimir`, `/impresoras` errors and `/version`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            version: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            version: None,
        }
    }

    pub fn version(version: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: None,
            version: Some(version.into()),
        }
    }
}
