//! # Operations
//!
//! Clients send operations as `{ "nombre": ..., "argumentos": [...] }` with
//! untyped arguments. [`Operation::from_raw`] turns each pair into a closed
//! variant once, at the HTTP boundary, so the interpreter never compares
//! strings or inspects JSON.
//!
//! | `nombre` | Variant | Arguments |
//! |----------|---------|-----------|
//! | `EscribirTexto` | [`Operation::WriteText`] | `text?` |
//! | `Feed` | [`Operation::Feed`] | `lines?` (default 1) |
//! | `TextoSegunPaginaDeCodigos` | [`Operation::WriteTextWithCodepage`] | `table, codepage, text` |
//! | `AbrirCajon` | [`Operation::OpenDrawer`] | none |
//! | `DescargarImagenDeInternetEImprimir` | [`Operation::PrintImage`] | `url, width?` |
//!
//! Unknown names become [`Operation::Ignored`]; they never fail and never
//! produce output. Arguments of the wrong type become
//! [`Operation::Malformed`], which the interpreter reports as a failed
//! operation without stopping the job.

use serde_json::Value;
use tracing::warn;

pub const WRITE_TEXT: &str = "EscribirTexto";
pub const OPEN_DRAWER: &str = "AbrirCajon";
pub const FEED: &str = "Feed";
pub const WRITE_TEXT_WITH_CODEPAGE: &str = "TextoSegunPaginaDeCodigos";
pub const PRINT_IMAGE: &str = "DescargarImagenDeInternetEImprimir";

/// Largest accepted `Feed` count.
pub const MAX_FEED_LINES: usize = 1000;

/// One print instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Append text in the active codepage.
    WriteText(String),

    /// Append `n` line feeds.
    Feed(usize),

    /// Switch codepage, then append text.
    ///
    /// `table` is the printer's `ESC t` table number, when the client sent one.
    WriteTextWithCodepage {
        table: Option<i64>,
        codepage: String,
        text: String,
    },

    /// Pulse the cash drawer on pin 2.
    OpenDrawer,

    /// Download, render and print an image. A missing or empty URL still
    /// flushes pending text, then skips.
    PrintImage {
        url: Option<String>,
        desired_width: Option<u32>,
    },

    /// No effect. Unknown name or too few arguments.
    Ignored { name: String, reason: &'static str },

    /// Arguments had the wrong type; reported as a failed operation.
    Malformed {
        operation: &'static str,
        reason: String,
    },
}

impl Operation {
    /// Build an operation from its wire name and arguments.
    ///
    /// ```
    /// use serde_json::json;
    /// use ticketera::job::Operation;
    ///
    /// assert_eq!(Operation::from_raw("Feed", &[json!(2)]), Operation::Feed(2));
    /// assert_eq!(Operation::from_raw("AbrirCajon", &[]), Operation::OpenDrawer);
    /// assert!(matches!(Operation::from_raw("Cortar", &[]), Operation::Ignored { .. }));
    /// ```
    pub fn from_raw(name: &str, args: &[Value]) -> Self {
        let parsed = match name {
            WRITE_TEXT => text_arg(args.first()).map(Operation::WriteText),
            FEED => feed_count(args.first()).map(Operation::Feed),
            OPEN_DRAWER => Ok(Operation::OpenDrawer),
            WRITE_TEXT_WITH_CODEPAGE => {
                if args.len() < 3 {
                    return Operation::Ignored {
                        name: name.to_string(),
                        reason: "needs table, codepage and text arguments",
                    };
                }
                codepage_args(args)
            }
            PRINT_IMAGE => image_args(args),
            _ => {
                return Operation::Ignored {
                    name: name.to_string(),
                    reason: "unknown operation",
                };
            }
        };

        parsed.unwrap_or_else(|reason| Operation::Malformed {
            operation: wire_name(name),
            reason,
        })
    }

    /// Build an operation whose `argumentos` was not an array.
    ///
    /// Known names become [`Operation::Malformed`]; unknown ones stay inert.
    pub fn from_non_array(name: &str, args: &Value) -> Self {
        match wire_name(name) {
            "unknown" => Operation::Ignored {
                name: name.to_string(),
                reason: "unknown operation",
            },
            operation => Operation::Malformed {
                operation,
                reason: format!("arguments must be an array, got {}", args),
            },
        }
    }

    /// Wire name, for logs.
    pub fn name(&self) -> &str {
        match self {
            Operation::WriteText(_) => WRITE_TEXT,
            Operation::Feed(_) => FEED,
            Operation::WriteTextWithCodepage { .. } => WRITE_TEXT_WITH_CODEPAGE,
            Operation::OpenDrawer => OPEN_DRAWER,
            Operation::PrintImage { .. } => PRINT_IMAGE,
            Operation::Ignored { name, .. } => name,
            Operation::Malformed { operation, .. } => operation,
        }
    }
}

fn wire_name(name: &str) -> &'static str {
    [WRITE_TEXT, FEED, OPEN_DRAWER, WRITE_TEXT_WITH_CODEPAGE, PRINT_IMAGE]
        .into_iter()
        .find(|known| *known == name)
        .unwrap_or("unknown")
}

// ============================================================================
// ARGUMENT COERCION
// ============================================================================

/// Text argument: strings as-is, `null`/missing as empty, scalars as their
/// JSON text.
fn text_arg(value: Option<&Value>) -> Result<String, String> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
        Some(other) => Err(format!("expected text, got {}", other)),
    }
}

/// Integer argument: JSON numbers (fractions truncated) or numeric strings.
fn int_arg(value: Option<&Value>) -> Result<Option<i64>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(|| format!("number {} is out of range", n)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("expected an integer, got \"{}\"", s)),
        Some(other) => Err(format!("expected an integer, got {}", other)),
    }
}

fn feed_count(value: Option<&Value>) -> Result<usize, String> {
    let lines = int_arg(value)?.unwrap_or(1).max(0) as u64;
    if lines > MAX_FEED_LINES as u64 {
        warn!(requested = lines, max = MAX_FEED_LINES, "feed count clamped");
        return Ok(MAX_FEED_LINES);
    }
    Ok(lines as usize)
}

fn codepage_args(args: &[Value]) -> Result<Operation, String> {
    // A bad table number is a codepage-selection failure, handled at run time.
    let table = int_arg(args.first()).unwrap_or(None);
    let codepage = text_arg(args.get(1))?;
    let text = text_arg(args.get(2))?;
    Ok(Operation::WriteTextWithCodepage {
        table,
        codepage,
        text,
    })
}

fn image_args(args: &[Value]) -> Result<Operation, String> {
    let url = match args.first() {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => return Err(format!("expected a URL, got {}", other)),
    };

    let desired_width = match int_arg(args.get(1))? {
        None => None,
        Some(w) if w <= 0 => return Err(format!("image width must be positive, got {}", w)),
        Some(w) => Some(
            u32::try_from(w).map_err(|_| format!("image width {} is out of range", w))?,
        ),
    };

    Ok(Operation::PrintImage { url, desired_width })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_text() {
        assert_eq!(
            Operation::from_raw(WRITE_TEXT, &[json!("Hola")]),
            Operation::WriteText("Hola".into())
        );
        assert_eq!(Operation::from_raw(WRITE_TEXT, &[]), Operation::WriteText(String::new()));
        assert_eq!(Operation::from_raw(WRITE_TEXT, &[json!(null)]), Operation::WriteText(String::new()));
        assert_eq!(Operation::from_raw(WRITE_TEXT, &[json!(42)]), Operation::WriteText("42".into()));
    }

    #[test]
    fn test_write_text_rejects_objects() {
        let op = Operation::from_raw(WRITE_TEXT, &[json!({"a": 1})]);
        assert!(matches!(op, Operation::Malformed { operation: WRITE_TEXT, .. }));
    }

    #[test]
    fn test_feed_counts() {
        assert_eq!(Operation::from_raw(FEED, &[]), Operation::Feed(1));
        assert_eq!(Operation::from_raw(FEED, &[json!(3)]), Operation::Feed(3));
        assert_eq!(Operation::from_raw(FEED, &[json!("4")]), Operation::Feed(4));
        assert_eq!(Operation::from_raw(FEED, &[json!(2.9)]), Operation::Feed(2));
        assert_eq!(Operation::from_raw(FEED, &[json!(-2)]), Operation::Feed(0));
        assert_eq!(Operation::from_raw(FEED, &[json!(1_000_000)]), Operation::Feed(MAX_FEED_LINES));
        assert!(matches!(Operation::from_raw(FEED, &[json!("mucho")]), Operation::Malformed { .. }));
    }

    #[test]
    fn test_codepage_needs_three_args() {
        let op = Operation::from_raw(WRITE_TEXT_WITH_CODEPAGE, &[json!(16), json!("cp1252")]);
        assert!(matches!(op, Operation::Ignored { .. }));
    }

    #[test]
    fn test_codepage_args() {
        let op = Operation::from_raw(
            WRITE_TEXT_WITH_CODEPAGE,
            &[json!(16), json!("cp1252"), json!("Señor"), json!("extra")],
        );
        assert_eq!(
            op,
            Operation::WriteTextWithCodepage {
                table: Some(16),
                codepage: "cp1252".into(),
                text: "Señor".into(),
            }
        );
    }

    #[test]
    fn test_codepage_non_numeric_table_is_none() {
        let op = Operation::from_raw(
            WRITE_TEXT_WITH_CODEPAGE,
            &[json!("x"), json!("cp437"), json!("hi")],
        );
        assert!(matches!(op, Operation::WriteTextWithCodepage { table: None, .. }));
    }

    #[test]
    fn test_image_args() {
        assert_eq!(
            Operation::from_raw(PRINT_IMAGE, &[json!("https://x/logo.png"), json!(600)]),
            Operation::PrintImage {
                url: Some("https://x/logo.png".into()),
                desired_width: Some(600),
            }
        );
        assert_eq!(
            Operation::from_raw(PRINT_IMAGE, &[json!("https://x/logo.png"), json!(null)]),
            Operation::PrintImage {
                url: Some("https://x/logo.png".into()),
                desired_width: None,
            }
        );
        assert_eq!(
            Operation::from_raw(PRINT_IMAGE, &[]),
            Operation::PrintImage { url: None, desired_width: None }
        );
        assert!(matches!(
            Operation::from_raw(PRINT_IMAGE, &[json!("u"), json!(0)]),
            Operation::Malformed { .. }
        ));
    }

    #[test]
    fn test_image_width_out_of_range() {
        let op = Operation::from_raw(PRINT_IMAGE, &[json!("u"), json!(5_000_000_000i64)]);
        assert!(matches!(op, Operation::Malformed { operation: PRINT_IMAGE, ref reason } if reason.contains("out of range")));
    }

    #[test]
    fn test_non_array_arguments() {
        assert!(matches!(
            Operation::from_non_array(FEED, &json!("total")),
            Operation::Malformed { operation: FEED, .. }
        ));
        assert!(matches!(
            Operation::from_non_array("Cortar", &json!(1)),
            Operation::Ignored { .. }
        ));
    }

    #[test]
    fn test_unknown_is_ignored() {
        let op = Operation::from_raw("Cortar", &[json!(1)]);
        assert_eq!(op.name(), "Cortar");
        assert!(matches!(op, Operation::Ignored { reason: "unknown operation", .. }));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(matches!(Operation::from_raw("feed", &[]), Operation::Ignored { .. }));
    }
}
