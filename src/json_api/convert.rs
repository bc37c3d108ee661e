//! Conversion from wire types to a typed [`Job`].

use serde_json::Value;
use tracing::debug;

use super::schema::{PrintRequest, RawOperation};
use crate::error::TicketeraError;
use crate::job::lifecycle::MISSING_PRINTER;
use crate::job::{Job, Operation};
use crate::printer::PrinterConfig;

impl PrintRequest {
    /// Validate the request and type its operations.
    ///
    /// Only a missing or blank printer name is rejected; problems inside
    /// individual operations become [`Operation::Ignored`] or
    /// [`Operation::Malformed`] and are dealt with while the job runs.
    pub fn into_job(self) -> Result<Job, TicketeraError> {
        let printer = self
            .nombre_impresora
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| TicketeraError::Validation(MISSING_PRINTER.to_string()))?;

        let config = PrinterConfig::for_paper(self.ancho_impresora.as_deref());
        let operations: Vec<Operation> = self
            .operaciones
            .unwrap_or_default()
            .iter()
            .map(RawOperation::to_operation)
            .collect();

        debug!(printer = %printer, paper = config.name, operations = operations.len(), "request parsed");
        Ok(Job {
            printer,
            config,
            operations,
        })
    }
}

impl RawOperation {
    pub fn to_operation(&self) -> Operation {
        let name = match &self.nombre {
            Some(Value::String(name)) => name,
            None | Some(Value::Null) => {
                return Operation::Ignored {
                    name: String::new(),
                    reason: "missing operation name",
                };
            }
            Some(other) => {
                return Operation::Ignored {
                    name: other.to_string(),
                    reason: "operation name is not a string",
                };
            }
        };

        match &self.argumentos {
            None | Some(Value::Null) => Operation::from_raw(name, &[]),
            Some(Value::Array(args)) => Operation::from_raw(name, args),
            Some(other) => Operation::from_non_array(name, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> Result<Job, TicketeraError> {
        serde_json::from_str::<PrintRequest>(json).unwrap().into_job()
    }

    #[test]
    fn test_full_request() {
        let job = parse(
            r#"{
                "nombreImpresora": "POS-58",
                "anchoImpresora": "58mm",
                "operaciones": [
                    {"nombre": "Feed", "argumentos": [2]},
                    {"nombre": "EscribirTexto", "argumentos": ["Hola"]},
                    {"nombre": "AbrirCajon", "argumentos": []}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(job.printer, "POS-58");
        assert_eq!(job.config, PrinterConfig::NARROW_58MM);
        assert_eq!(
            job.operations,
            vec![
                Operation::Feed(2),
                Operation::WriteText("Hola".into()),
                Operation::OpenDrawer,
            ]
        );
    }

    #[test]
    fn test_defaults() {
        let job = parse(r#"{"nombreImpresora": "P"}"#).unwrap();
        assert_eq!(job.config, PrinterConfig::WIDE_80MM);
        assert!(job.operations.is_empty());

        let job = parse(r#"{"nombreImpresora": "P", "anchoImpresora": "58MM", "operaciones": null}"#).unwrap();
        assert_eq!(job.config, PrinterConfig::WIDE_80MM);
    }

    #[test]
    fn test_missing_printer_name() {
        for json in [
            r#"{"operaciones": []}"#,
            r#"{"nombreImpresora": ""}"#,
            r#"{"nombreImpresora": null}"#,
            r#"{"nombreImpresora": "   "}"#,
        ] {
            let err = parse(json).unwrap_err();
            assert!(err.to_string().contains("required"), "{}", json);
        }
    }

    #[test]
    fn test_operation_without_name_or_args() {
        let job = parse(
            r#"{"nombreImpresora": "P", "operaciones": [{"argumentos": [1]}, {"nombre": "AbrirCajon"}]}"#,
        )
        .unwrap();
        assert!(matches!(job.operations[0], Operation::Ignored { .. }));
        assert_eq!(job.operations[1], Operation::OpenDrawer);
    }

    #[test]
    fn test_odd_entries_do_not_reject_request() {
        let job = parse(
            r#"{"nombreImpresora": "P", "operaciones": [
                {"nombre": 5},
                "EscribirTexto",
                {"nombre": "Feed", "argumentos": "total"},
                {"nombre": "Cortar", "argumentos": {"x": 1}},
                {"nombre": "EscribirTexto", "argumentos": ["Hola"]}
            ]}"#,
        )
        .unwrap();

        assert!(matches!(&job.operations[0], Operation::Ignored { name, .. } if name == "5"));
        assert!(matches!(job.operations[1], Operation::Ignored { .. }));
        assert!(matches!(job.operations[2], Operation::Malformed { operation: "Feed", .. }));
        assert!(matches!(job.operations[3], Operation::Ignored { .. }));
        assert_eq!(job.operations[4], Operation::WriteText("Hola".into()));
    }
}
