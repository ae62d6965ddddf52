//! Fleet records. Wire names are the backend's Spanish keys; unknown keys are
//! kept in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::error::FieldErrors;
use crate::plate;

pub(crate) const INVALID_PLATE: &str = "invalid license plate";

/// Reject a `matricula` field that is present, non-blank and not a valid
/// plate. Missing or blank plates are left to the backend.
fn check_plate(fields: &Value) -> FieldErrors {
    let mut problems = FieldErrors::new();
    let valid = match fields.get("matricula").or_else(|| fields.get("plate")) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty() || plate::is_valid_plate(s),
        Some(_) => false,
    };
    if !valid {
        problems.push(("matricula".to_owned(), vec![INVALID_PLATE.to_owned()]));
    }
    problems
}

fn fields<'a>(values: [Option<&'a String>; 3]) -> Vec<&'a str> {
    values.into_iter().flatten().map(String::as_str).collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    #[serde(rename = "matricula", alias = "plate", default)]
    pub plate: Option<String>,
    #[serde(rename = "marca", alias = "brand", default)]
    pub brand: Option<String>,
    #[serde(rename = "modelo", alias = "model", default)]
    pub model: Option<String>,
    #[serde(rename = "estado", alias = "status", default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vehicle {
    #[must_use]
    pub fn has_valid_plate(&self) -> bool {
        self.plate.as_deref().is_some_and(plate::is_valid_plate)
    }
}

impl Resource for Vehicle {
    const PATH: &'static str = "/vehiculos";
    const LABEL: &'static str = "vehicle";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        fields([self.plate.as_ref(), self.brand.as_ref(), self.model.as_ref()])
    }

    fn validate(fields: &Value) -> FieldErrors {
        check_plate(fields)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: i64,
    #[serde(rename = "nombre", alias = "name", default)]
    pub name: Option<String>,
    #[serde(rename = "tipo", alias = "kind", default)]
    pub kind: Option<String>,
    #[serde(rename = "matricula", alias = "plate", default)]
    pub plate: Option<String>,
    #[serde(rename = "estado", alias = "status", default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Machine {
    const PATH: &'static str = "/maquinaria";
    const LABEL: &'static str = "machine";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        fields([self.name.as_ref(), self.kind.as_ref(), self.plate.as_ref()])
    }

    fn validate(fields: &Value) -> FieldErrors {
        check_plate(fields)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(rename = "titulo", alias = "title", default)]
    pub title: Option<String>,
    #[serde(rename = "descripcion", alias = "description", default)]
    pub description: Option<String>,
    #[serde(rename = "estado", alias = "status", default)]
    pub status: Option<String>,
    /// Assigned worker.
    #[serde(rename = "trabajador_id", alias = "worker_id", default)]
    pub worker_id: Option<i64>,
    #[serde(rename = "fecha_limite", alias = "due_date", default)]
    pub due_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Task {
    const PATH: &'static str = "/tareas";
    const LABEL: &'static str = "task";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        fields([self.title.as_ref(), self.description.as_ref(), self.status.as_ref()])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "titulo", alias = "title", default)]
    pub title: Option<String>,
    #[serde(rename = "mensaje", alias = "message", default)]
    pub message: Option<String>,
    #[serde(rename = "leida", alias = "read", default)]
    pub read: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Notification {
    const PATH: &'static str = "/notificaciones";
    const LABEL: &'static str = "notification";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        fields([self.title.as_ref(), self.message.as_ref(), None])
    }
}

/// Last reported position of a worker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkerLocation {
    pub id: i64,
    #[serde(rename = "trabajador_id", alias = "worker_id", default)]
    pub worker_id: Option<i64>,
    #[serde(rename = "nombre", alias = "name", default)]
    pub worker_name: Option<String>,
    #[serde(rename = "latitud", alias = "latitude")]
    pub latitude: f64,
    #[serde(rename = "longitud", alias = "longitude")]
    pub longitude: f64,
    #[serde(rename = "direccion", alias = "address", default)]
    pub address: Option<String>,
    #[serde(rename = "fecha", alias = "recorded_at", default)]
    pub recorded_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for WorkerLocation {
    const PATH: &'static str = "/ubicaciones";
    const LABEL: &'static str = "worker location";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        fields([self.worker_name.as_ref(), self.address.as_ref(), None])
    }
}
