//! YAML conversion of scaling plan documents.
//!
//! The codec is the only place that knows the textual document shape:
//!
//! ```yaml
//! kind: ScalingPlan
//! id: web-frontend
//! db_id: '42'            # persistence mode only
//! metadata:
//!   title: Web frontend
//!   cool_down: 60
//!   interval: 10000
//! variables:
//!   threshold: 80
//! enabled: true
//! plans:
//!   - id: plan_1
//!     priority: 10
//!     expression: "get({metric_id: 'cpu_usage'}) > 80"
//!     scaling_components:
//!       - component_id: web-deployment
//!         replicas: 5
//! ```
//!
//! Two serialization modes exist because the storage identifier belongs in
//! the persisted form but not in the text shown to and edited by users.

use log::debug;
use serde::Serialize;

use crate::{
    error::{Result, ScalingPlanError},
    models::ScalingPlanDocument,
};

/// Which consumer the YAML is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecMode {
    /// Stored by the plan repository; keeps `db_id`
    Persistence,
    /// Shown in the editor, previews and diffs; omits `db_id`
    #[default]
    Display,
}

/// A located document parse failure, suitable for editor annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("line {line}, column {column}: {message}")]
pub struct CodecError {
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    pub message: String,
}

impl CodecError {
    fn from_yaml(error: &serde_yaml::Error) -> Self {
        let (line, column) = error
            .location()
            .map_or((1, 1), |location| (location.line(), location.column()));
        Self {
            line,
            column,
            message: strip_location_suffix(&error.to_string()),
        }
    }
}

/// serde_yaml appends " at line X column Y" to its messages; the location is
/// reported separately.
fn strip_location_suffix(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message.to_string(),
    }
}

/// Serializes `document` without any derived `ui` state.
pub fn to_yaml(document: &ScalingPlanDocument, mode: CodecMode) -> Result<String> {
    let yaml = match mode {
        CodecMode::Persistence => serde_yaml::to_string(document)?,
        CodecMode::Display if document.db_id.is_some() => {
            let mut display = document.clone();
            display.db_id = None;
            serde_yaml::to_string(&display)?
        }
        CodecMode::Display => serde_yaml::to_string(document)?,
    };
    Ok(yaml)
}

/// Parses a YAML document. The result's `db_id` is whatever the text says;
/// callers applying an edit reconcile it with the stored one.
pub fn from_yaml(text: &str) -> std::result::Result<ScalingPlanDocument, CodecError> {
    serde_yaml::from_str(text).map_err(|error| {
        let error = CodecError::from_yaml(&error);
        debug!("Rejected scaling plan YAML at {}:{}", error.line, error.column);
        error
    })
}

/// Parses a YAML document, wrapping failures in [`ScalingPlanError::Parse`].
pub fn parse(text: &str) -> Result<ScalingPlanDocument> {
    from_yaml(text).map_err(ScalingPlanError::from)
}
