//! Read/write model spec JSON files.
//!
//! A model file carries the model's time span, its parameter list, the
//! current time mask and a `gui_config` block with interactive settings.
//! Anything else in the file (component definitions, per-parameter extras)
//! is kept verbatim and written back on save.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{MaskInterval, ModelSpan, Parameter, format_date, parse_date};
use crate::error::{AppError, EXIT_INPUT};
use crate::mask::MaskManager;

/// Settings for the interactive session, persisted inside the model file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuiConfig {
    /// Window size as `(width, height)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<(u32, u32)>,
    /// Primary quantity being modeled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msid: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plot_names: Vec<String>,
    /// Limit lines keyed by name.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub limits: Map<String, Value>,
    /// Where the model was last loaded from or saved to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Fixed data values keyed by component name, from `--set-data`.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub set_data_vals: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `pars`, with any fields this tool does not use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParSpec {
    #[serde(flatten)]
    pub param: Parameter,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    #[serde(default)]
    pub name: String,
    pub datestart: String,
    pub datestop: String,
    pub pars: Vec<ParSpec>,
    /// `[start, stop]` date pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mask_times: Vec<(String, String)>,
    #[serde(default)]
    pub gui_config: GuiConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelFile {
    pub fn span(&self) -> Result<ModelSpan, AppError> {
        let start = parse_date(&self.datestart)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid datestart: {e}")))?;
        let stop = parse_date(&self.datestop)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid datestop: {e}")))?;
        if start > stop {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("Model span is inverted: {} > {}", self.datestart, self.datestop),
            ));
        }
        Ok(ModelSpan { start, stop })
    }

    /// Replace the model's time span.
    pub fn set_span(&mut self, span: ModelSpan) {
        self.datestart = format_date(span.start);
        self.datestop = format_date(span.stop);
    }

    pub fn params(&self) -> Vec<Parameter> {
        self.pars.iter().map(|p| p.param.clone()).collect()
    }

    pub fn masks(&self) -> Result<MaskManager, AppError> {
        let mut masks = MaskManager::new();
        for (start, stop) in &self.mask_times {
            let parse = |raw: &str| {
                parse_date(raw).map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid mask_times entry: {e}")))
            };
            let (start, stop) = (parse(start)?, parse(stop)?);
            if start > stop {
                return Err(AppError::new(
                    EXIT_INPUT,
                    format!(
                        "Invalid mask_times entry: {} is after {}",
                        format_date(start),
                        format_date(stop)
                    ),
                ));
            }
            masks.add(MaskInterval::new(start, stop));
        }
        Ok(masks)
    }

    /// Copy the current session state back into the file contents.
    ///
    /// `params` must be in the same order as `pars`.
    pub fn update(&mut self, params: &[Parameter], masks: &MaskManager) {
        for (spec, param) in self.pars.iter_mut().zip(params) {
            spec.param = param.clone();
        }
        self.mask_times = masks
            .intervals()
            .iter()
            .map(|i| (i.start_date.clone(), i.stop_date.clone()))
            .collect();
    }
}

/// Read a model JSON file.
pub fn read_model(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open model file '{}': {e}", path.display())))?;
    let model: ModelFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid model file '{}': {e}", path.display())))?;
    if model.pars.is_empty() {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("Model file '{}' defines no parameters.", path.display()),
        ));
    }
    Ok(model)
}

/// Write a model JSON file.
pub fn write_model(path: &Path, model: &ModelFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create model file '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, model)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write model file: {e}")))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write model file: {e}")))?;
    Ok(())
}

/// Parse a `<comp_name>=<value>` data setting. Whitespace is ignored and the
/// value is read as a JSON literal.
pub fn parse_set_data(expr: &str) -> Result<(String, Value), AppError> {
    let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let bad = || AppError::new(EXIT_INPUT, format!("--set-data must be in form '<comp_name>=<value>', got '{expr}'"));
    let (comp, raw) = compact.split_once('=').ok_or_else(bad)?;
    if comp.is_empty() || raw.contains('=') {
        return Err(bad());
    }
    let value = serde_json::from_str(raw)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid --set-data value for '{comp}': {e}")))?;
    Ok((comp.to_string(), value))
}

/// Parameters of another model file, for `--inherit-from`.
pub fn read_inherited_params(path: &Path) -> Result<Vec<Parameter>, AppError> {
    Ok(read_model(path)?.params())
}
