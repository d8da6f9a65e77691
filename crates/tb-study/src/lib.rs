//! tb-study: canonical study file format and validation.
//!
//! A study lists infused animals (body weight, infusate tracers and their
//! labels) and the serum samples measured for them.

pub mod migrate;
pub mod schema;
pub mod validate;

use std::fs;
use std::path::Path;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_study};

pub type StudyResult<T> = Result<T, StudyError>;

#[derive(thiserror::Error, Debug)]
pub enum StudyError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding of a study file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyFormat {
    Yaml,
    Json,
}

impl StudyFormat {
    /// `.json` is JSON; `.yaml`, `.yml` and anything else is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    /// Decode, bring up to `LATEST_VERSION`, then validate.
    pub fn parse(self, content: &str) -> StudyResult<Study> {
        let study: Study = match self {
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
        };
        let study = migrate_to_latest(study)?;
        validate_study(&study)?;
        Ok(study)
    }

    /// Validate, then encode. Invalid studies are never written.
    pub fn render(self, study: &Study) -> StudyResult<String> {
        validate_study(study)?;
        Ok(match self {
            Self::Yaml => serde_yaml::to_string(study)?,
            Self::Json => serde_json::to_string_pretty(study)?,
        })
    }
}

fn load_as(path: &Path, format: StudyFormat) -> StudyResult<Study> {
    format.parse(&fs::read_to_string(path)?)
}

fn save_as(path: &Path, study: &Study, format: StudyFormat) -> StudyResult<()> {
    fs::write(path, format.render(study)?)?;
    Ok(())
}

pub fn load_yaml(path: &Path) -> StudyResult<Study> {
    load_as(path, StudyFormat::Yaml)
}

pub fn save_yaml(path: &Path, study: &Study) -> StudyResult<()> {
    save_as(path, study, StudyFormat::Yaml)
}

pub fn load_json(path: &Path) -> StudyResult<Study> {
    load_as(path, StudyFormat::Json)
}

pub fn save_json(path: &Path, study: &Study) -> StudyResult<()> {
    save_as(path, study, StudyFormat::Json)
}

pub fn load(path: &Path) -> StudyResult<Study> {
    load_as(path, StudyFormat::from_path(path))
}

pub fn save(path: &Path, study: &Study) -> StudyResult<()> {
    save_as(path, study, StudyFormat::from_path(path))
}
