// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod json;
pub mod pbsnodes;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::app::errors::{AppError, AppResult};
use crate::app::ports::InventoryPort;
use crate::app::types::Vnode;

pub use json::parse_json_listing;
pub use pbsnodes::parse_pbsnodes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryFormat {
    /// JSON array of `{"name": .., "resources_available": {..}}`, or the
    /// output of `pbsnodes -av -F json`.
    Json,
    /// Text output of `pbsnodes -av`.
    Pbsnodes,
}

impl InventoryFormat {
    /// `.json` files are JSON, anything else is taken as `pbsnodes -av` output.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InventoryFormat::Json,
            _ => InventoryFormat::Pbsnodes,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InventoryFormat::Json => "json",
            InventoryFormat::Pbsnodes => "pbsnodes",
        }
    }
}

impl fmt::Display for InventoryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InventoryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(InventoryFormat::Json),
            "pbsnodes" => Ok(InventoryFormat::Pbsnodes),
            other => Err(format!("unknown inventory format '{other}'")),
        }
    }
}

pub fn parse_inventory(raw: &str, format: InventoryFormat) -> AppResult<Vec<Vnode>> {
    match format {
        InventoryFormat::Json => parse_json_listing(raw)
            .map_err(|err| AppError::inventory(format!("invalid vnode listing: {err}"))),
        InventoryFormat::Pbsnodes => {
            parse_pbsnodes(raw).map_err(|err| AppError::inventory(err.to_string()))
        }
    }
}

/// Inventory read from a file on each query.
#[derive(Debug, Clone)]
pub struct FileInventory {
    path: PathBuf,
    format: InventoryFormat,
}

impl FileInventory {
    pub fn new(path: PathBuf, format: Option<InventoryFormat>) -> Self {
        let format = format.unwrap_or_else(|| InventoryFormat::from_path(&path));
        Self { path, format }
    }
}

impl InventoryPort for FileInventory {
    fn vnodes(&self) -> AppResult<Vec<Vnode>> {
        let raw = std::fs::read_to_string(&self.path).map_err(|err| {
            AppError::inventory(format!("failed to read vnode listing: {err}"))
                .with_context(self.path.display().to_string())
        })?;
        let vnodes = parse_inventory(&raw, self.format)
            .map_err(|err| err.with_context(self.path.display().to_string()))?;
        tracing::debug!(
            path = %self.path.display(),
            format = self.format.as_str(),
            count = vnodes.len(),
            "loaded vnode inventory"
        );
        Ok(vnodes)
    }
}

/// Inventory with no vnodes, for hosts that have no listing configured.
/// Any `mppnodes` request resolved against it is rejected for lack of matches.
#[derive(Debug, Clone, Default)]
pub struct EmptyInventory;

impl InventoryPort for EmptyInventory {
    fn vnodes(&self) -> AppResult<Vec<Vnode>> {
        tracing::warn!("no vnode inventory configured; mppnodes cannot match");
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            InventoryFormat::from_path(Path::new("/tmp/nodes.JSON")),
            InventoryFormat::Json
        );
        assert_eq!(
            InventoryFormat::from_path(Path::new("/tmp/pbsnodes.out")),
            InventoryFormat::Pbsnodes
        );
        assert_eq!(
            InventoryFormat::from_path(Path::new("nodes")),
            InventoryFormat::Pbsnodes
        );
    }

    #[test]
    fn parses_json_listing() {
        let raw = r#"[
            {"name": "n1", "resources_available": {"PBScraynid": "1"}},
            {"name": "login"}
        ]"#;
        let vnodes = parse_inventory(raw, InventoryFormat::Json).unwrap();
        assert_eq!(vnodes.len(), 2);
        assert_eq!(vnodes[0].get("PBScraynid"), Some("1"));
        assert!(vnodes[1].resources_available.is_empty());
    }

    #[test]
    fn json_listing_accepts_numeric_attributes() {
        let raw = r#"[{"name": "nid5", "resources_available": {"PBScraynid": 5, "ncpus": 24}}]"#;
        let vnodes = parse_inventory(raw, InventoryFormat::Json).unwrap();
        assert_eq!(vnodes[0].get("PBScraynid"), Some("5"));
        assert_eq!(vnodes[0].get("ncpus"), Some("24"));
    }

    #[test]
    fn bad_json_listing_is_inventory_error() {
        let err = parse_inventory("{", InventoryFormat::Json).unwrap_err();
        assert_eq!(err.code(), crate::app::errors::codes::INVENTORY_ERROR);
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("PBSNODES".parse::<InventoryFormat>(), Ok(InventoryFormat::Pbsnodes));
        assert!("yaml".parse::<InventoryFormat>().is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let inventory = FileInventory::new(PathBuf::from("/nonexistent/nodes.json"), None);
        let err = inventory.vnodes().unwrap_err();
        assert_eq!(err.context(), Some("/nonexistent/nodes.json"));
    }
}
