//! Lookups against files the notebook lifecycle configuration leaves on disk.

use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::{AutostopError, Result};

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| AutostopError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Notebook instance name from the `ResourceName` field of the resource metadata file.
pub fn notebook_instance_name(path: &Path) -> Result<String> {
    let raw = read(path)?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| AutostopError::Metadata {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    value["ResourceName"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AutostopError::Metadata {
            path: path.to_path_buf(),
            message: "missing string field 'ResourceName'".to_string(),
        })
}

/// Dev endpoint name from the first `DEV_ENDPOINT_NAME=<name>` line of the script.
pub fn dev_endpoint_name(path: &Path) -> Result<String> {
    let raw = read(path)?;
    let pattern =
        Regex::new(r"^DEV_ENDPOINT_NAME=(.*)$").map_err(|e| AutostopError::Metadata {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    raw.lines()
        .find_map(|line| {
            pattern
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .ok_or_else(|| AutostopError::EndpointNameNotFound {
            path: path.to_path_buf(),
        })
}
