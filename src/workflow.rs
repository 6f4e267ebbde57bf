//! The two remote workflows this console can trigger.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowKind {
    #[serde(rename = "main")]
    Main,
    #[serde(rename = "google_sheets", alias = "sheets")]
    SheetsSub,
}

impl WorkflowKind {
    pub const ALL: [WorkflowKind; 2] = [WorkflowKind::Main, WorkflowKind::SheetsSub];

    /// Name sent in the webhook payload and used in API paths.
    pub fn wire_name(&self) -> &'static str {
        match self {
            WorkflowKind::Main => "main",
            WorkflowKind::SheetsSub => "google_sheets",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WorkflowKind::Main => "Main Workflow",
            WorkflowKind::SheetsSub => "Google Sheets Sub-Workflow",
        }
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

#[derive(Debug, Error)]
#[error("unknown workflow '{0}' (expected 'main' or 'google_sheets')")]
pub struct ParseWorkflowError(pub String);

impl FromStr for WorkflowKind {
    type Err = ParseWorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" => Ok(WorkflowKind::Main),
            "google_sheets" | "sheets" => Ok(WorkflowKind::SheetsSub),
            other => Err(ParseWorkflowError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_names_and_alias() {
        assert_eq!("main".parse::<WorkflowKind>().unwrap(), WorkflowKind::Main);
        assert_eq!(
            "google_sheets".parse::<WorkflowKind>().unwrap(),
            WorkflowKind::SheetsSub
        );
        assert_eq!(
            " Sheets ".parse::<WorkflowKind>().unwrap(),
            WorkflowKind::SheetsSub
        );
        assert!("billing".parse::<WorkflowKind>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_name() {
        let json = serde_json::to_string(&WorkflowKind::SheetsSub).unwrap();
        assert_eq!(json, "\"google_sheets\"");
        let back: WorkflowKind = serde_json::from_str("\"main\"").unwrap();
        assert_eq!(back, WorkflowKind::Main);
    }
}
