// src/editor/selection.rs
use serde::{Deserialize, Serialize};

use super::commands::TargetRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClearReason {
    Deleted,
    /// The selected index no longer points at an entry.
    Invalidated,
}

/// What the caller should do with its current selection after an edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SelectionEffect {
    Keep,
    Clear { reason: ClearReason },
    Set {
        #[serde(rename = "ref")]
        target: TargetRef,
    },
}

impl SelectionEffect {
    pub fn set(target: TargetRef) -> Self {
        SelectionEffect::Set { target }
    }

    pub fn deleted() -> Self {
        SelectionEffect::Clear { reason: ClearReason::Deleted }
    }

    pub fn target(&self) -> Option<&TargetRef> {
        match self {
            SelectionEffect::Set { target } => Some(target),
            _ => None,
        }
    }
}
