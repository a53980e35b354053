//! Reversible edit operations against the document store.
//!
//! An [`EditorCommand`] is a self-contained description of one edit: it
//! carries everything needed to apply the change and to restore the exact
//! prior state. Construction is side-effect free — nothing touches the store
//! until [`EditorCommand::execute`] runs. Commands never talk to rendering or
//! the network; the document store is their only collaborator.

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::doc::{DocumentStore, StoreError};
use crate::module::{now_ms, MapId, Module, ModuleId, PartialModule};

/// Descriptor of the edit that produced a history entry, used for UI
/// labeling ("Undo rotate") and history inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditAction {
    /// Baseline entry pushed when a document is (re)loaded.
    DocumentLoad,
    /// Module(s) were added (placement, paste, duplicate).
    ModuleAdd {
        module_ids: Vec<ModuleId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Module(s) were deleted.
    ModuleDelete {
        module_ids: Vec<ModuleId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Module(s) were moved.
    ModuleMove {
        module_ids: Vec<ModuleId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Module(s) were resized.
    ModuleResize {
        module_ids: Vec<ModuleId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Module(s) were rotated.
    ModuleRotate {
        module_ids: Vec<ModuleId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Some other module property changed (z-order, lock, metadata, ...).
    ModulePropertyChange {
        module_ids: Vec<ModuleId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl EditAction {
    /// Short verb for undo/redo menu labels.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::DocumentLoad => "load document",
            Self::ModuleAdd { .. } => "add",
            Self::ModuleDelete { .. } => "delete",
            Self::ModuleMove { .. } => "move",
            Self::ModuleResize { .. } => "resize",
            Self::ModuleRotate { .. } => "rotate",
            Self::ModulePropertyChange { .. } => "change properties",
        }
    }

    /// Attach a human-readable description. `DocumentLoad` carries none and
    /// is returned unchanged.
    #[must_use]
    pub fn with_description(mut self, text: &str) -> Self {
        match &mut self {
            Self::DocumentLoad => {}
            Self::ModuleAdd { description, .. }
            | Self::ModuleDelete { description, .. }
            | Self::ModuleMove { description, .. }
            | Self::ModuleResize { description, .. }
            | Self::ModuleRotate { description, .. }
            | Self::ModulePropertyChange { description, .. } => {
                *description = Some(text.to_owned());
            }
        }
        self
    }
}

/// One module's share of a property command: a sparse new-value delta plus
/// the mirrored old values needed to undo it.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub module_id: ModuleId,
    pub old: PartialModule,
    pub new: PartialModule,
}

impl PropertyChange {
    /// Build a change against the module's current state. The old side is
    /// captured automatically for every field present in `new`, plus
    /// `updated_at`, so undo restores the exact prior state.
    #[must_use]
    pub fn new(module: &Module, new: PartialModule) -> Self {
        Self {
            module_id: module.id,
            old: PartialModule::mirror_of(module, &new),
            new,
        }
    }

    /// True when the new values equal the captured old values (ignoring the
    /// `updated_at` bookkeeping field).
    #[must_use]
    pub fn is_noop(&self) -> bool {
        let mut old = self.old.clone();
        let mut new = self.new.clone();
        old.updated_at = None;
        new.updated_at = None;
        old == new
    }
}

/// One module's share of a reorder command.
#[derive(Debug, Clone, PartialEq)]
pub struct ZOrderChange {
    pub module_id: ModuleId,
    pub old_z_index: i64,
    pub new_z_index: i64,
    /// Captured so undo restores the pre-reorder timestamp exactly.
    pub old_updated_at: i64,
}

impl ZOrderChange {
    /// Build a change against the module's current state.
    #[must_use]
    pub fn new(module: &Module, new_z_index: i64) -> Self {
        Self {
            module_id: module.id,
            old_z_index: module.z_index,
            new_z_index,
            old_updated_at: module.updated_at,
        }
    }
}

/// A typed, reversible unit of change.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Sparse field updates (move/resize/rotate/metadata — all property deltas).
    Property { changes: Vec<PropertyChange> },
    /// Insert full module values.
    Add { modules: Vec<Module> },
    /// Remove modules, carrying the full removed values for undo.
    Delete { modules: Vec<Module> },
    /// Change stacking order. Structurally a property change, kept distinct
    /// so history descriptions read as a reorder.
    Reorder { changes: Vec<ZOrderChange> },
}

impl EditorCommand {
    /// Property command over a set of per-module deltas.
    #[must_use]
    pub fn property(changes: Vec<PropertyChange>) -> Self {
        Self::Property { changes }
    }

    /// Add command. Nil module ids are assigned here, at construction, so
    /// that execute → undo → execute (redo) re-inserts the same ids.
    #[must_use]
    pub fn add(mut modules: Vec<Module>) -> Self {
        for module in &mut modules {
            if module.id.is_nil() {
                module.id = Uuid::new_v4();
            }
        }
        Self::Add { modules }
    }

    /// Delete command carrying the full values to remove.
    #[must_use]
    pub fn delete(modules: Vec<Module>) -> Self {
        Self::Delete { modules }
    }

    /// Reorder command over a set of z-index swaps.
    #[must_use]
    pub fn reorder(changes: Vec<ZOrderChange>) -> Self {
        Self::Reorder { changes }
    }

    /// True when executing this command would change nothing. Callers use
    /// this to skip history pushes for zero-delta edits.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Property { changes } => changes.iter().all(PropertyChange::is_noop),
            Self::Add { modules } | Self::Delete { modules } => modules.is_empty(),
            Self::Reorder { changes } => {
                changes.iter().all(|c| c.old_z_index == c.new_z_index)
            }
        }
    }

    /// Ids of the modules this command touches.
    #[must_use]
    pub fn module_ids(&self) -> Vec<ModuleId> {
        match self {
            Self::Property { changes } => changes.iter().map(|c| c.module_id).collect(),
            Self::Add { modules } | Self::Delete { modules } => {
                modules.iter().map(|m| m.id).collect()
            }
            Self::Reorder { changes } => changes.iter().map(|c| c.module_id).collect(),
        }
    }

    /// Apply the command to the store. Every mutated module gets a fresh
    /// `updated_at`.
    pub fn execute(&self, map_id: &MapId, store: &mut DocumentStore) -> Result<(), StoreError> {
        match self {
            Self::Property { changes } => {
                let now = now_ms();
                for change in changes {
                    let mut partial = change.new.clone();
                    if partial.updated_at.is_none() {
                        partial.updated_at = Some(now);
                    }
                    store.apply_partial(map_id, &change.module_id, &partial)?;
                }
            }
            Self::Add { modules } => {
                for module in modules {
                    store.add_module(map_id, module.clone())?;
                }
            }
            Self::Delete { modules } => {
                for module in modules {
                    store.remove_module(map_id, &module.id)?;
                }
            }
            Self::Reorder { changes } => {
                let now = now_ms();
                for change in changes {
                    let partial = PartialModule {
                        z_index: Some(change.new_z_index),
                        updated_at: Some(now),
                        ..PartialModule::default()
                    };
                    store.apply_partial(map_id, &change.module_id, &partial)?;
                }
            }
        }
        Ok(())
    }

    /// Restore the state from immediately before [`EditorCommand::execute`],
    /// byte for byte — captured old values include the prior `updated_at`,
    /// and deleted modules are re-inserted with all original fields.
    pub fn undo(&self, map_id: &MapId, store: &mut DocumentStore) -> Result<(), StoreError> {
        match self {
            Self::Property { changes } => {
                for change in changes {
                    store.apply_partial(map_id, &change.module_id, &change.old)?;
                }
            }
            Self::Add { modules } => {
                for module in modules {
                    store.remove_module(map_id, &module.id)?;
                }
            }
            Self::Delete { modules } => {
                for module in modules {
                    store.add_module(map_id, module.clone())?;
                }
            }
            Self::Reorder { changes } => {
                for change in changes {
                    let partial = PartialModule {
                        z_index: Some(change.old_z_index),
                        updated_at: Some(change.old_updated_at),
                        ..PartialModule::default()
                    };
                    store.apply_partial(map_id, &change.module_id, &partial)?;
                }
            }
        }
        Ok(())
    }

    /// The action descriptor this command contributes to history. Property
    /// commands infer move/resize/rotate from the shape of their deltas.
    #[must_use]
    pub fn action(&self) -> EditAction {
        let module_ids = self.module_ids();
        match self {
            Self::Add { .. } => EditAction::ModuleAdd { module_ids, description: None },
            Self::Delete { .. } => EditAction::ModuleDelete { module_ids, description: None },
            Self::Reorder { .. } => EditAction::ModulePropertyChange {
                module_ids,
                description: Some("reorder".to_owned()),
            },
            Self::Property { changes } => {
                let any = |pick: fn(&PartialModule) -> bool| {
                    changes.iter().any(|c| pick(&c.new))
                };
                let has_size = any(|p| p.width.is_some() || p.height.is_some());
                let has_pos = any(|p| p.x.is_some() || p.y.is_some());
                let has_rotation = any(|p| p.rotation.is_some());
                let has_other = any(|p| {
                    p.z_index.is_some()
                        || p.locked.is_some()
                        || p.visible.is_some()
                        || p.metadata.is_some()
                });
                if has_size && !has_rotation && !has_other {
                    EditAction::ModuleResize { module_ids, description: None }
                } else if has_pos && !has_size && !has_rotation && !has_other {
                    EditAction::ModuleMove { module_ids, description: None }
                } else if has_rotation && !has_pos && !has_size && !has_other {
                    EditAction::ModuleRotate { module_ids, description: None }
                } else {
                    EditAction::ModulePropertyChange { module_ids, description: None }
                }
            }
        }
    }
}
