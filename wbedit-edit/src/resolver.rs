//! Three-way edit conflict resolution.
//!
//! An editor started from `base`; someone else has since saved `latest`.
//! The editor's change is the diff `base → mine`. It is replayed on top of
//! `latest` and the result is re-diffed against `latest` to see how much of
//! it survived:
//!
//! ```text
//! patch        = diff(base, mine)
//! patched      = patch(latest, patch)
//! clean_patch  = diff(latest, patched)
//! conflicts    = count(patch) - count(clean_patch)
//! ```
//!
//! Conflicts are measured by operation count, not by matching individual
//! operations. Two different changes to one field that happen to produce
//! equally sized patches are not detected.

use crate::ConflictError;
use serde::Serialize;
use tracing::{debug, info};
use wbedit_diff::{EntityDiffer, EntityPatcher};
use wbedit_model::Entity;

/// Non-fatal notes about how an edit was reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionWarning {
    /// The editor conflicted with their own newer revision; the surviving
    /// part of the edit was applied anyway.
    SelfConflictPatched { conflicts: usize },
    /// The edit was replayed on top of a concurrent revision without loss.
    ConflictResolved,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// What to save on top of `latest`.
    pub target: Entity,
    pub conflicts: usize,
    /// `count(diff(base, mine))`.
    pub patch_size: usize,
    /// `count(diff(latest, target))`.
    pub clean_size: usize,
    pub warnings: Vec<ResolutionWarning>,
}

/// Reconciles `mine` (edited from `base`) with the newer `latest`.
///
/// `latest_by_same_actor` tells whether the editor authored `latest`
/// themselves. Only such self-conflicts may be patched through.
pub fn resolve(
    base: &Entity,
    latest: &Entity,
    mine: &Entity,
    latest_by_same_actor: bool,
) -> Result<Resolution, ConflictError> {
    let differ = EntityDiffer::new();
    let patch = differ.diff(base, mine);
    let patch_size = patch.count();
    if patch.is_empty() {
        debug!("empty patch, keeping latest");
        return Ok(Resolution {
            target: latest.clone(),
            conflicts: 0,
            patch_size: 0,
            clean_size: 0,
            warnings: Vec::new(),
        });
    }

    let patched = EntityPatcher::new().patch(latest.clone(), &patch)?;
    let clean_size = differ.diff(latest, &patched).count();
    let conflicts = patch_size.saturating_sub(clean_size);
    debug!("patch has {patch_size} ops, {clean_size} survived, {conflicts} conflicts");

    let mut warnings = Vec::new();
    if conflicts > 0 {
        if !latest_by_same_actor || clean_size == 0 {
            return Err(ConflictError::Unresolvable {
                conflicts,
                self_conflict: latest_by_same_actor,
            });
        }
        info!("patched self-conflict, {conflicts} ops lost");
        warnings.push(ResolutionWarning::SelfConflictPatched { conflicts });
    } else if base != latest {
        warnings.push(ResolutionWarning::ConflictResolved);
    }

    Ok(Resolution {
        target: patched,
        conflicts,
        patch_size,
        clean_size,
        warnings,
    })
}
