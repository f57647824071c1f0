//! Patch persistence for the parameter bank
//!
//! Every backing slot is written as one flat entry keyed by three small integers
//! `(param, mode, alt_layer)`, so a saved patch restores the hidden values of every mode,
//! not just the visible ones. Restoring is tolerant: a malformed entry is logged and
//! skipped and its slot keeps the default value.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::bank::ParameterBank;
use super::control::{Control, Mode, Slot};
use super::table::{canonical_key, resolve};

/// Current patch format version
pub const PATCH_VERSION: u32 = 1;

/// Structured key of one backing cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub param: u8,
    pub mode: u8,
    #[serde(rename = "altLayer")]
    pub alt_layer: bool,
}

impl CellKey {
    pub fn new(control: Control, mode: Mode, alt_layer: bool) -> Self {
        Self {
            param: control.id(),
            mode: mode.id(),
            alt_layer,
        }
    }

    /// Resolve the key to the slot it addresses
    pub fn slot(&self) -> Result<Slot> {
        let control = Control::from_id(self.param)
            .ok_or_else(|| anyhow!("Unknown param id {}", self.param))?;
        let mode = Mode::from_id(self.mode).ok_or_else(|| anyhow!("Unknown mode id {}", self.mode))?;
        resolve(control, mode, self.alt_layer)
            .ok_or_else(|| anyhow!("Param {:?} has no backing cell", control))
    }
}

/// One persisted backing cell
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedCell {
    pub param: u8,
    pub mode: u8,
    #[serde(rename = "altLayer")]
    pub alt_layer: bool,
    pub value: f32,
}

impl PersistedCell {
    pub fn key(&self) -> CellKey {
        CellKey {
            param: self.param,
            mode: self.mode,
            alt_layer: self.alt_layer,
        }
    }
}

/// Serialized form of a whole bank
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankPatch {
    #[serde(default)]
    pub version: u32,
    pub mode: u8,
    #[serde(rename = "altLayer")]
    pub alt_layer: bool,
    pub cells: Vec<PersistedCell>,
}

impl BankPatch {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize patch")
    }
}

/// Outcome of a tolerant restore
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Entries applied to a slot
    pub restored: usize,
    /// Entries skipped because they were malformed
    pub rejected: usize,
}

/// Parse one cell entry into its slot and a finite, range-clamped value
fn parse_cell(entry: &Value) -> Result<(Slot, f32)> {
    let cell: PersistedCell = serde_json::from_value(entry.clone())
        .with_context(|| format!("Malformed cell entry {}", entry))?;
    let slot = cell.key().slot()?;
    if !cell.value.is_finite() {
        return Err(anyhow!("Non-finite value for {:?}", slot));
    }
    Ok((slot, slot.control().clamp(cell.value)))
}

impl ParameterBank {
    /// Snapshot every backing slot under its canonical key
    pub fn to_patch(&self) -> BankPatch {
        let cells = Slot::ALL
            .iter()
            .map(|&slot| {
                let (control, mode, alt_layer) = canonical_key(slot);
                let key = CellKey::new(control, mode, alt_layer);
                PersistedCell {
                    param: key.param,
                    mode: key.mode,
                    alt_layer: key.alt_layer,
                    value: self.slot(slot),
                }
            })
            .collect();

        BankPatch {
            version: PATCH_VERSION,
            mode: self.mode().id(),
            alt_layer: self.alt_layer(),
            cells,
        }
    }

    /// Restore from a patch document.
    ///
    /// Slots fall back to their defaults first, then each entry is applied on its own.
    /// Only a document that is not a JSON object is an error; in that case the bank is
    /// left untouched.
    pub fn restore_json(&mut self, json: &str) -> Result<RestoreReport> {
        let document: Value = serde_json::from_str(json).context("Failed to parse patch")?;
        let object = document
            .as_object()
            .ok_or_else(|| anyhow!("Patch root is not an object"))?;

        self.reset_to_defaults();
        let mut report = RestoreReport::default();

        let mode = match object.get("mode").and_then(Value::as_u64) {
            Some(id) => Mode::from_id(id.min(u8::MAX as u64) as u8).unwrap_or_else(|| {
                log::warn!("Unknown mode id {} in patch, using {:?}", id, Mode::default());
                Mode::default()
            }),
            None => Mode::default(),
        };
        let alt_layer = object
            .get("altLayer")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let entries = object
            .get("cells")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for entry in entries {
            match parse_cell(entry) {
                Ok((slot, value)) => {
                    self.set_slot(slot, value);
                    report.restored += 1;
                }
                Err(e) => {
                    log::warn!("Skipping patch entry: {:#}", e);
                    report.rejected += 1;
                }
            }
        }

        self.set_selection(mode, alt_layer);
        if report.rejected > 0 {
            log::warn!(
                "Patch restored with {} rejected entries ({} applied)",
                report.rejected,
                report.restored
            );
        } else {
            log::debug!("Patch restored ({} entries)", report.restored);
        }
        Ok(report)
    }

    /// Save the bank as a JSON patch file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create patch directory")?;
            }
        }
        let json = self.to_patch().to_json()?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write patch file {}", path.display()))?;
        log::info!("Saved patch to {}", path.display());
        Ok(())
    }

    /// Load a JSON patch file into the bank
    pub fn load_from_file(&mut self, path: &Path) -> Result<RestoreReport> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read patch file {}", path.display()))?;
        let report = self.restore_json(&json)?;
        log::info!("Loaded patch from {}", path.display());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_key_resolves_aliases() {
        let key = CellKey::new(Control::Lfo, Mode::HardSync, true);
        assert_eq!(key.slot().ok(), Some(Slot::SyncDepth));

        let key = CellKey::new(Control::SecondaryPitch, Mode::HardSync, false);
        assert_eq!(key.slot().ok(), Some(Slot::SyncMultiplier));

        let key = CellKey::new(Control::PrimaryDuty, Mode::LfoPwm, false);
        assert_eq!(key.slot().ok(), Some(Slot::PrimaryPwmDuty));

        let key = CellKey::new(Control::ModeSelect, Mode::Chorus, false);
        assert!(key.slot().is_err());

        let key = CellKey {
            param: 42,
            mode: 0,
            alt_layer: false,
        };
        let err = key.slot().unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown param id 42"));
    }

    #[test]
    fn test_patch_writes_each_slot_once() {
        let patch = ParameterBank::new().to_patch();
        assert_eq!(patch.cells.len(), Slot::COUNT);
        assert_eq!(patch.version, PATCH_VERSION);

        let slots: Vec<Slot> = patch
            .cells
            .iter()
            .map(|cell| cell.key().slot().expect("canonical key must resolve"))
            .collect();
        assert_eq!(slots, Slot::ALL.to_vec());
    }

    #[test]
    fn test_rejects_non_object_document() {
        let mut bank = ParameterBank::new();
        bank.set_slot(Slot::Crossfade, 0.25);

        assert!(bank.restore_json("[1, 2, 3]").is_err());
        assert!(bank.restore_json("not json").is_err());
        assert_eq!(bank.slot(Slot::Crossfade), 0.25);
    }
}
