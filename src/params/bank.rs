//! Mode-scoped parameter storage
//!
//! Every adjustable control can stand for a different value in each (mode, alt layer)
//! pair. The bank stores each independent value once in a flat slot array and keeps the
//! physical controls in step with whichever slot is currently active.

use super::control::{alt_layer_from_position, Control, Mode, Slot};
use super::surface::ControlSurface;
use super::table::resolve;

/// Direction of the last reconciliation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciliation {
    /// Mode or alt layer changed: active slot values were written to the controls
    Pushed,
    /// No selector change: control positions were written to the active slots
    Pulled,
}

/// Single source of truth for every control's logical value
#[derive(Clone, Debug)]
pub struct ParameterBank {
    slots: [f32; Slot::COUNT],
    mode: Mode,
    alt_layer: bool,
    /// Selector state seen by the previous reconciliation; `None` forces a push
    last_selection: Option<(Mode, bool)>,
}

impl ParameterBank {
    pub fn new() -> Self {
        let mut bank = Self {
            slots: [0.0; Slot::COUNT],
            mode: Mode::default(),
            alt_layer: false,
            last_selection: None,
        };
        bank.reset_to_defaults();
        bank
    }

    /// Restore every slot to its default and force the next reconciliation to push
    pub fn reset_to_defaults(&mut self) {
        for slot in Slot::ALL {
            self.slots[slot.index()] = slot.default_value();
        }
        self.last_selection = None;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn alt_layer(&self) -> bool {
        self.alt_layer
    }

    /// Select a mode and alt layer directly (the surface selectors win on the next
    /// reconciliation)
    pub fn set_selection(&mut self, mode: Mode, alt_layer: bool) {
        self.mode = mode;
        self.alt_layer = alt_layer;
        self.last_selection = None;
    }

    /// Slot a control currently edits
    #[inline]
    pub fn active_slot(&self, control: Control) -> Option<Slot> {
        resolve(control, self.mode, self.alt_layer)
    }

    /// Logical value a control currently represents.
    ///
    /// For the selectors this is the selected mode index or the alt-layer flag.
    #[inline]
    pub fn value(&self, control: Control) -> f32 {
        match self.active_slot(control) {
            Some(slot) => self.slots[slot.index()],
            None => match control {
                Control::ModeSelect => self.mode.index() as f32,
                _ => {
                    if self.alt_layer {
                        1.0
                    } else {
                        0.0
                    }
                }
            },
        }
    }

    /// Write the active slot of a control (ignored for the selectors)
    pub fn set_value(&mut self, control: Control, value: f32) {
        if let Some(slot) = self.active_slot(control) {
            self.set_slot(slot, value);
        }
    }

    #[inline]
    pub fn slot(&self, slot: Slot) -> f32 {
        self.slots[slot.index()]
    }

    /// Write a slot, clamped to the range of the control that edits it
    #[inline]
    pub fn set_slot(&mut self, slot: Slot, value: f32) {
        self.slots[slot.index()] = slot.control().clamp(value);
    }

    pub fn slots(&self) -> &[f32; Slot::COUNT] {
        &self.slots
    }

    /// Bring the bank and the control surface into agreement.
    ///
    /// When the mode or alt layer changed since the previous call, every knob is moved
    /// to the value it now represents. Otherwise every knob position is stored into its
    /// active slot. The two directions never happen in the same call.
    pub fn reconcile(&mut self, surface: &mut ControlSurface) -> Reconciliation {
        self.mode = Mode::from_position(surface.get(Control::ModeSelect));
        self.alt_layer = alt_layer_from_position(surface.get(Control::AltLayer));
        let selection = (self.mode, self.alt_layer);

        if self.last_selection != Some(selection) {
            self.last_selection = Some(selection);
            for control in Control::KNOBS {
                if let Some(slot) = self.active_slot(control) {
                    surface.set(control, self.slots[slot.index()]);
                }
            }
            Reconciliation::Pushed
        } else {
            for control in Control::KNOBS {
                if let Some(slot) = self.active_slot(control) {
                    self.slots[slot.index()] = surface.get(control);
                }
            }
            Reconciliation::Pulled
        }
    }

    /// Move the selector controls to the bank's mode and alt layer
    pub fn write_selectors(&self, surface: &mut ControlSurface) {
        surface.set(Control::ModeSelect, self.mode.index() as f32);
        surface.set(Control::AltLayer, if self.alt_layer { 1.0 } else { 0.0 });
    }
}

impl Default for ParameterBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_reconcile_pushes_defaults() {
        let mut bank = ParameterBank::new();
        let mut surface = ControlSurface::new();
        surface.set(Control::Lfo, 7.0);

        assert_eq!(bank.reconcile(&mut surface), Reconciliation::Pushed);
        assert_eq!(surface.get(Control::Lfo), 3.0);
    }

    #[test]
    fn test_alt_layer_swaps_lfo_rate_for_depth() {
        let mut bank = ParameterBank::new();
        let mut surface = ControlSurface::new();
        bank.reconcile(&mut surface);

        surface.set(Control::Lfo, 5.0);
        assert_eq!(bank.reconcile(&mut surface), Reconciliation::Pulled);
        assert_eq!(bank.slot(Slot::ChorusRate), 5.0);

        surface.set(Control::AltLayer, 1.0);
        assert_eq!(bank.reconcile(&mut surface), Reconciliation::Pushed);
        assert_eq!(surface.get(Control::Lfo), 0.0);

        surface.set(Control::Lfo, 2.0);
        bank.reconcile(&mut surface);
        assert_eq!(bank.slot(Slot::ChorusDepth), 2.0);
        assert_eq!(bank.slot(Slot::ChorusRate), 5.0);

        surface.set(Control::AltLayer, 0.0);
        bank.reconcile(&mut surface);
        assert_eq!(surface.get(Control::Lfo), 5.0);
    }

    #[test]
    fn test_switch_tick_does_not_read_controls() {
        let mut bank = ParameterBank::new();
        let mut surface = ControlSurface::new();
        bank.reconcile(&mut surface);

        // Knob moved in the same tick as the mode switch is overwritten, not stored
        surface.set(Control::ModeSelect, 3.0);
        surface.set(Control::SecondaryPitch, 2.5);
        assert_eq!(bank.reconcile(&mut surface), Reconciliation::Pushed);

        assert_eq!(bank.mode(), Mode::HardSync);
        assert_eq!(bank.slot(Slot::SecondaryPitch), 0.0);
        assert_eq!(bank.slot(Slot::SyncMultiplier), 0.0);
        assert_eq!(surface.get(Control::SecondaryPitch), 0.0);
    }

    #[test]
    fn test_value_of_selectors() {
        let mut bank = ParameterBank::new();
        bank.set_selection(Mode::LfoFm, true);
        assert_eq!(bank.value(Control::ModeSelect), 2.0);
        assert_eq!(bank.value(Control::AltLayer), 1.0);
    }

    #[test]
    fn test_set_value_targets_active_slot() {
        let mut bank = ParameterBank::new();
        bank.set_selection(Mode::LfoPwm, true);
        bank.set_value(Control::PrimaryDuty, 0.2);

        assert_eq!(bank.slot(Slot::PrimaryPwmCenter), 0.2);
        assert_eq!(bank.slot(Slot::PrimaryDuty), 0.5);
        assert_eq!(bank.value(Control::PrimaryDuty), 0.2);
    }
}
