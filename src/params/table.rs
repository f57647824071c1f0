//! Resolution table from (control, mode, alt layer) to backing slot
//!
//! Aliasing lives here as data: entries that share storage name the same [`Slot`].
//! Rows are indexed by [`Control::index`], then [`Mode::index`], then the alt layer
//! (`false` = 0, `true` = 1).

use super::control::{Control, Mode, Slot};

type Row = [[Option<Slot>; 2]; Mode::COUNT];

/// Same slot for every mode and alt layer
const fn every(slot: Slot) -> Row {
    [[Some(slot); 2]; Mode::COUNT]
}

const NONE: Row = [[None; 2]; Mode::COUNT];

const RESOLUTION: [Row; Control::COUNT] = [
    // PrimaryPitch
    every(Slot::PrimaryPitch),
    // SecondaryPitch: a frequency multiple of the driver in hard sync
    [
        [Some(Slot::SecondaryPitch), Some(Slot::SecondaryPitch)],
        [Some(Slot::SecondaryPitch), Some(Slot::SecondaryPitch)],
        [Some(Slot::SecondaryPitch), Some(Slot::SecondaryPitch)],
        [Some(Slot::SyncMultiplier), Some(Slot::SyncMultiplier)],
    ],
    // Lfo: eight cells; depth on the alt layer of Chorus and HardSync, a second rate
    // on the alt layer of LfoPwm and LfoFm
    [
        [Some(Slot::ChorusRate), Some(Slot::ChorusDepth)],
        [Some(Slot::PwmRate), Some(Slot::PwmAltRate)],
        [Some(Slot::FmRate), Some(Slot::FmAltRate)],
        [Some(Slot::SyncRate), Some(Slot::SyncDepth)],
    ],
    // PrimaryDuty: shared outside LfoPwm; LfoPwm has its own duty and a PWM center
    [
        [Some(Slot::PrimaryDuty), Some(Slot::PrimaryDuty)],
        [Some(Slot::PrimaryPwmDuty), Some(Slot::PrimaryPwmCenter)],
        [Some(Slot::PrimaryDuty), Some(Slot::PrimaryDuty)],
        [Some(Slot::PrimaryDuty), Some(Slot::PrimaryDuty)],
    ],
    // SecondaryDuty
    [
        [Some(Slot::SecondaryDuty), Some(Slot::SecondaryDuty)],
        [Some(Slot::SecondaryPwmDuty), Some(Slot::SecondaryPwmCenter)],
        [Some(Slot::SecondaryDuty), Some(Slot::SecondaryDuty)],
        [Some(Slot::SecondaryDuty), Some(Slot::SecondaryDuty)],
    ],
    every(Slot::Crossfade),
    every(Slot::PrimaryRampLevel),
    every(Slot::PrimaryPulseLevel),
    every(Slot::PrimarySubLevel),
    every(Slot::SecondaryRampLevel),
    every(Slot::SecondaryPulseLevel),
    every(Slot::SecondarySubLevel),
    // ModeSelect
    NONE,
    // AltLayer
    NONE,
];

/// Backing slot a control edits under the given mode and alt layer.
///
/// Returns `None` for the mode and alt-layer selectors, which have no slot.
#[inline]
pub fn resolve(control: Control, mode: Mode, alt_layer: bool) -> Option<Slot> {
    RESOLUTION[control.index()][mode.index()][alt_layer as usize]
}

/// The first (control, mode, alt layer) key in table order that resolves to `slot`.
///
/// Used as the persisted key for the slot so each backing cell is written once.
pub fn canonical_key(slot: Slot) -> (Control, Mode, bool) {
    for control in Control::KNOBS {
        for mode in Mode::ALL {
            for alt_layer in [false, true] {
                if resolve(control, mode, alt_layer) == Some(slot) {
                    return (control, mode, alt_layer);
                }
            }
        }
    }
    // Every slot is reachable from its own control in at least one mode
    (slot.control(), Mode::Chorus, false)
}
