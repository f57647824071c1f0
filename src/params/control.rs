//! Identifiers for the physical controls, operating modes and backing slots
//!
//! The numeric ids returned by [`Control::id`] and [`Mode::id`] are part of the
//! persisted patch format and must stay stable.

/// Operating mode of the voice, chosen by the mode selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Slow triangle detune on the Secondary oscillator
    Chorus,
    /// LFO-driven pulse width on both oscillators
    LfoPwm,
    /// LFO-driven pitch on both oscillators
    LfoFm,
    /// Secondary hard-synced to Primary at a frequency multiple
    HardSync,
}

impl Mode {
    pub const COUNT: usize = 4;
    pub const ALL: [Mode; Mode::COUNT] = [Mode::Chorus, Mode::LfoPwm, Mode::LfoFm, Mode::HardSync];

    pub fn id(self) -> u8 {
        self.index() as u8
    }

    pub fn index(self) -> usize {
        match self {
            Mode::Chorus => 0,
            Mode::LfoPwm => 1,
            Mode::LfoFm => 2,
            Mode::HardSync => 3,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Map a mode selector position to a mode (rounded, clamped to 0..=3)
    pub fn from_position(position: f32) -> Self {
        let index = position.round().clamp(0.0, (Self::COUNT - 1) as f32) as usize;
        Self::ALL[index]
    }

    /// Backing slot holding this mode's LFO rate on the given layer.
    ///
    /// Chorus and HardSync put a depth on the alt layer, so their rate stays the main
    /// layer's. LfoPwm and LfoFm carry a second rate on the alt layer.
    pub fn rate_slot(self, alt_layer: bool) -> Slot {
        match (self, alt_layer) {
            (Mode::Chorus, _) => Slot::ChorusRate,
            (Mode::LfoPwm, false) => Slot::PwmRate,
            (Mode::LfoPwm, true) => Slot::PwmAltRate,
            (Mode::LfoFm, false) => Slot::FmRate,
            (Mode::LfoFm, true) => Slot::FmAltRate,
            (Mode::HardSync, _) => Slot::SyncRate,
        }
    }

    /// Backing slot holding this mode's LFO depth, if it has one
    pub fn depth_slot(self) -> Option<Slot> {
        match self {
            Mode::Chorus => Some(Slot::ChorusDepth),
            Mode::HardSync => Some(Slot::SyncDepth),
            Mode::LfoPwm | Mode::LfoFm => None,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Chorus
    }
}

/// Read the latching alt-layer selector
pub fn alt_layer_from_position(position: f32) -> bool {
    position >= 0.5
}

/// Physical controls on the panel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    PrimaryPitch,
    SecondaryPitch,
    Lfo,
    PrimaryDuty,
    SecondaryDuty,
    Crossfade,
    PrimaryRampLevel,
    PrimaryPulseLevel,
    PrimarySubLevel,
    SecondaryRampLevel,
    SecondaryPulseLevel,
    SecondarySubLevel,
    ModeSelect,
    AltLayer,
}

impl Control {
    pub const COUNT: usize = 14;

    pub const ALL: [Control; Control::COUNT] = [
        Control::PrimaryPitch,
        Control::SecondaryPitch,
        Control::Lfo,
        Control::PrimaryDuty,
        Control::SecondaryDuty,
        Control::Crossfade,
        Control::PrimaryRampLevel,
        Control::PrimaryPulseLevel,
        Control::PrimarySubLevel,
        Control::SecondaryRampLevel,
        Control::SecondaryPulseLevel,
        Control::SecondarySubLevel,
        Control::ModeSelect,
        Control::AltLayer,
    ];

    /// Every control except the two selectors
    pub const KNOBS: [Control; 12] = [
        Control::PrimaryPitch,
        Control::SecondaryPitch,
        Control::Lfo,
        Control::PrimaryDuty,
        Control::SecondaryDuty,
        Control::Crossfade,
        Control::PrimaryRampLevel,
        Control::PrimaryPulseLevel,
        Control::PrimarySubLevel,
        Control::SecondaryRampLevel,
        Control::SecondaryPulseLevel,
        Control::SecondarySubLevel,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn is_selector(self) -> bool {
        matches!(self, Control::ModeSelect | Control::AltLayer)
    }

    /// Position range as (min, max)
    pub fn range(self) -> (f32, f32) {
        match self {
            Control::PrimaryPitch | Control::SecondaryPitch => (-4.0, 4.0),
            Control::Lfo => (0.0, 8.0),
            Control::Crossfade => (-1.0, 1.0),
            Control::ModeSelect => (0.0, (Mode::COUNT - 1) as f32),
            _ => (0.0, 1.0),
        }
    }

    /// Position of the control on a freshly initialised panel
    pub fn default_position(self) -> f32 {
        match self {
            Control::Lfo => 3.0,
            Control::PrimaryDuty | Control::SecondaryDuty => 0.5,
            Control::PrimaryRampLevel | Control::SecondaryRampLevel => 1.0,
            _ => 0.0,
        }
    }

    pub fn clamp(self, value: f32) -> f32 {
        let (min, max) = self.range();
        value.clamp(min, max)
    }
}

/// Backing cells with independent storage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    PrimaryPitch,
    SecondaryPitch,
    SyncMultiplier,
    ChorusRate,
    ChorusDepth,
    PwmRate,
    PwmAltRate,
    FmRate,
    FmAltRate,
    SyncRate,
    SyncDepth,
    PrimaryDuty,
    SecondaryDuty,
    PrimaryPwmDuty,
    SecondaryPwmDuty,
    PrimaryPwmCenter,
    SecondaryPwmCenter,
    Crossfade,
    PrimaryRampLevel,
    PrimaryPulseLevel,
    PrimarySubLevel,
    SecondaryRampLevel,
    SecondaryPulseLevel,
    SecondarySubLevel,
}

impl Slot {
    pub const COUNT: usize = 24;

    pub const ALL: [Slot; Slot::COUNT] = [
        Slot::PrimaryPitch,
        Slot::SecondaryPitch,
        Slot::SyncMultiplier,
        Slot::ChorusRate,
        Slot::ChorusDepth,
        Slot::PwmRate,
        Slot::PwmAltRate,
        Slot::FmRate,
        Slot::FmAltRate,
        Slot::SyncRate,
        Slot::SyncDepth,
        Slot::PrimaryDuty,
        Slot::SecondaryDuty,
        Slot::PrimaryPwmDuty,
        Slot::SecondaryPwmDuty,
        Slot::PrimaryPwmCenter,
        Slot::SecondaryPwmCenter,
        Slot::Crossfade,
        Slot::PrimaryRampLevel,
        Slot::PrimaryPulseLevel,
        Slot::PrimarySubLevel,
        Slot::SecondaryRampLevel,
        Slot::SecondaryPulseLevel,
        Slot::SecondarySubLevel,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The physical control that edits this slot
    pub fn control(self) -> Control {
        match self {
            Slot::PrimaryPitch => Control::PrimaryPitch,
            Slot::SecondaryPitch | Slot::SyncMultiplier => Control::SecondaryPitch,
            Slot::ChorusRate
            | Slot::ChorusDepth
            | Slot::PwmRate
            | Slot::PwmAltRate
            | Slot::FmRate
            | Slot::FmAltRate
            | Slot::SyncRate
            | Slot::SyncDepth => Control::Lfo,
            Slot::PrimaryDuty | Slot::PrimaryPwmDuty | Slot::PrimaryPwmCenter => {
                Control::PrimaryDuty
            }
            Slot::SecondaryDuty | Slot::SecondaryPwmDuty | Slot::SecondaryPwmCenter => {
                Control::SecondaryDuty
            }
            Slot::Crossfade => Control::Crossfade,
            Slot::PrimaryRampLevel => Control::PrimaryRampLevel,
            Slot::PrimaryPulseLevel => Control::PrimaryPulseLevel,
            Slot::PrimarySubLevel => Control::PrimarySubLevel,
            Slot::SecondaryRampLevel => Control::SecondaryRampLevel,
            Slot::SecondaryPulseLevel => Control::SecondaryPulseLevel,
            Slot::SecondarySubLevel => Control::SecondarySubLevel,
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            Slot::ChorusDepth | Slot::SyncDepth | Slot::SyncMultiplier => 0.0,
            _ => self.control().default_position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for control in Control::ALL {
            assert_eq!(Control::from_id(control.id()), Some(control));
        }
        for mode in Mode::ALL {
            assert_eq!(Mode::from_id(mode.id()), Some(mode));
        }
        assert_eq!(Control::from_id(Control::COUNT as u8), None);
        assert_eq!(Mode::from_id(4), None);
    }

    #[test]
    fn test_mode_from_position() {
        assert_eq!(Mode::from_position(0.0), Mode::Chorus);
        assert_eq!(Mode::from_position(1.4), Mode::LfoPwm);
        assert_eq!(Mode::from_position(1.6), Mode::LfoFm);
        assert_eq!(Mode::from_position(3.0), Mode::HardSync);
        assert_eq!(Mode::from_position(-2.0), Mode::Chorus);
        assert_eq!(Mode::from_position(9.0), Mode::HardSync);
    }

    #[test]
    fn test_slot_defaults_within_control_range() {
        for slot in Slot::ALL {
            let value = slot.default_value();
            assert_eq!(slot.control().clamp(value), value, "{:?}", slot);
        }
    }

    #[test]
    fn test_rate_and_depth_slots_per_layer() {
        assert_eq!(Mode::Chorus.rate_slot(true), Slot::ChorusRate);
        assert_eq!(Mode::HardSync.rate_slot(true), Slot::SyncRate);
        assert_eq!(Mode::LfoPwm.rate_slot(true), Slot::PwmAltRate);
        assert_eq!(Mode::LfoFm.rate_slot(false), Slot::FmRate);
        assert_ne!(Mode::Chorus.depth_slot(), Mode::HardSync.depth_slot());
        assert_eq!(Mode::LfoFm.depth_slot(), None);
    }
}
