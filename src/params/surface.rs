use super::control::Control;

/// Raw positions of every physical control.
///
/// Owned by the host. The host writes positions as the user moves controls; the
/// [`ParameterBank`](super::ParameterBank) writes them back when a mode or alt-layer
/// switch changes which value a control represents.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlSurface {
    positions: [f32; Control::COUNT],
}

impl ControlSurface {
    pub fn new() -> Self {
        let mut positions = [0.0; Control::COUNT];
        for control in Control::ALL {
            positions[control.index()] = control.default_position();
        }
        Self { positions }
    }

    #[inline]
    pub fn get(&self, control: Control) -> f32 {
        self.positions[control.index()]
    }

    /// Move a control, clamped to its range
    #[inline]
    pub fn set(&mut self, control: Control, position: f32) {
        self.positions[control.index()] = control.clamp(position);
    }

    pub fn positions(&self) -> &[f32; Control::COUNT] {
        &self.positions
    }
}

impl Default for ControlSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        let mut surface = ControlSurface::new();
        assert_eq!(surface.get(Control::Lfo), 3.0);
        assert_eq!(surface.get(Control::PrimaryDuty), 0.5);

        surface.set(Control::Crossfade, 4.0);
        assert_eq!(surface.get(Control::Crossfade), 1.0);

        surface.set(Control::PrimaryPitch, -10.0);
        assert_eq!(surface.get(Control::PrimaryPitch), -4.0);
    }
}
