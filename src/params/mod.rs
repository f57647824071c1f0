//! Mode-scoped parameters: control identifiers, the resolution table, the control
//! surface, the backing bank and its persistence

pub mod bank;
pub mod control;
pub mod patch;
pub mod surface;
pub mod table;

pub use self::bank::{ParameterBank, Reconciliation};
pub use self::control::{alt_layer_from_position, Control, Mode, Slot};
pub use self::patch::{BankPatch, CellKey, PersistedCell, RestoreReport, PATCH_VERSION};
pub use self::surface::ControlSurface;
pub use self::table::{canonical_key, resolve};
