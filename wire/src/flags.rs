//! Per-call message flags.
//!
//! Flags modify how one delta is written or read. They are never stored with
//! the record itself.

use std::ops::BitOr;

use crate::error::{WireError, WireResult};

/// Entity delta flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EntityMsgFlags(u8);

impl EntityMsgFlags {
    /// Write every eligible field.
    pub const FORCE: u8 = 1 << 0;
    /// The receiver has no record for this entity yet.
    pub const NEWENTITY: u8 = 1 << 1;
    /// The entity is the receiver's own view entity; position is owned by the player state.
    pub const FIRSTPERSON: u8 = 1 << 2;
    /// The origin group carries both beam endpoints.
    pub const BEAMORIGIN: u8 = 1 << 3;

    const KNOWN: u8 = Self::FORCE | Self::NEWENTITY | Self::FIRSTPERSON | Self::BEAMORIGIN;

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds flags from raw bits. Unknown bits are dropped.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw & Self::KNOWN)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn with(self, flag: u8) -> Self {
        Self::from_raw(self.0 | flag)
    }

    #[must_use]
    pub const fn is_force(self) -> bool {
        self.0 & Self::FORCE != 0
    }

    #[must_use]
    pub const fn is_new_entity(self) -> bool {
        self.0 & Self::NEWENTITY != 0
    }

    #[must_use]
    pub const fn is_first_person(self) -> bool {
        self.0 & Self::FIRSTPERSON != 0
    }

    #[must_use]
    pub const fn is_beam_origin(self) -> bool {
        self.0 & Self::BEAMORIGIN != 0
    }

    /// Returns `true` if every eligible field must be written.
    #[must_use]
    pub const fn writes_all(self) -> bool {
        self.is_force() || self.is_new_entity()
    }
}

impl BitOr for EntityMsgFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Raw player-state flags as a caller might assemble them.
///
/// Convert into [`PlayerStateOptions`] before encoding; the conversion rejects
/// contradictory combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlayerStateMsgFlags(u8);

impl PlayerStateMsgFlags {
    pub const IGNORE_VIEWANGLES: u8 = 1 << 0;
    pub const IGNORE_DELTAANGLES: u8 = 1 << 1;
    pub const IGNORE_PREDICTION: u8 = 1 << 2;
    pub const FORCE: u8 = 1 << 3;
    pub const REMOVE: u8 = 1 << 4;

    const RESERVED_MASK: u8 = !0b1_1111;

    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }
}

/// Which view-related field group the receiver predicts on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewSuppression {
    /// Nothing suppressed.
    #[default]
    None,
    /// View angles are client-authoritative and never sent.
    ViewAngles,
    /// The client predicts movement: velocity, move time, move flags and gravity are not sent.
    Prediction,
}

/// Validated player-state encoding options.
///
/// View-angle and prediction suppression are one enum, so both cannot be
/// requested at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlayerStateOptions {
    pub view: ViewSuppression,
    pub ignore_delta_angles: bool,
    /// Write every eligible field.
    pub force: bool,
    /// The player state is gone. Only the removal bit is written.
    pub remove: bool,
}

impl PlayerStateOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            view: ViewSuppression::None,
            ignore_delta_angles: false,
            force: false,
            remove: false,
        }
    }

    #[must_use]
    pub const fn forced() -> Self {
        Self {
            force: true,
            ..Self::new()
        }
    }

    #[must_use]
    pub const fn removal() -> Self {
        Self {
            remove: true,
            ..Self::new()
        }
    }

    #[must_use]
    pub const fn with_view(self, view: ViewSuppression) -> Self {
        Self { view, ..self }
    }

    #[must_use]
    pub const fn ignores_view_angles(self) -> bool {
        matches!(self.view, ViewSuppression::ViewAngles)
    }

    #[must_use]
    pub const fn ignores_prediction(self) -> bool {
        matches!(self.view, ViewSuppression::Prediction)
    }
}

impl TryFrom<PlayerStateMsgFlags> for PlayerStateOptions {
    type Error = WireError;

    fn try_from(flags: PlayerStateMsgFlags) -> WireResult<Self> {
        let raw = flags.raw();
        if raw & PlayerStateMsgFlags::RESERVED_MASK != 0 {
            return Err(WireError::UnknownFlags { flags: raw });
        }
        let view = match (
            flags.contains(PlayerStateMsgFlags::IGNORE_VIEWANGLES),
            flags.contains(PlayerStateMsgFlags::IGNORE_PREDICTION),
        ) {
            (true, true) => return Err(WireError::ConflictingFlags { flags: raw }),
            (true, false) => ViewSuppression::ViewAngles,
            (false, true) => ViewSuppression::Prediction,
            (false, false) => ViewSuppression::None,
        };
        Ok(Self {
            view,
            ignore_delta_angles: flags.contains(PlayerStateMsgFlags::IGNORE_DELTAANGLES),
            force: flags.contains(PlayerStateMsgFlags::FORCE),
            remove: flags.contains(PlayerStateMsgFlags::REMOVE),
        })
    }
}

impl From<PlayerStateOptions> for PlayerStateMsgFlags {
    fn from(options: PlayerStateOptions) -> Self {
        let mut raw = match options.view {
            ViewSuppression::None => 0,
            ViewSuppression::ViewAngles => Self::IGNORE_VIEWANGLES,
            ViewSuppression::Prediction => Self::IGNORE_PREDICTION,
        };
        if options.ignore_delta_angles {
            raw |= Self::IGNORE_DELTAANGLES;
        }
        if options.force {
            raw |= Self::FORCE;
        }
        if options.remove {
            raw |= Self::REMOVE;
        }
        Self(raw)
    }
}
