//! Per-connection codec configuration.

use bitstream::OverflowPolicy;
use wire::{Limits, ProtocolVersion};

use crate::error::CodecResult;

/// Settings both peers of one connection must agree on, plus the local
/// overflow policy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecConfig {
    /// Protocol revision negotiated for the connection.
    pub protocol: ProtocolVersion,
    /// Wire limits.
    pub limits: Limits,
    /// What the session buffers do when a write does not fit.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub overflow: OverflowPolicy,
}

impl CodecConfig {
    #[must_use]
    pub fn new(protocol: ProtocolVersion) -> Self {
        Self {
            protocol,
            ..Self::default()
        }
    }

    /// Creates a configuration suitable for testing with smaller limits.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            protocol: ProtocolVersion::Precise,
            limits: Limits::for_testing(),
            overflow: OverflowPolicy::Fatal,
        }
    }

    /// Creates a configuration with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            protocol: ProtocolVersion::Precise,
            limits: Limits::unlimited(),
            overflow: OverflowPolicy::Fatal,
        }
    }

    #[must_use]
    pub const fn with_protocol(self, protocol: ProtocolVersion) -> Self {
        Self { protocol, ..self }
    }

    #[must_use]
    pub const fn with_overflow(self, overflow: OverflowPolicy) -> Self {
        Self { overflow, ..self }
    }

    pub fn validate(&self) -> CodecResult<()> {
        self.limits.validate()?;
        Ok(())
    }
}
