//! Configurable limits for bounded encoding and decoding.

use crate::error::{WireError, WireResult};

/// Wire-level limits shared by both peers.
///
/// These bound message size and stream length so a malformed or hostile
/// message cannot make the decoder loop or allocate without bound.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits {
    /// Capacity of each session buffer in bytes.
    pub max_message_bytes: usize,

    /// Width of the entity number in entity delta headers (1..=16).
    pub entity_number_bits: u32,

    /// Maximum number of entity deltas accepted in one stream.
    pub max_packet_entities: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_message_bytes: 32 * 1024,
            // 8191 live entities
            entity_number_bits: 13,
            max_packet_entities: 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_message_bytes: 4096,
            entity_number_bits: 10,
            max_packet_entities: 64,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_message_bytes: 64 * 1024 * 1024,
            entity_number_bits: 16,
            max_packet_entities: usize::MAX,
        }
    }

    /// Checks that the limits describe a usable configuration.
    pub const fn validate(&self) -> WireResult<()> {
        if self.entity_number_bits == 0 || self.entity_number_bits > 16 {
            return Err(WireError::InvalidNumberBits {
                bits: self.entity_number_bits,
            });
        }
        if self.max_message_bytes == 0 {
            return Err(WireError::InvalidLimits {
                reason: "max_message_bytes must be non-zero",
            });
        }
        Ok(())
    }

    /// Largest entity number these limits can carry.
    #[must_use]
    pub const fn max_entity_number(&self) -> u16 {
        crate::header::EntityHeader::max_number(self.entity_number_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_message_bytes, 32 * 1024);
        assert_eq!(limits.entity_number_bits, 13);
        assert_eq!(limits.max_packet_entities, 1024);
        assert_eq!(limits.max_entity_number(), 8191);
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = Limits::for_testing();
        let default_limits = Limits::default();

        assert!(test_limits.max_message_bytes < default_limits.max_message_bytes);
        assert!(test_limits.entity_number_bits < default_limits.entity_number_bits);
        assert!(test_limits.max_packet_entities < default_limits.max_packet_entities);
        assert!(test_limits.validate().is_ok());
    }

    #[test]
    fn unlimited_limits() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_entity_number(), u16::MAX);
        assert_eq!(limits.max_packet_entities, usize::MAX);
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn invalid_number_width_rejected() {
        let limits = Limits {
            entity_number_bits: 17,
            ..Limits::default()
        };
        assert_eq!(
            limits.validate().unwrap_err(),
            WireError::InvalidNumberBits { bits: 17 }
        );
    }

    #[test]
    fn zero_message_size_rejected() {
        let limits = Limits {
            max_message_bytes: 0,
            ..Limits::default()
        };
        assert!(matches!(
            limits.validate(),
            Err(WireError::InvalidLimits { .. })
        ));
    }

    #[test]
    fn limits_const_constructible() {
        const LIMITS: Limits = Limits::for_testing();
        assert_eq!(LIMITS.max_message_bytes, 4096);
    }
}
