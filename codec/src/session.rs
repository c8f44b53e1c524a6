//! Per-connection message buffers.

use bitstream::{MsgBuffer, OverflowPolicy};
use tracing::{debug, warn};

use crate::config::CodecConfig;
use crate::error::{CodecError, CodecResult, LimitKind};
use crate::fields::{protocol_fingerprint, CMD_SCHEMA, ENTITY_SCHEMA, PLAYER_SCHEMA};

const SESSION_TARGET: &str = "qdelta::session";

/// One outbound and one inbound buffer, reused for every message of a
/// connection.
///
/// The outbound buffer follows the configured overflow policy. An overflowed
/// message is never handed to the transport: [`finish_message`](Self::finish_message)
/// discards it and reports the overflow.
#[derive(Debug)]
pub struct Session {
    config: CodecConfig,
    fingerprint: u64,
    outbound: MsgBuffer,
    inbound: MsgBuffer,
}

impl Session {
    /// Allocates both buffers at `limits.max_message_bytes`.
    pub fn new(config: CodecConfig) -> CodecResult<Self> {
        config.validate()?;
        ENTITY_SCHEMA.validate()?;
        PLAYER_SCHEMA.validate()?;
        CMD_SCHEMA.validate()?;
        let capacity = config.limits.max_message_bytes;
        let outbound = MsgBuffer::with_capacity(capacity, config.overflow)?;
        let inbound = MsgBuffer::with_capacity(capacity, OverflowPolicy::Fatal)?;
        let fingerprint = protocol_fingerprint(config.protocol);
        Ok(Self {
            config,
            fingerprint,
            outbound,
            inbound,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Layout fingerprint of the negotiated protocol.
    #[must_use]
    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Rejects a peer whose layout fingerprint differs from ours.
    pub fn check_peer_fingerprint(&self, found: u64) -> CodecResult<()> {
        if found != self.fingerprint {
            warn!(
                target: SESSION_TARGET,
                expected = self.fingerprint,
                found = found,
                "peer layout fingerprint mismatch"
            );
            return Err(CodecError::SchemaMismatch {
                expected: self.fingerprint,
                found,
            });
        }
        Ok(())
    }

    /// Clears the outbound buffer and returns it for writing.
    pub fn begin_message(&mut self) -> &mut MsgBuffer {
        self.outbound.clear();
        &mut self.outbound
    }

    /// The outbound buffer, mid-message.
    pub fn outbound(&mut self) -> &mut MsgBuffer {
        &mut self.outbound
    }

    /// Returns the finished outbound message.
    pub fn finish_message(&mut self) -> CodecResult<&[u8]> {
        if self.outbound.overflowed() {
            let capacity = self.outbound.capacity();
            warn!(
                target: SESSION_TARGET,
                capacity = capacity,
                "outbound message overflowed, discarding"
            );
            self.outbound.clear();
            return Err(CodecError::MessageOverflowed { capacity });
        }
        debug!(
            target: SESSION_TARGET,
            bytes = self.outbound.len(),
            "outbound message finished"
        );
        Ok(self.outbound.as_bytes())
    }

    /// Loads a received message and rewinds the read cursor.
    pub fn receive(&mut self, bytes: &[u8]) -> CodecResult<&mut MsgBuffer> {
        self.load_inbound(bytes)?;
        self.inbound.begin_reading();
        Ok(&mut self.inbound)
    }

    /// Loads a received out-of-band message; only whole bytes can be read.
    pub fn receive_oob(&mut self, bytes: &[u8]) -> CodecResult<&mut MsgBuffer> {
        self.load_inbound(bytes)?;
        self.inbound.begin_reading_oob();
        Ok(&mut self.inbound)
    }

    /// The inbound buffer, mid-message.
    pub fn inbound(&mut self) -> &mut MsgBuffer {
        &mut self.inbound
    }

    /// Drops the inbound message once it has been fully processed.
    pub fn message_consumed(&mut self) {
        self.inbound.clear();
    }

    fn load_inbound(&mut self, bytes: &[u8]) -> CodecResult<()> {
        let capacity = self.inbound.capacity();
        if self.inbound.load(bytes).is_err() {
            warn!(
                target: SESSION_TARGET,
                len = bytes.len(),
                capacity = capacity,
                "inbound message larger than buffer"
            );
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::MessageBytes,
                limit: capacity,
                actual: bytes.len(),
            });
        }
        Ok(())
    }
}
