//! Introspection and debugging tools for the qdelta codec.
//!
//! This crate decodes captured delta messages and reports what they carry:
//!
//! - Entity streams: one entry per delta, with named bits and the decoded record
//! - Player-state deltas: both mask words, named fields and the decoded state
//!
//! Captures are decoded against null baselines, so they are expected to be
//! the first message of a stream or a message written with forced deltas.
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what the codec is doing.

use std::fmt;

use anyhow::{Context, Result};
use codec::{
    read_entity_deltas, read_player_state_fields, read_player_state_header, CodecConfig,
    EntityDelta, PackedEntity, PlayerState, PlayerStateUpdate, ProtocolVersion, Session,
    ENTITY_SCHEMA, NULL_PLAYER_STATE, PLAYER_SCHEMA,
};
use serde::Serialize;
use tracing::{debug, warn};

const TRACE_TARGET: &str = "qdelta::tools";

/// Decoded entity stream.
#[derive(Debug, Clone, Serialize)]
pub struct EntityStreamReport {
    pub protocol: ProtocolVersion,
    pub entity_number_bits: u32,
    pub message_bytes: usize,
    pub entities: Vec<EntityEntry>,
}

/// One delta of an entity stream.
#[derive(Debug, Clone, Serialize)]
pub struct EntityEntry {
    pub number: u16,
    pub removed: bool,
    pub bits: u32,
    pub fields: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<PackedEntity>,
}

/// Decoded player-state delta.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub protocol: ProtocolVersion,
    pub message_bytes: usize,
    pub removed: bool,
    pub bits: u32,
    pub extra_bits: u32,
    pub fields: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<PlayerState>,
}

/// Decodes an entity stream up to its terminator.
pub fn inspect_entities(bytes: &[u8], config: &CodecConfig) -> Result<EntityStreamReport> {
    let mut session = Session::new(config.clone()).context("create session")?;
    let msg = session.receive(bytes).context("load message")?;
    debug!(
        target: TRACE_TARGET,
        bytes = bytes.len(),
        protocol = %config.protocol,
        "inspecting entity stream"
    );
    let deltas = read_entity_deltas(msg, config).context("decode entity stream")?;
    let trailing = msg.bits_remaining() / 8;
    if trailing > 0 {
        warn!(target: TRACE_TARGET, trailing, "bytes follow the entity stream terminator");
    }
    debug!(target: TRACE_TARGET, deltas = deltas.len(), "decoded entity stream");
    let entities = deltas
        .into_iter()
        .map(|delta| match delta {
            EntityDelta::Update { bits, state } => EntityEntry {
                number: state.number,
                removed: false,
                bits: bits.raw(),
                fields: ENTITY_SCHEMA.describe_mask(bits.raw()),
                state: Some(state),
            },
            EntityDelta::Remove { number } => EntityEntry {
                number,
                removed: true,
                bits: wire::EntityBits::REMOVE,
                fields: Vec::new(),
                state: None,
            },
        })
        .collect();
    Ok(EntityStreamReport {
        protocol: config.protocol,
        entity_number_bits: config.limits.entity_number_bits,
        message_bytes: bytes.len(),
        entities,
    })
}

/// Decodes one player-state delta.
pub fn inspect_player(bytes: &[u8], config: &CodecConfig) -> Result<PlayerReport> {
    let mut session = Session::new(config.clone()).context("create session")?;
    let msg = session.receive(bytes).context("load message")?;
    debug!(
        target: TRACE_TARGET,
        bytes = bytes.len(),
        protocol = %config.protocol,
        "inspecting player state"
    );
    let header = read_player_state_header(msg, config).context("decode player header")?;
    let mask = header.bits.raw() | (header.extra.raw() << wire::PlayerBits::WIDTH);
    let update = read_player_state_fields(msg, &NULL_PLAYER_STATE, header, config)
        .context("decode player fields")?;
    debug!(
        target: TRACE_TARGET,
        bits = header.bits.raw(),
        extra = header.extra.raw(),
        "decoded player state"
    );
    let (removed, state) = match update {
        PlayerStateUpdate::State(state) => (false, Some(state)),
        PlayerStateUpdate::Removed => (true, None),
    };
    Ok(PlayerReport {
        protocol: config.protocol,
        message_bytes: bytes.len(),
        removed,
        bits: header.bits.raw(),
        extra_bits: header.extra.raw(),
        fields: if removed {
            Vec::new()
        } else {
            PLAYER_SCHEMA.describe_mask(mask)
        },
        state,
    })
}

/// Renders an entity report as indented text.
pub fn format_entities_pretty(report: &EntityStreamReport) -> String {
    report.to_string()
}

/// Renders a player report as indented text.
pub fn format_player_pretty(report: &PlayerReport) -> String {
    report.to_string()
}

impl fmt::Display for EntityStreamReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "protocol: {} number bits: {} message: {} bytes",
            self.protocol, self.entity_number_bits, self.message_bytes
        )?;
        writeln!(f, "entities: {}", self.entities.len())?;
        for entry in &self.entities {
            if entry.removed {
                writeln!(f, "  #{} removed", entry.number)?;
                continue;
            }
            writeln!(
                f,
                "  #{} bits 0x{:04x} [{}]",
                entry.number,
                entry.bits,
                entry.fields.join(", ")
            )?;
            if let Some(state) = &entry.state {
                writeln!(
                    f,
                    "    origin {:?} angles {:?} model {} frame {}",
                    state.origin, state.angles, state.model_index, state.frame
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for PlayerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "protocol: {} message: {} bytes",
            self.protocol, self.message_bytes
        )?;
        if self.removed {
            return writeln!(f, "player state removed");
        }
        writeln!(
            f,
            "bits 0x{:04x} extra 0x{:04x} [{}]",
            self.bits,
            self.extra_bits,
            self.fields.join(", ")
        )?;
        if let Some(state) = &self.state {
            writeln!(
                f,
                "  origin {:?} velocity {:?}",
                state.pmove.origin, state.pmove.velocity
            )?;
            writeln!(
                f,
                "  view angles {:?} fov {} gun {}/{}",
                state.view_angles, state.fov, state.gun_index, state.gun_frame
            )?;
        }
        Ok(())
    }
}
