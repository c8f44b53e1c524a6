//! Entity delta encoding/decoding and packet-entity streams.

use bitstream::MsgBuffer;
use schema::{FieldDef, FieldGroup};
use tracing::debug;
use wire::{encode_entity_terminator, EntityBits, EntityHeader, EntityMsgFlags};

use crate::config::CodecConfig;
use crate::delta::{compute_mask, read_fields, trace_delta, write_fields, Direction};
use crate::error::{CodecError, CodecResult, LimitKind};
use crate::fields::ENTITY_SCHEMA;
use crate::types::PackedEntity;

/// One decoded entry of an entity delta stream.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EntityDelta {
    /// The entity changed or appeared. `state` is the full reconstructed record.
    Update {
        bits: EntityBits,
        state: PackedEntity,
    },
    /// The entity left the snapshot.
    Remove { number: u16 },
}

impl EntityDelta {
    #[must_use]
    pub const fn number(&self) -> u16 {
        match self {
            Self::Update { state, .. } => state.number,
            Self::Remove { number } => *number,
        }
    }
}

/// Counts from one [`write_packet_entities`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacketEntityStats {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl PacketEntityStats {
    /// Number of deltas written, terminator excluded.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.added + self.updated + self.removed
    }
}

const OLD_ORIGIN_BIT: u32 = EntityBits::OLD_ORIGIN.trailing_zeros();

/// Field routing for one set of entity flags.
///
/// `FIRSTPERSON` drops the view-entity group. `BEAMORIGIN` carries the old
/// origin under the `ORIGIN` bit.
fn entity_route(flags: EntityMsgFlags) -> impl Fn(&FieldDef<PackedEntity>) -> Option<u32> {
    move |field: &FieldDef<PackedEntity>| {
        if flags.is_first_person() && field.group == FieldGroup::ViewEntity {
            return None;
        }
        if flags.is_beam_origin() && field.bit == OLD_ORIGIN_BIT {
            return Some(EntityBits::ORIGIN);
        }
        Some(field.mask())
    }
}

/// Change mask [`write_delta_entity`] would produce, without writing anything.
#[must_use]
pub fn entity_delta_bits(
    from: &PackedEntity,
    to: &PackedEntity,
    flags: EntityMsgFlags,
) -> EntityBits {
    let route = entity_route(flags);
    EntityBits::from_raw(compute_mask(
        &ENTITY_SCHEMA,
        from,
        to,
        flags.writes_all(),
        &route,
    ))
}

/// Writes the delta from `from` to `to`.
///
/// With `to = None` a removal of `from.number` is written. Otherwise the
/// header carries `to.number` and is always written, even when nothing
/// changed; stream writers skip unchanged entities themselves.
pub fn write_delta_entity<B>(
    msg: &mut MsgBuffer<B>,
    from: &PackedEntity,
    to: Option<&PackedEntity>,
    flags: EntityMsgFlags,
    config: &CodecConfig,
) -> CodecResult<EntityBits>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let number_bits = config.limits.entity_number_bits;
    let Some(to) = to else {
        let bits = EntityBits::from_raw(EntityBits::REMOVE);
        EntityHeader::new(from.number, bits).encode(msg, number_bits)?;
        trace_delta(&ENTITY_SCHEMA, Direction::Write, from.number.into(), bits.raw());
        return Ok(bits);
    };

    let route = entity_route(flags);
    let bits = EntityBits::from_raw(compute_mask(
        &ENTITY_SCHEMA,
        from,
        to,
        flags.writes_all(),
        &route,
    ));
    EntityHeader::new(to.number, bits).encode(msg, number_bits)?;
    write_fields(
        msg,
        &ENTITY_SCHEMA,
        config.protocol,
        from,
        to,
        bits.raw(),
        &route,
    )?;
    trace_delta(&ENTITY_SCHEMA, Direction::Write, to.number.into(), bits.raw());
    Ok(bits)
}

/// Reads the next entity header, or `None` at the stream terminator.
pub fn read_entity_header<B>(
    msg: &mut MsgBuffer<B>,
    config: &CodecConfig,
) -> CodecResult<Option<EntityHeader>>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    Ok(EntityHeader::decode(msg, config.limits.entity_number_bits)?)
}

/// Reads the fields announced by `header` on top of `from`.
///
/// `flags` must match the flags the writer used.
pub fn read_delta_entity<B>(
    msg: &mut MsgBuffer<B>,
    from: &PackedEntity,
    header: EntityHeader,
    flags: EntityMsgFlags,
    config: &CodecConfig,
) -> CodecResult<EntityDelta>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    if header.bits.is_removal() {
        trace_delta(
            &ENTITY_SCHEMA,
            Direction::Read,
            header.number.into(),
            header.bits.raw(),
        );
        return Ok(EntityDelta::Remove {
            number: header.number,
        });
    }
    let state = read_entity_fields(msg, from, header, flags, config)?;
    Ok(EntityDelta::Update {
        bits: header.bits,
        state,
    })
}

fn read_entity_fields<B>(
    msg: &mut MsgBuffer<B>,
    from: &PackedEntity,
    header: EntityHeader,
    flags: EntityMsgFlags,
    config: &CodecConfig,
) -> CodecResult<PackedEntity>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let route = entity_route(flags);
    let mut state = read_fields(
        msg,
        &ENTITY_SCHEMA,
        config.protocol,
        from,
        header.bits.raw(),
        &route,
    )?;
    state.number = header.number;
    trace_delta(
        &ENTITY_SCHEMA,
        Direction::Read,
        header.number.into(),
        header.bits.raw(),
    );
    Ok(state)
}

/// Ends an entity stream.
pub fn write_entity_stream_end<B>(msg: &mut MsgBuffer<B>, config: &CodecConfig) -> CodecResult<()>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    encode_entity_terminator(msg, config.limits.entity_number_bits)?;
    Ok(())
}

/// Reads a raw entity stream up to its terminator.
///
/// Every update is decoded against the null state, so this suits streams
/// written against null baselines and inspection tooling.
pub fn read_entity_deltas<B>(
    msg: &mut MsgBuffer<B>,
    config: &CodecConfig,
) -> CodecResult<Vec<EntityDelta>>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let limit = config.limits.max_packet_entities;
    let mut deltas = Vec::new();
    while let Some(header) = read_entity_header(msg, config)? {
        if deltas.len() >= limit {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::PacketEntities,
                limit,
                actual: deltas.len() + 1,
            });
        }
        let from = PackedEntity::null(header.number);
        deltas.push(read_delta_entity(
            msg,
            &from,
            header,
            EntityMsgFlags::empty(),
            config,
        )?);
    }
    Ok(deltas)
}

/// Writes the stream that turns the `old` entity list into `new`.
///
/// Both lists must be sorted by strictly ascending number. Entities in both
/// lists are delta-coded and skipped when unchanged; entities only in `new`
/// are written in full against the null state; entities only in `old` are
/// removed. The stream is terminated.
pub fn write_packet_entities<B>(
    msg: &mut MsgBuffer<B>,
    old: &[PackedEntity],
    new: &[PackedEntity],
    config: &CodecConfig,
) -> CodecResult<PacketEntityStats>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    check_order(old)?;
    check_order(new)?;
    let limit = config.limits.max_packet_entities;
    let headers = diff_counts(old, new).written();
    if headers > limit {
        return Err(CodecError::LimitsExceeded {
            kind: LimitKind::PacketEntities,
            limit,
            actual: headers,
        });
    }

    let mut stats = PacketEntityStats::default();
    let mut i = 0;
    let mut j = 0;
    while i < old.len() || j < new.len() {
        match (old.get(i), new.get(j)) {
            (Some(before), Some(after)) if before.number == after.number => {
                let flags = EntityMsgFlags::empty();
                if entity_delta_bits(before, after, flags).is_empty() {
                    stats.unchanged += 1;
                } else {
                    write_delta_entity(msg, before, Some(after), flags, config)?;
                    stats.updated += 1;
                }
                i += 1;
                j += 1;
            }
            (Some(before), Some(after)) if after.number < before.number => {
                write_new_entity(msg, after, config)?;
                stats.added += 1;
                j += 1;
            }
            (Some(before), _) => {
                write_delta_entity(msg, before, None, EntityMsgFlags::empty(), config)?;
                stats.removed += 1;
                i += 1;
            }
            (None, Some(after)) => {
                write_new_entity(msg, after, config)?;
                stats.added += 1;
                j += 1;
            }
            (None, None) => break,
        }
    }
    write_entity_stream_end(msg, config)?;
    debug!(
        target: "qdelta::packet",
        added = stats.added,
        updated = stats.updated,
        removed = stats.removed,
        unchanged = stats.unchanged,
        "packet entities written"
    );
    Ok(stats)
}

/// Classifies the merge of `old` into `new` without writing anything.
///
/// Every added, updated or removed entity costs one header on the wire,
/// which is what readers count against `max_packet_entities`.
fn diff_counts(old: &[PackedEntity], new: &[PackedEntity]) -> PacketEntityStats {
    let mut stats = PacketEntityStats::default();
    let mut i = 0;
    let mut j = 0;
    while i < old.len() || j < new.len() {
        match (old.get(i), new.get(j)) {
            (Some(before), Some(after)) if before.number == after.number => {
                if entity_delta_bits(before, after, EntityMsgFlags::empty()).is_empty() {
                    stats.unchanged += 1;
                } else {
                    stats.updated += 1;
                }
                i += 1;
                j += 1;
            }
            (Some(before), Some(after)) if after.number < before.number => {
                stats.added += 1;
                j += 1;
            }
            (Some(_), _) => {
                stats.removed += 1;
                i += 1;
            }
            (None, Some(_)) => {
                stats.added += 1;
                j += 1;
            }
            (None, None) => break,
        }
    }
    stats
}

fn write_new_entity<B>(
    msg: &mut MsgBuffer<B>,
    entity: &PackedEntity,
    config: &CodecConfig,
) -> CodecResult<EntityBits>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let baseline = PackedEntity::null(entity.number);
    write_delta_entity(
        msg,
        &baseline,
        Some(entity),
        EntityMsgFlags::empty().with(EntityMsgFlags::NEWENTITY),
        config,
    )
}

/// Applies an entity stream to the `old` list and returns the new sorted list.
///
/// Entities the stream does not mention carry over unchanged.
pub fn read_packet_entities<B>(
    msg: &mut MsgBuffer<B>,
    old: &[PackedEntity],
    config: &CodecConfig,
) -> CodecResult<Vec<PackedEntity>>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    check_order(old)?;
    let limit = config.limits.max_packet_entities;
    let mut out = Vec::with_capacity(old.len());
    let mut i = 0;
    let mut previous: Option<u16> = None;
    let mut count = 0usize;

    while let Some(header) = read_entity_header(msg, config)? {
        if let Some(previous) = previous {
            if header.number <= previous {
                return Err(CodecError::InvalidEntityOrder {
                    previous,
                    current: header.number,
                });
            }
        }
        previous = Some(header.number);
        count += 1;
        if count > limit {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::PacketEntities,
                limit,
                actual: count,
            });
        }

        while let Some(entity) = old.get(i) {
            if entity.number >= header.number {
                break;
            }
            out.push(*entity);
            i += 1;
        }
        let baseline = match old.get(i) {
            Some(entity) if entity.number == header.number => {
                i += 1;
                Some(entity)
            }
            _ => None,
        };

        match (baseline, header.bits.is_removal()) {
            (Some(_), true) => {
                trace_delta(
                    &ENTITY_SCHEMA,
                    Direction::Read,
                    header.number.into(),
                    header.bits.raw(),
                );
            }
            (None, true) => {
                return Err(CodecError::UnknownEntity {
                    number: header.number,
                });
            }
            (Some(from), false) => {
                out.push(read_entity_fields(
                    msg,
                    from,
                    header,
                    EntityMsgFlags::empty(),
                    config,
                )?);
            }
            (None, false) => {
                let from = PackedEntity::null(header.number);
                out.push(read_entity_fields(
                    msg,
                    &from,
                    header,
                    EntityMsgFlags::empty(),
                    config,
                )?);
            }
        }
    }
    out.extend(old.iter().skip(i).copied());
    Ok(out)
}

fn check_order(entities: &[PackedEntity]) -> CodecResult<()> {
    for pair in entities.windows(2) {
        if let [previous, current] = pair {
            if current.number <= previous.number {
                return Err(CodecError::InvalidEntityOrder {
                    previous: previous.number,
                    current: current.number,
                });
            }
        }
    }
    Ok(())
}
