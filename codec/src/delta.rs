//! Schema-driven delta engine shared by the record codecs.
//!
//! A record codec supplies a route: for each field, the mask bit that
//! carries it in this call, or `None` when the field cannot be sent (it is
//! suppressed, or the protocol has no room for it). Mask computation,
//! encode and decode all walk the same field slice through the same route.

use bitstream::{BitResult, MsgBuffer};
use schema::{FieldDef, RecordSchema};
use tracing::{trace, warn, Level};
use wire::ProtocolVersion;

use crate::error::{CodecError, CodecResult};

/// Trace target for per-delta events.
pub const TRACE_TARGET: &str = "qdelta::delta";

/// Maps a field to the mask bit carrying it, if any.
pub(crate) type Route<'a, R> = &'a dyn Fn(&FieldDef<R>) -> Option<u32>;

/// Every field routes to its own bit.
pub(crate) fn direct<R>(field: &FieldDef<R>) -> Option<u32> {
    Some(field.mask())
}

/// Union of the bits some field routes to.
pub(crate) fn routed_mask<R: 'static>(schema: &RecordSchema<R>, route: Route<'_, R>) -> u32 {
    schema
        .fields
        .iter()
        .filter_map(route)
        .fold(0, |acc, bit| acc | bit)
}

/// Bits needed to turn `from` into `to`. With `force`, every routed bit.
pub(crate) fn compute_mask<R: 'static>(
    schema: &RecordSchema<R>,
    from: &R,
    to: &R,
    force: bool,
    route: Route<'_, R>,
) -> u32 {
    let mut mask = 0;
    for field in schema.fields {
        let Some(bit) = route(field) else {
            continue;
        };
        if force || !(field.get)(from).same_bits(&(field.get)(to)) {
            mask |= bit;
        }
    }
    mask
}

/// Writes every routed field whose bit is set in `mask`, in wire order.
pub(crate) fn write_fields<R: 'static, B>(
    msg: &mut MsgBuffer<B>,
    schema: &RecordSchema<R>,
    version: ProtocolVersion,
    from: &R,
    to: &R,
    mask: u32,
    route: Route<'_, R>,
) -> BitResult<()>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    for field in schema.fields {
        match route(field) {
            Some(bit) if mask & bit != 0 => {
                field
                    .codec
                    .write(msg, version, &(field.get)(from), &(field.get)(to))?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Reads the fields selected by `mask` on top of a copy of `from`.
///
/// Mask bits that no routed field and no control bit accounts for are
/// rejected before anything is read.
pub(crate) fn read_fields<R: Clone + 'static, B>(
    msg: &mut MsgBuffer<B>,
    schema: &RecordSchema<R>,
    version: ProtocolVersion,
    from: &R,
    mask: u32,
    route: Route<'_, R>,
) -> CodecResult<R>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let stray = mask & !(routed_mask(schema, route) | schema.control_bits);
    if stray != 0 {
        warn!(
            target: TRACE_TARGET,
            record = schema.name,
            bits = stray,
            "mask selects fields this call cannot carry"
        );
        return Err(CodecError::UnexpectedBits {
            record: schema.name,
            bits: stray,
        });
    }
    let mut to = from.clone();
    for field in schema.fields {
        match route(field) {
            Some(bit) if mask & bit != 0 => {
                let value = field.codec.read(msg, version, &(field.get)(from))?;
                (field.set)(&mut to, value);
            }
            _ => {}
        }
    }
    Ok(to)
}

/// Copies every unrouted field from `from` into `to`.
pub(crate) fn copy_unrouted<R: 'static>(
    schema: &RecordSchema<R>,
    from: &R,
    to: &mut R,
    route: Route<'_, R>,
) {
    for field in schema.fields {
        if route(field).is_none() {
            (field.set)(to, (field.get)(from));
        }
    }
}

/// Direction of a traced delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Write,
    Read,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Read => "read",
        }
    }
}

/// Emits the per-delta trace event.
pub(crate) fn trace_delta<R: 'static>(
    schema: &RecordSchema<R>,
    direction: Direction,
    number: u32,
    mask: u32,
) {
    if tracing::enabled!(target: TRACE_TARGET, Level::TRACE) {
        let fields = schema.describe_mask(mask);
        trace!(
            target: TRACE_TARGET,
            record = schema.name,
            direction = direction.as_str(),
            number = number,
            mask = mask,
            fields = ?fields,
            "delta"
        );
    }
}
