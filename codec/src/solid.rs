//! Bounding-box packing for the entity `solid` field.
//!
//! Boxes are assumed symmetric in x/y. The 16-bit form has 8-unit
//! granularity; the 32-bit form is exact for integral boxes.

fn clamp_trunc(value: f32, min: i32, max: i32) -> u32 {
    (value as i32).clamp(min, max) as u32
}

/// Packs a box into 5 bits of x/y half-size, 5 bits of depth and 6 bits of height.
#[must_use]
pub fn pack_solid16(mins: [f32; 3], maxs: [f32; 3]) -> u32 {
    let x = clamp_trunc(maxs[0] / 8.0, 1, 31);
    let zd = clamp_trunc(-mins[2] / 8.0, 1, 31);
    let zu = clamp_trunc((maxs[2] + 32.0) / 8.0, 1, 63);
    (zu << 10) | (zd << 5) | x
}

/// Packs a box into 8 bits of x/y half-size, 8 bits of depth and 16 bits of height.
#[must_use]
pub fn pack_solid32(mins: [f32; 3], maxs: [f32; 3]) -> u32 {
    let x = clamp_trunc(maxs[0], 1, 255);
    let zd = clamp_trunc(-mins[2], 1, 255);
    let zu = clamp_trunc(maxs[2] + 32768.0, 1, 65535);
    (zu << 16) | (zd << 8) | x
}

/// Returns `(mins, maxs)` for a 16-bit packed box.
#[must_use]
pub fn unpack_solid16(solid: u32) -> ([f32; 3], [f32; 3]) {
    let x = 8 * (solid & 31) as i32;
    let zd = 8 * ((solid >> 5) & 31) as i32;
    let zu = 8 * ((solid >> 10) & 63) as i32 - 32;
    to_box(x, zd, zu)
}

/// Returns `(mins, maxs)` for a 32-bit packed box.
#[must_use]
pub fn unpack_solid32(solid: u32) -> ([f32; 3], [f32; 3]) {
    let x = (solid & 255) as i32;
    let zd = ((solid >> 8) & 255) as i32;
    let zu = ((solid >> 16) & 65535) as i32 - 32768;
    to_box(x, zd, zu)
}

fn to_box(x: i32, zd: i32, zu: i32) -> ([f32; 3], [f32; 3]) {
    let (x, zd, zu) = (x as f32, zd as f32, zu as f32);
    ([-x, -x, -zd], [x, x, zu])
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER_MINS: [f32; 3] = [-16.0, -16.0, -24.0];
    const PLAYER_MAXS: [f32; 3] = [16.0, 16.0, 32.0];

    #[test]
    fn player_box_roundtrips_16() {
        let packed = pack_solid16(PLAYER_MINS, PLAYER_MAXS);
        assert_eq!(packed, (8 << 10) | (3 << 5) | 2);
        assert_eq!(unpack_solid16(packed), (PLAYER_MINS, PLAYER_MAXS));
    }

    #[test]
    fn player_box_roundtrips_32() {
        let packed = pack_solid32(PLAYER_MINS, PLAYER_MAXS);
        assert_eq!(unpack_solid32(packed), (PLAYER_MINS, PLAYER_MAXS));
    }

    #[test]
    fn degenerate_box_clamps_to_minimum() {
        let packed = pack_solid16([0.0; 3], [0.0; 3]);
        let (mins, maxs) = unpack_solid16(packed);
        // height stores maxs.z + 32 in 8-unit steps, so z = 0 packs as 4
        assert_eq!(packed >> 10, 4);
        assert_eq!(mins, [-8.0, -8.0, -8.0]);
        assert_eq!(maxs, [8.0, 8.0, 0.0]);
    }

    #[test]
    fn oversized_box_clamps_to_maximum() {
        let packed = pack_solid32([-1000.0; 3], [1000.0, 1000.0, 40000.0]);
        let (mins, maxs) = unpack_solid32(packed);
        assert_eq!(mins, [-255.0, -255.0, -255.0]);
        assert_eq!(maxs, [255.0, 255.0, 32767.0]);
    }
}
