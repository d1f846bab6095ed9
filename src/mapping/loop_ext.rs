//! NETSCAPE2.0 loop sub-block: `[0x01, count_lo, count_hi]`.

use std::collections::BTreeSet;

use crate::foundation::diag::{Diagnostics, Warning};
use crate::model::animation::LoopMode;

/// Sub-block id of the loop payload.
pub const LOOP_SUB_BLOCK_ID: u8 = 0x01;

/// Largest count the 16-bit field holds.
pub const MAX_LOOP_COUNT: u32 = 0xFFFF;

/// Payload meaning "loop forever".
pub const LOOP_FOREVER_PAYLOAD: [u8; 3] = [LOOP_SUB_BLOCK_ID, 0, 0];

/// Encode a loop count. Counts outside `0..=0xFFFF` degrade to loop forever.
pub fn encode_loop_count(count: i64, diag: &mut Diagnostics) -> [u8; 3] {
    if !(0..=i64::from(MAX_LOOP_COUNT)).contains(&count) {
        diag.warn(Warning::LoopCountOutOfRange { count });
        return LOOP_FOREVER_PAYLOAD;
    }
    let count = count as u16;
    let [lo, hi] = count.to_le_bytes();
    [LOOP_SUB_BLOCK_ID, lo, hi]
}

/// Decode a loop payload; `None` when it is not a loop sub-block.
pub fn decode_loop_count(payload: &[u8]) -> Option<u32> {
    match payload {
        [LOOP_SUB_BLOCK_ID, lo, hi, ..] => Some(u32::from(*lo) | (u32::from(*hi) << 8)),
        _ => None,
    }
}

/// Pick the animation's loop mode from the counts seen across all frames.
///
/// No count means loop forever. Conflicting counts resolve to the maximum.
pub fn resolve_loop_counts(observed: &BTreeSet<u32>, diag: &mut Diagnostics) -> LoopMode {
    let count = match observed.len() {
        0 => {
            diag.warn(Warning::MissingLoopExtension);
            0
        }
        1 => observed.iter().copied().next().unwrap_or_default(),
        _ => {
            let chosen = observed.iter().copied().max().unwrap_or_default();
            diag.warn(Warning::ConflictingLoopCounts {
                observed: observed.iter().copied().collect(),
                chosen,
            });
            chosen
        }
    };
    LoopMode::from_loop_count(count)
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/loop_ext.rs"]
mod tests;
