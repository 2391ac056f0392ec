//! Fixed-stride repeating groups (DTC lists, calibration entries, timers, ...).
use alloc::vec::Vec;

/// Walk `payload` in `stride`-byte windows and decode the windows accepted by `keep`.
///
/// An incomplete trailing window is dropped; some modules pad the last
/// transport packet with filler. A `stride` of zero yields nothing.
pub fn decode_groups<R>(
    payload: &[u8],
    stride: usize,
    keep: impl Fn(&[u8]) -> bool,
    decode: impl Fn(&[u8]) -> R,
) -> Vec<R> {
    if stride == 0 {
        return Vec::new();
    }
    payload
        .chunks_exact(stride)
        .filter(|window| keep(*window))
        .map(decode)
        .collect()
}

/// Keep every window.
pub fn any_window(_window: &[u8]) -> bool {
    true
}

/// Reject windows made only of `0xFF` filler.
pub fn not_all_ff(window: &[u8]) -> bool {
    !window.iter().all(|byte| *byte == 0xFF)
}

/// Reject windows made only of `0x00` or only of `0xFF`.
pub fn not_padding(window: &[u8]) -> bool {
    not_all_ff(window) && !window.iter().all(|byte| *byte == 0x00)
}
