//! Sentinel constants shared across the disassembly search.

/// Above this magnitude a coordinate is treated as "this piece has been
/// removed from the assembly" rather than as a real position. Grounded on
/// `node0_c::is_piece_removed`'s `abs(dx[nr]) > 10000` check.
pub const REMOVED_THRESHOLD: i32 = 10_000;

/// Re-exported so callers of this crate don't also need to depend on
/// `geometry` just to compare against the unreachable-gap sentinel.
pub const INFINITY: i32 = geometry::INFINITY;

const _: () = assert!(INFINITY == geometry::INFINITY);
