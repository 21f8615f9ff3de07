//! The bwt module implements the Burrows-Wheeler transform for BZZ.
//!
//! BZZ is a block-oriented approach to compress data. The transform sorts all
//! cyclic rotations of a sentinel-terminated block and emits the last column
//! of the sorted rotation matrix plus the marker row needed to invert it.
//!
//! The transform is:
//! - block_sort: order every rotation of the block (the hard part).
//! - bwt_encode: emit the last column and the marker row.
//! - bwt_decode: rebuild the block from the column with a counting-sort walk.
//!
pub mod block_sort;

pub use block_sort::sort_rotations;

/// Burrows-Wheeler transform. Appends the sentinel to `data`, sorts the
/// rotations and emits the last column of the sorted rotation matrix.
/// Returns the marker row and the column; the column is one byte longer than
/// the input, and the byte at the marker row stands in for the sentinel.
pub fn bwt_encode(data: &[u8]) -> (u32, Vec<u8>) {
    let mut block = Vec::with_capacity(data.len() + 1);
    block.extend_from_slice(data);
    block.push(0);
    let size = block.len();

    let (posn, _rank) = sort_rotations(&block);

    let mut column = vec![0_u8; size];
    let mut marker = 0_u32;
    for i in 0..size {
        let j = posn[i] as usize;
        if j > 0 {
            column[i] = block[j - 1];
        } else {
            column[i] = 0;
            marker = i as u32;
        }
    }
    (marker, column)
}

/// Decode a Burrows-Wheeler transform in place.
///
/// `block` holds the decoded column on entry; on success its first `len - 1`
/// bytes hold the reconstructed data (the final byte is dead). `scratch` is
/// reused between calls and only grows.
///
/// Buckets every column row by byte value, tagging each row with its
/// occurrence index inside the row's byte bucket, then walks backward from
/// the sentinel row emitting predecessors. Returns false when the walk does
/// not come back to the marker row, which means the column was corrupt.
pub fn bwt_decode(block: &mut [u8], marker: usize, scratch: &mut Vec<u32>) -> bool {
    let size = block.len();
    if marker < 1 || marker >= size {
        return false;
    }
    if scratch.len() < size {
        scratch.resize(size, 0);
    }

    // Tag rows with byte and occurrence rank; the marker row takes no tag.
    let mut count = [0_u32; 256];
    for i in 0..size {
        if i == marker {
            scratch[i] = 0;
            continue;
        }
        let c = block[i] as usize;
        scratch[i] = ((c as u32) << 24) | (count[c] & 0x00FF_FFFF);
        count[c] += 1;
    }

    // Cumulative bucket starts. Row 0 is the sentinel row, so starts are
    // offset by one.
    let mut last = 1_u32;
    for c in count.iter_mut() {
        let n = *c;
        *c = last;
        last += n;
    }

    // Walk backward from the top row, emitting from the end of the block.
    let mut i = 0_usize;
    let mut out_pos = size - 1;
    while out_pos > 0 {
        let tag = scratch[i];
        let c = (tag >> 24) as u8;
        out_pos -= 1;
        block[out_pos] = c;
        i = (count[c as usize] + (tag & 0x00FF_FFFF)) as usize;
        if i >= size {
            return false;
        }
    }
    i == marker
}
