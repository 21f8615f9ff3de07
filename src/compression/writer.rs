//! BzzWriter: block-buffered encoding onto a BZZ stream.

use std::io;
use std::io::Write;

use log::{debug, trace};

use super::mtf::{encode_rank, MtfState, MARKER_RANK, NUM_CONTEXTS};
use super::{MAX_BLOCK, MIN_BLOCK};
use crate::bwt::bwt_encode;
use crate::zcoder::{BitContext, ZEncoder};

/// Block sizes below this get the fastest frequency decay.
const FREQS0: usize = 100_000;

/// Block sizes below this get the middle frequency decay.
const FREQS1: usize = 1_000_000;

/// Compresses bytes onto a BZZ stream. Input is buffered into blocks of the
/// configured size; each full block is transformed and coded on its own, and
/// `finish` codes whatever remains plus the end-of-stream header.
pub struct BzzWriter<W: Write> {
    zp: Option<ZEncoder<W>>,
    /// Adaptive contexts, shared by every block of the stream.
    contexts: Vec<BitContext>,
    buffer: Vec<u8>,
    block_size: usize,
}

impl<W: Write> BzzWriter<W> {
    /// Create a writer encoding onto the sink. `block_size` is in bytes and
    /// is clamped to the legal range. The coded block size includes the
    /// sentinel slot, so content blocks stay one byte under the maximum.
    pub fn new(writer: W, block_size: usize) -> Self {
        let block_size = block_size.clamp(MIN_BLOCK, MAX_BLOCK - 1);
        Self {
            zp: Some(ZEncoder::new(writer)),
            contexts: vec![BitContext::new(); NUM_CONTEXTS],
            buffer: Vec::with_capacity(block_size),
            block_size,
        }
    }

    /// Transform and code the buffered block.
    fn encode_block(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let zp = match self.zp.as_mut() {
            Some(zp) => zp,
            None => return Ok(()),
        };

        let (marker, column) = bwt_encode(&self.buffer);
        let size = column.len();
        self.buffer.clear();
        trace!("Encoding a block of {} bytes, marker row {}.", size, marker);

        // Header: raw 24-bit size, then the frequency decay speed.
        zp.encode_raw(24, size as u32)?;
        let fshift = if size < FREQS0 {
            zp.encode_passthrough(false)?;
            0
        } else if size < FREQS1 {
            zp.encode_passthrough(true)?;
            zp.encode_passthrough(false)?;
            1
        } else {
            zp.encode_passthrough(true)?;
            zp.encode_passthrough(true)?;
            2
        };

        // Code the column as MTF ranks; the marker row codes as rank 256.
        let mut mtf = MtfState::new(fshift);
        let mut prev_rank = 3_usize;
        for (i, &byte) in column.iter().enumerate() {
            if i as u32 == marker {
                encode_rank(zp, &mut self.contexts, prev_rank, MARKER_RANK)?;
                prev_rank = MARKER_RANK;
            } else {
                let rank = mtf.rank_of(byte);
                encode_rank(zp, &mut self.contexts, prev_rank, rank)?;
                mtf.rotate(rank);
                prev_rank = rank;
            }
        }
        Ok(())
    }

    fn finish_inner(&mut self) -> io::Result<Option<W>> {
        self.encode_block()?;
        match self.zp.take() {
            Some(mut zp) => {
                // A zero-size header terminates the stream.
                zp.encode_raw(24, 0)?;
                debug!("Wrote end of stream header.");
                zp.finish().map(Some)
            }
            None => Ok(None),
        }
    }

    /// Code any buffered data, terminate the stream and return the sink.
    pub fn finish(mut self) -> io::Result<W> {
        match self.finish_inner()? {
            Some(writer) => Ok(writer),
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                "stream already finished",
            )),
        }
    }
}

impl<W: Write> Write for BzzWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut written = 0;
        while written < buf.len() {
            let room = self.block_size - self.buffer.len();
            let take = (buf.len() - written).min(room);
            self.buffer.extend_from_slice(&buf[written..written + take]);
            written += take;
            if self.buffer.len() == self.block_size {
                self.encode_block()?;
            }
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        // Emits the pending data as a short block so it reaches the sink.
        self.encode_block()
    }
}

impl<W: Write> Drop for BzzWriter<W> {
    fn drop(&mut self) {
        if self.zp.is_some() {
            let _ = self.finish_inner();
        }
    }
}
