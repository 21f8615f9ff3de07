//! ZEncoder: the encode half of the binary range coder.
//!
//! Carries are resolved the classic way: the byte below the active window is
//! cached, and a run of 0xFF bytes is held back until a non-0xFF byte (or a
//! carry) settles their final value.

use std::io;
use std::io::Write;

use super::context::{BitContext, PROB_BITS};

/// Output bytes are buffered and handed to the writer in chunks.
const FLUSH_SIZE: usize = 64 * 1024;

/// Renormalization threshold, mirroring the decoder.
const TOP: u32 = 1 << 24;

/// Encodes a binary range-coded stream onto any writer.
pub struct ZEncoder<W> {
    output: Vec<u8>,
    writer: W,
    low: u64,
    range: u32,
    cache: u8,
    pending: u64,
}

impl<W: Write> ZEncoder<W> {
    /// Create a new encoder over the writer.
    pub fn new(writer: W) -> Self {
        Self {
            output: Vec::with_capacity(FLUSH_SIZE),
            writer,
            low: 0,
            range: 0xFFFF_FFFF,
            cache: 0,
            pending: 0,
        }
    }

    fn put_byte(&mut self, byte: u8) -> io::Result<()> {
        self.output.push(byte);
        if self.output.len() >= FLUSH_SIZE {
            self.writer.write_all(&self.output)?;
            self.output.clear();
        }
        Ok(())
    }

    /// Shift one settled byte out of the low end of the coding interval.
    fn shift_low(&mut self) -> io::Result<()> {
        if (self.low >> 24) != 0xFF {
            let carry = (self.low >> 32) as u8;
            let cache = self.cache;
            self.put_byte(cache.wrapping_add(carry))?;
            while self.pending > 0 {
                self.put_byte(0xFF_u8.wrapping_add(carry))?;
                self.pending -= 1;
            }
            self.cache = (self.low >> 24) as u8;
        } else {
            self.pending += 1;
        }
        self.low = (self.low & 0x00FF_FFFF) << 8;
        Ok(())
    }

    fn normalize(&mut self) -> io::Result<()> {
        if self.range < TOP {
            self.range <<= 8;
            self.shift_low()?;
        }
        Ok(())
    }

    /// Encode one bit against an adaptive context.
    pub fn encode_bit(&mut self, ctx: &mut BitContext, bit: bool) -> io::Result<()> {
        let bound = (self.range >> PROB_BITS) * ctx.prob() as u32;
        if !bit {
            self.range = bound;
            ctx.update_zero();
        } else {
            self.low += bound as u64;
            self.range -= bound;
            ctx.update_one();
        }
        self.normalize()
    }

    /// Encode one bit with no model.
    pub fn encode_passthrough(&mut self, bit: bool) -> io::Result<()> {
        self.range >>= 1;
        if bit {
            self.low += self.range as u64;
        }
        self.normalize()
    }

    /// Encode an unmodeled integer of the given bit width, most significant
    /// bit first.
    pub fn encode_raw(&mut self, bits: u32, value: u32) -> io::Result<()> {
        for shift in (0..bits).rev() {
            self.encode_passthrough((value >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    /// Flush the coding interval and the output buffer, returning the writer.
    /// Must be called exactly once; dropping an unfinished encoder loses the
    /// tail of the stream.
    pub fn finish(mut self) -> io::Result<W> {
        for _ in 0..5 {
            self.shift_low()?;
        }
        self.writer.write_all(&self.output)?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn leading_byte_is_cache() {
        // The first settled byte is always the encoder's empty cache.
        let enc = ZEncoder::new(Vec::new());
        let stream = enc.finish().unwrap();
        assert_eq!(stream.len(), 5);
        assert_eq!(stream[0], 0);
    }

    #[test]
    fn buffered_output_reaches_writer() {
        let mut enc = ZEncoder::new(Vec::new());
        for i in 0..1000_u32 {
            enc.encode_raw(16, i % 7).unwrap();
        }
        let stream = enc.finish().unwrap();
        // 16 pass-through bits per value is 2 bytes of payload each.
        assert!(stream.len() > 1000);
    }
}
