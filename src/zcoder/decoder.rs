//! ZDecoder: the decode half of the binary range coder.
//!
//! NOTE: This module can read from any I/O source that supports the read() call.
//! An exhausted source reads as zero bytes, which lets a cleanly terminated
//! stream decode its end-of-stream header without special casing.

use std::io;

use super::context::{BitContext, PROB_BITS};

const BUFFER_SIZE: usize = 1024 * 1024;

/// Renormalization threshold. The range is kept at or above 2^24 so that the
/// probability split always has at least 13 bits of precision.
const TOP: u32 = 1 << 24;

/// Decodes a binary range-coded stream (with a 1Mbyte input buffer).
#[derive(Debug)]
pub struct ZDecoder<R> {
    buffer: Vec<u8>,
    cursor: usize,
    source: R,
    exhausted: bool,
    code: u32,
    range: u32,
}

impl<R: io::Read> ZDecoder<R> {
    /// Create a new decoder over the source. Primes the coder by consuming the
    /// five leading bytes the encoder emits before any payload.
    pub fn new(source: R) -> io::Result<Self> {
        let mut decoder = Self {
            buffer: Vec::new(),
            cursor: 0,
            source,
            exhausted: false,
            code: 0,
            range: 0xFFFF_FFFF,
        };
        // The first output byte of the encoder is always its empty cache.
        decoder.next_byte()?;
        for _ in 0..4 {
            decoder.code = (decoder.code << 8) | decoder.next_byte()? as u32;
        }
        Ok(decoder)
    }

    /// Return the next byte of the underlying stream, refilling the internal
    /// buffer as needed. Returns 0 once the source is exhausted.
    fn next_byte(&mut self) -> io::Result<u8> {
        if self.cursor == self.buffer.len() {
            if self.exhausted {
                return Ok(0);
            }
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = self.source.read(&mut self.buffer)?;
            self.buffer.truncate(size);
            self.cursor = 0;
            if size == 0 {
                self.exhausted = true;
                return Ok(0);
            }
        }
        let byte = self.buffer[self.cursor];
        self.cursor += 1;
        Ok(byte)
    }

    /// Pull another byte into the low end of the code once the range shrinks
    /// below the renormalization threshold.
    fn normalize(&mut self) -> io::Result<()> {
        if self.range < TOP {
            self.range <<= 8;
            self.code = (self.code << 8) | self.next_byte()? as u32;
        }
        Ok(())
    }

    /// Decode one bit against an adaptive context.
    pub fn decode_bit(&mut self, ctx: &mut BitContext) -> io::Result<bool> {
        let bound = (self.range >> PROB_BITS) * ctx.prob() as u32;
        let bit = if self.code < bound {
            self.range = bound;
            ctx.update_zero();
            false
        } else {
            self.code -= bound;
            self.range -= bound;
            ctx.update_one();
            true
        };
        self.normalize()?;
        Ok(bit)
    }

    /// Decode one bit with no model (both values equally likely).
    pub fn decode_passthrough(&mut self) -> io::Result<bool> {
        self.range >>= 1;
        let bit = if self.code >= self.range {
            self.code -= self.range;
            true
        } else {
            false
        };
        self.normalize()?;
        Ok(bit)
    }

    /// Decode an unmodeled integer of the given bit width, most significant
    /// bit first.
    pub fn decode_raw(&mut self, bits: u32) -> io::Result<u32> {
        let mut n = 1_u32;
        let m = 1_u32 << bits;
        while n < m {
            n = (n << 1) | self.decode_passthrough()? as u32;
        }
        Ok(n - m)
    }
}

#[cfg(test)]
mod test {
    use super::super::encoder::ZEncoder;
    use super::*;

    #[test]
    fn context_bit_round_trip() {
        // A bit pattern with enough structure to move the contexts around.
        let bits: Vec<bool> = (0..500_u32).map(|i| (i * i) % 7 < 3).collect();

        let mut contexts = [BitContext::new(); 4];
        let mut enc = ZEncoder::new(Vec::new());
        for (i, &b) in bits.iter().enumerate() {
            enc.encode_bit(&mut contexts[i % 4], b).unwrap();
        }
        let stream = enc.finish().unwrap();

        let mut contexts = [BitContext::new(); 4];
        let mut dec = ZDecoder::new(stream.as_slice()).unwrap();
        for (i, &b) in bits.iter().enumerate() {
            assert_eq!(dec.decode_bit(&mut contexts[i % 4]).unwrap(), b);
        }
    }

    #[test]
    fn passthrough_round_trip() {
        let bits: Vec<bool> = (0..300_u32).map(|i| i % 3 == 1).collect();

        let mut enc = ZEncoder::new(Vec::new());
        for &b in &bits {
            enc.encode_passthrough(b).unwrap();
        }
        let stream = enc.finish().unwrap();

        let mut dec = ZDecoder::new(stream.as_slice()).unwrap();
        for &b in &bits {
            assert_eq!(dec.decode_passthrough().unwrap(), b);
        }
    }

    #[test]
    fn raw_int_round_trip() {
        let values = [0_u32, 1, 10, 255, 4096, 0xFF_FFFF, 123_456];

        let mut enc = ZEncoder::new(Vec::new());
        for &v in &values {
            enc.encode_raw(24, v).unwrap();
        }
        let stream = enc.finish().unwrap();

        let mut dec = ZDecoder::new(stream.as_slice()).unwrap();
        for &v in &values {
            assert_eq!(dec.decode_raw(24).unwrap(), v);
        }
    }

    #[test]
    fn mixed_operations_round_trip() {
        let mut contexts = [BitContext::new(); 2];
        let mut enc = ZEncoder::new(Vec::new());
        enc.encode_raw(24, 77).unwrap();
        enc.encode_passthrough(true).unwrap();
        for i in 0..64 {
            enc.encode_bit(&mut contexts[i % 2], i % 5 == 0).unwrap();
        }
        enc.encode_raw(24, 0).unwrap();
        let stream = enc.finish().unwrap();

        let mut contexts = [BitContext::new(); 2];
        let mut dec = ZDecoder::new(stream.as_slice()).unwrap();
        assert_eq!(dec.decode_raw(24).unwrap(), 77);
        assert!(dec.decode_passthrough().unwrap());
        for i in 0..64 {
            assert_eq!(dec.decode_bit(&mut contexts[i % 2]).unwrap(), i % 5 == 0);
        }
        assert_eq!(dec.decode_raw(24).unwrap(), 0);
    }

    #[test]
    fn exhausted_source_reads_zero() {
        // An empty stream must prime cleanly and decode a zero header.
        let empty: &[u8] = &[];
        let mut dec = ZDecoder::new(empty).unwrap();
        assert_eq!(dec.decode_raw(24).unwrap(), 0);
    }
}
