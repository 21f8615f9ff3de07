//! BzzReader: pull-based decoding of a BZZ stream, one block at a time.

use std::io;
use std::io::Read;

use log::{debug, trace, warn};

use super::mtf::{decode_rank, MtfState, MARKER_RANK, NUM_CONTEXTS};
use super::MAX_BLOCK;
use crate::bwt::bwt_decode;
use crate::zcoder::{BitContext, ZDecoder};

/// Reads decompressed bytes out of a BZZ stream. Blocks are decoded lazily,
/// one at a time, whenever the internal buffer runs dry.
///
/// A damaged stream is not an error: decoding stops at the damage and the
/// reader reports end of file, so a truncated stream reads like a short one.
pub struct BzzReader<R> {
    zp: ZDecoder<R>,
    /// Adaptive contexts, shared by every block of the stream.
    contexts: Vec<BitContext>,
    /// Current decoded block; grows only when a block outsizes it.
    block: Vec<u8>,
    /// Inverse-transform scratch, reused across blocks.
    scratch: Vec<u32>,
    bptr: usize,
    remaining: usize,
    offset: u64,
    eof: bool,
}

impl<R: Read> BzzReader<R> {
    /// Create a reader decoding the given source.
    pub fn new(source: R) -> io::Result<Self> {
        Ok(Self {
            zp: ZDecoder::new(source)?,
            contexts: vec![BitContext::new(); NUM_CONTEXTS],
            block: Vec::new(),
            scratch: Vec::new(),
            bptr: 0,
            remaining: 0,
            offset: 0,
            eof: false,
        })
    }

    /// Total number of decompressed bytes produced so far.
    pub fn tell(&self) -> u64 {
        self.offset
    }

    /// Decode the next block into the internal buffer. Returns the block size
    /// including the sentinel slot, or 0 at end of stream or on corruption.
    fn decode_block(&mut self) -> io::Result<usize> {
        // Header: raw 24-bit size, then one or two speed bits.
        let size = self.zp.decode_raw(24)? as usize;
        if size == 0 {
            debug!("End of stream header.");
            return Ok(0);
        }
        if size > MAX_BLOCK {
            warn!(
                "Block header declares {} bytes, over the {} maximum. Stopping.",
                size, MAX_BLOCK
            );
            return Ok(0);
        }
        let mut fshift = 0;
        if self.zp.decode_passthrough()? {
            fshift += 1;
            if self.zp.decode_passthrough()? {
                fshift += 1;
            }
        }

        if self.block.len() < size {
            self.block.resize(size, 0);
        }

        // Decode the MTF-coded column.
        let mut mtf = MtfState::new(fshift);
        let mut prev_rank = 3_usize;
        let mut marker = None;
        for i in 0..size {
            match decode_rank(&mut self.zp, &mut self.contexts, prev_rank)? {
                Some(rank) => {
                    self.block[i] = mtf.rotate(rank);
                    prev_rank = rank;
                }
                None => {
                    self.block[i] = 0;
                    marker = Some(i);
                    prev_rank = MARKER_RANK;
                }
            }
        }

        let marker = match marker {
            Some(m) if m >= 1 && m < size => m,
            Some(m) => {
                warn!("Marker row {} is outside the block. Stopping.", m);
                return Ok(0);
            }
            None => {
                warn!("Block of {} bytes carried no marker row. Stopping.", size);
                return Ok(0);
            }
        };

        if !bwt_decode(&mut self.block[..size], marker, &mut self.scratch) {
            warn!("Block reconstruction did not return to the marker row. Stopping.");
            return Ok(0);
        }
        trace!("Decoded a block of {} bytes, marker row {}.", size, marker);

        self.bptr = 0;
        self.remaining = size - 1;
        Ok(size)
    }
}

impl<R: Read> Read for BzzReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.eof {
            return Ok(0);
        }
        let mut copied = 0;
        while copied < buf.len() {
            if self.remaining == 0 {
                if self.decode_block()? == 0 {
                    self.eof = true;
                    break;
                }
                continue;
            }
            let n = self.remaining.min(buf.len() - copied);
            buf[copied..copied + n].copy_from_slice(&self.block[self.bptr..self.bptr + n]);
            self.bptr += n;
            self.remaining -= n;
            copied += n;
            self.offset += n as u64;
        }
        Ok(copied)
    }
}

#[cfg(test)]
mod test {
    use super::super::writer::BzzWriter;
    use super::*;
    use std::io::Write;

    fn compress(data: &[u8], block_size: usize) -> Vec<u8> {
        let mut writer = BzzWriter::new(Vec::new(), block_size);
        writer.write_all(data).unwrap();
        writer.finish().unwrap()
    }

    fn decompress(stream: &[u8]) -> Vec<u8> {
        let mut reader = BzzReader::new(stream).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        out
    }

    fn xorshift_bytes(count: usize, mut seed: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            out.push((seed >> 9) as u8);
        }
        out
    }

    #[test]
    fn single_block_round_trip() {
        let data = b"If Peter Piper picked a peck of pickled peppers, \
                     where's the peck of pickled peppers Peter Piper picked?";
        let stream = compress(data, 4096);
        assert_eq!(decompress(&stream), data);
    }

    #[test]
    fn multi_block_round_trip() {
        let data = xorshift_bytes(5000, 0x1234_5678);
        // 64 byte blocks force many blocks through the shared contexts.
        let stream = compress(&data, 64);
        assert_eq!(decompress(&stream), data);
    }

    #[test]
    fn repetitive_data_round_trip() {
        let data: Vec<u8> = b"compress ".iter().copied().cycle().take(20_000).collect();
        let stream = compress(&data, 8192);
        assert_eq!(decompress(&stream), data);
        // Repetitive text should actually compress.
        assert!(stream.len() < data.len() / 2);
    }

    #[test]
    fn all_equal_round_trip() {
        let data = vec![b'x'; 30_000];
        let stream = compress(&data, MAX_BLOCK);
        assert_eq!(decompress(&stream), data);
    }

    #[test]
    fn content_zeros_round_trip() {
        let mut data = vec![0_u8; 3000];
        for (i, b) in data.iter_mut().enumerate() {
            if i % 7 == 0 {
                *b = b'q';
            }
        }
        let stream = compress(&data, 1024);
        assert_eq!(decompress(&stream), data);
    }

    #[test]
    fn wide_block_round_trip() {
        // Over the radix threshold, so the pair radix pass is exercised.
        let data = xorshift_bytes(40_000, 0xCAFE_F00D);
        let stream = compress(&data, MAX_BLOCK);
        assert_eq!(decompress(&stream), data);
    }

    #[test]
    fn minimum_block_round_trip() {
        let data = b"0123456789";
        let stream = compress(data, 10);
        assert_eq!(decompress(&stream), data);
    }

    #[test]
    fn empty_input_round_trip() {
        let stream = compress(b"", 1024);
        assert_eq!(decompress(&stream), b"");
    }

    #[test]
    fn tell_tracks_bytes_produced() {
        let data = xorshift_bytes(500, 42);
        let stream = compress(&data, 100);
        let mut reader = BzzReader::new(stream.as_slice()).unwrap();
        let mut buf = [0_u8; 123];
        let mut total = 0_u64;
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            total += n as u64;
            assert_eq!(reader.tell(), total);
        }
        assert_eq!(total, data.len() as u64);
    }

    #[test]
    fn oversize_header_is_soft_eof() {
        use crate::zcoder::ZEncoder;
        let mut enc = ZEncoder::new(Vec::new());
        enc.encode_raw(24, (MAX_BLOCK + 1) as u32).unwrap();
        let stream = enc.finish().unwrap();
        assert_eq!(decompress(&stream), b"");
    }

    #[test]
    fn truncated_stream_is_soft_eof() {
        let data = xorshift_bytes(4000, 0xBEEF);
        let stream = compress(&data, 512);
        // Cut the stream mid-block; decoding must stop quietly.
        let cut = &stream[..stream.len() / 2];
        let mut reader = BzzReader::new(cut).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert!(out.len() <= data.len() + MAX_BLOCK);
    }

    #[test]
    fn reads_split_across_blocks() {
        let data = xorshift_bytes(1000, 7);
        let stream = compress(&data, 64);
        let mut reader = BzzReader::new(stream.as_slice()).unwrap();
        let mut out = Vec::new();
        // Odd-sized reads never line up with block boundaries.
        let mut buf = [0_u8; 37];
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, data);
    }
}
