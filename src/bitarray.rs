//! Bit-packed frame buffer
//!
//! A fixed-size `Vec<u8>` addressed by linear bit index. Bits are packed
//! little-endian inside each byte: bit `i` lives in byte `i / 8` under the
//! mask `1 << (i % 8)`.

use crate::error::Error;

const BYTE_SIZE: usize = 8;

/// Byte backed bit vector, all bits start cleared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitArray {
    bytes: Vec<u8>,
}

impl BitArray {
    /// Allocate a zeroed array of `capacity_bits` bits.
    ///
    /// The capacity must be a multiple of 8, otherwise [`Error::InvalidSize`]
    /// is returned. This is the only allocation the array ever makes.
    pub fn new(capacity_bits: usize) -> Result<Self, Error> {
        if capacity_bits % BYTE_SIZE != 0 {
            return Err(Error::InvalidSize);
        }

        Ok(BitArray {
            bytes: vec![0; capacity_bits / BYTE_SIZE],
        })
    }

    /// Capacity in bits
    pub fn len(&self) -> usize {
        self.bytes.len() * BYTE_SIZE
    }

    /// True for a zero capacity array
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Set a single bit on or off, leaving every other bit untouched
    pub fn set_bit(&mut self, index: usize, on: bool) -> Result<(), Error> {
        let (byte, mask) = Self::locate(index);
        let byte = self.bytes.get_mut(byte).ok_or(Error::InvalidIndex)?;

        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }

        Ok(())
    }

    /// Read a single bit
    pub fn bit(&self, index: usize) -> Result<bool, Error> {
        let (byte, mask) = Self::locate(index);
        let byte = self.bytes.get(byte).ok_or(Error::InvalidIndex)?;
        Ok(byte & mask != 0)
    }

    /// Set every bit on or off
    pub fn fill(&mut self, on: bool) {
        let value = if on { 0xFF } else { 0x00 };
        self.bytes.fill(value);
    }

    /// The packed bytes, `len() / 8` of them
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn locate(index: usize) -> (usize, u8) {
        (index / BYTE_SIZE, 1 << (index % BYTE_SIZE))
    }
}
