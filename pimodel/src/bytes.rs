/*
Copyright (c) 2022 VMware, Inc.
SPDX-License-Identifier: MIT
Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Big-endian byte strings as P4Runtime carries them on the wire.

use byteorder::{BigEndian, ByteOrder};
use std::fmt::{self, Display};
use thiserror::Error;

/// Error fitting a [`ByteSequence`] into a declared bit width.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TrimError {
    /// The value has more significant bits than the declared width allows.
    #[error("value needs {bit_length} bits but only {bit_width} are available")]
    TooWide {
        /// Number of significant bits in the value.
        bit_length: usize,
        /// Declared width.
        bit_width: usize,
    },

    /// A width of zero can't hold anything, not even zero.
    #[error("bit width must be positive")]
    ZeroWidth,
}

/// An immutable big-endian byte string.
///
/// P4Runtime expects values as byte vectors in network byte order whose length is
/// `bit_width.div_ceil(8)` for the field they populate.  [`ByteSequence::fit`] produces exactly
/// that shape, and refuses to silently truncate significant bits.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteSequence(Vec<u8>);

impl ByteSequence {
    /// Wraps `bytes`, which are taken to be big-endian.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        ByteSequence(bytes)
    }

    /// Eight bytes holding `value`.
    pub fn from_u64(value: u64) -> Self {
        let mut buf = [0u8; 8];
        BigEndian::write_u64(&mut buf, value);
        ByteSequence(buf.to_vec())
    }

    /// Four bytes holding `value`.
    pub fn from_u32(value: u32) -> Self {
        let mut buf = [0u8; 4];
        BigEndian::write_u32(&mut buf, value);
        ByteSequence(buf.to_vec())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of significant bits, i.e. the position of the most significant one bit.  Zero
    /// for a sequence that is empty or all zeros.
    pub fn bit_length(&self) -> usize {
        match self.0.iter().position(|&b| b != 0) {
            None => 0,
            Some(i) => (self.0.len() - i - 1) * 8 + (8 - self.0[i].leading_zeros() as usize),
        }
    }

    /// Returns a copy of this value that is exactly `bit_width.div_ceil(8)` bytes long, padding
    /// or stripping leading zero bytes as needed.  Fails if any bit at or above `bit_width` is
    /// set.
    pub fn fit(&self, bit_width: usize) -> Result<ByteSequence, TrimError> {
        if bit_width == 0 {
            return Err(TrimError::ZeroWidth);
        }
        let bit_length = self.bit_length();
        if bit_length > bit_width {
            return Err(TrimError::TooWide { bit_length, bit_width });
        }

        let num_bytes = bit_width.div_ceil(8);
        let n = self.0.len().min(num_bytes);
        let mut fitted = vec![0u8; num_bytes];
        fitted[num_bytes - n..].copy_from_slice(&self.0[self.0.len() - n..]);
        Ok(ByteSequence(fitted))
    }

    /// Interprets the value as an unsigned 32-bit integer.
    pub fn to_u32(&self) -> Result<u32, TrimError> {
        Ok(BigEndian::read_u32(self.fit(32)?.as_slice()))
    }

    /// Interprets the value as an unsigned 64-bit integer.
    pub fn to_u64(&self) -> Result<u64, TrimError> {
        Ok(BigEndian::read_u64(self.fit(64)?.as_slice()))
    }
}

impl From<u64> for ByteSequence {
    fn from(value: u64) -> Self {
        ByteSequence::from_u64(value)
    }
}

impl Display for ByteSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        if self.0.is_empty() {
            return write!(f, "0");
        }
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ByteSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
