use thiserror::Error;

/// A bounded read ran past the end of the input.
#[derive(Debug, Clone, Copy, Error)]
#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
pub struct ShortRead {
	/// Byte offset where the read was attempted.
	pub at: usize,
	/// Requested bytes.
	pub need: usize,
	/// Bytes still available.
	pub rem: usize,
}

/// Simple bounded cursor over an immutable byte slice. All multi-byte reads
/// are little-endian; both Aurora formats are.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Create a cursor positioned at `pos`.
	pub fn at(bytes: &'a [u8], pos: usize) -> Self {
		Self { bytes, pos }
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], ShortRead> {
		if n > self.remaining() {
			return Err(ShortRead {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read a four-byte code.
	pub fn read_code4(&mut self) -> Result<[u8; 4], ShortRead> {
		let raw = self.read_exact(4)?;
		let mut out = [0_u8; 4];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read a single byte.
	pub fn read_u8(&mut self) -> Result<u8, ShortRead> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a little-endian `u16`.
	pub fn read_u16_le(&mut self) -> Result<u16, ShortRead> {
		let raw = self.read_exact(2)?;
		let mut buf = [0_u8; 2];
		buf.copy_from_slice(raw);
		Ok(u16::from_le_bytes(buf))
	}

	/// Read a little-endian `u32`.
	pub fn read_u32_le(&mut self) -> Result<u32, ShortRead> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(u32::from_le_bytes(buf))
	}

	/// Read a little-endian `u64`.
	pub fn read_u64_le(&mut self) -> Result<u64, ShortRead> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(u64::from_le_bytes(buf))
	}

	/// Read a little-endian `i64`.
	pub fn read_i64_le(&mut self) -> Result<i64, ShortRead> {
		Ok(self.read_u64_le()? as i64)
	}

	/// Read a little-endian `f32`.
	pub fn read_f32_le(&mut self) -> Result<f32, ShortRead> {
		Ok(f32::from_bits(self.read_u32_le()?))
	}

	/// Read a little-endian `f64`.
	pub fn read_f64_le(&mut self) -> Result<f64, ShortRead> {
		Ok(f64::from_bits(self.read_u64_le()?))
	}
}

#[cfg(test)]
mod tests {
	use super::Cursor;

	#[test]
	fn reads_advance_in_order() {
		let data = [1_u8, 0, 2, 0, 0, 0, 0xff];
		let mut cursor = Cursor::new(&data);
		assert_eq!(cursor.read_u16_le().expect("u16 reads"), 1);
		assert_eq!(cursor.read_u32_le().expect("u32 reads"), 2);
		assert_eq!(cursor.read_u8().expect("u8 reads"), 0xff);
		assert_eq!(cursor.remaining(), 0);
	}

	#[test]
	fn over_read_reports_position_and_need() {
		let data = [0_u8; 3];
		let mut cursor = Cursor::new(&data);
		cursor.read_u8().expect("first byte reads");
		let err = cursor.read_u32_le().expect_err("past-end read fails");
		assert_eq!(err.at, 1);
		assert_eq!(err.need, 4);
		assert_eq!(err.rem, 2);
	}

	#[test]
	fn cursor_at_starts_mid_buffer() {
		let data = [9_u8, 9, 7, 0, 0, 0];
		let mut cursor = Cursor::at(&data, 2);
		assert_eq!(cursor.read_u32_le().expect("u32 reads"), 7);
	}
}
