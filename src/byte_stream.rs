use std::io::{self, Read};
use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Kn5Error, Result};

/// Strictly positional little-endian reader. Every read either yields the
/// full value or fails; nothing is silently zero-filled.
pub struct ByteReader<R: Read> {
	reader: R,
}

impl<R: Read> ByteReader<R> {
	pub fn new(reader: R) -> Self {
		ByteReader { reader }
	}

	/// Reads exactly `size` bytes. The buffer grows with the data actually
	/// read, not with the declared size.
	pub fn read(&mut self, size: usize) -> Result<Vec<u8>> {
		let mut buffer = Vec::with_capacity(size.min(1 << 16));
		self.reader.by_ref().take(size as u64).read_to_end(&mut buffer)?;
		if buffer.len() != size {
			return Err(io::Error::new(
				io::ErrorKind::UnexpectedEof,
				format!("Expected {} bytes, got {}", size, buffer.len()),
			).into());
		}
		Ok(buffer)
	}

	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.reader.read_u8()?)
	}

	pub fn read_bool(&mut self) -> Result<bool> {
		Ok(self.read_u8()? != 0)
	}

	pub fn read_u16(&mut self) -> Result<u16> {
		Ok(self.reader.read_u16::<LittleEndian>()?)
	}

	pub fn read_u32(&mut self) -> Result<u32> {
		Ok(self.reader.read_u32::<LittleEndian>()?)
	}

	pub fn read_i32(&mut self) -> Result<i32> {
		Ok(self.reader.read_i32::<LittleEndian>()?)
	}

	pub fn read_f32(&mut self) -> Result<f32> {
		Ok(self.reader.read_f32::<LittleEndian>()?)
	}

	pub fn read_vec2(&mut self) -> Result<[f32; 2]> {
		Ok([self.read_f32()?, self.read_f32()?])
	}

	pub fn read_vec3(&mut self) -> Result<[f32; 3]> {
		Ok([self.read_f32()?, self.read_f32()?, self.read_f32()?])
	}

	pub fn read_vec4(&mut self) -> Result<[f32; 4]> {
		Ok([self.read_f32()?, self.read_f32()?, self.read_f32()?, self.read_f32()?])
	}

	/// Element count of a list, stored as int32.
	pub fn read_count(&mut self) -> Result<usize> {
		let count = self.read_i32()?;
		usize::try_from(count).map_err(|_| Kn5Error::Format(format!("Negative element count: {}", count)))
	}

	pub fn read_string(&mut self, count: usize) -> Result<String> {
		let buffer = self.read(count)?;
		Ok(String::from_utf8_lossy(&buffer).to_string())
	}

	/// int32 length followed by that many raw bytes, no terminator.
	pub fn read_prefixed_string(&mut self) -> Result<String> {
		let length = self.read_count()?;
		self.read_string(length)
	}

	/// Reads `count` elements with `read_one`. Preallocation is capped at 4096
	/// elements; a larger corrupt count fails on the first short read.
	pub fn read_list<T, F>(&mut self, count: usize, mut read_one: F) -> Result<Vec<T>>
	where
		F: FnMut(&mut Self) -> Result<T>,
	{
		let mut items = Vec::with_capacity(count.min(4096));
		for _ in 0..count {
			items.push(read_one(self)?);
		}
		Ok(items)
	}
}
