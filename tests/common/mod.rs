use byteorder::{LittleEndian, WriteBytesExt};

/// Minimal kn5 writer for building fixtures by hand.
pub struct Kn5Builder {
	out: Vec<u8>,
}

impl Kn5Builder {
	pub fn new(version: i32) -> Self {
		let mut out = b"sc6969".to_vec();
		out.write_i32::<LittleEndian>(version).unwrap();
		if version > 5 {
			out.write_i32::<LittleEndian>(0).unwrap();
		}
		Kn5Builder { out }
	}

	pub fn i32(&mut self, v: i32) -> &mut Self {
		self.out.write_i32::<LittleEndian>(v).unwrap();
		self
	}

	pub fn u32(&mut self, v: u32) -> &mut Self {
		self.out.write_u32::<LittleEndian>(v).unwrap();
		self
	}

	pub fn f32s(&mut self, values: &[f32]) -> &mut Self {
		for v in values {
			self.out.write_f32::<LittleEndian>(*v).unwrap();
		}
		self
	}

	pub fn bools(&mut self, values: &[bool]) -> &mut Self {
		for v in values {
			self.out.push(*v as u8);
		}
		self
	}

	pub fn string(&mut self, s: &str) -> &mut Self {
		self.i32(s.len() as i32);
		self.out.extend_from_slice(s.as_bytes());
		self
	}

	pub fn texture(&mut self, name: &str, data: &[u8]) -> &mut Self {
		self.i32(0).string(name).i32(data.len() as i32);
		self.out.extend_from_slice(data);
		self
	}

	/// Material with a `txDiffuse` mapping and the given scalar properties.
	pub fn material(&mut self, name: &str, texture: &str, properties: &[(&str, f32)]) -> &mut Self {
		self.string(name).string("ksPerPixel");
		self.out.push(0);
		self.bools(&[false]).i32(0);
		self.i32(properties.len() as i32);
		for (property, value) in properties {
			self.string(property).f32s(&[*value]).f32s(&[0.0; 9]);
		}
		self.i32(1).string("txDiffuse").i32(0).string(texture)
	}

	pub fn transform(&mut self, name: &str, children: i32, active: bool, translation: [f32; 3]) -> &mut Self {
		self.i32(1).string(name).i32(children).bools(&[active]);
		self.f32s(&[1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
		self.f32s(&translation).f32s(&[1.0])
	}

	pub fn mesh(&mut self, name: &str, positions: &[[f32; 3]], indices: &[u16], material_id: i32) -> &mut Self {
		self.i32(2).string(name).i32(0).bools(&[true]);
		self.bools(&[true, true, false]);
		self.i32(positions.len() as i32);
		for p in positions {
			self.f32s(p).f32s(&[0.0, 1.0, 0.0]).f32s(&[0.5, 0.25]).f32s(&[1.0, 0.0, 0.0]);
		}
		self.i32(indices.len() as i32);
		for i in indices {
			self.out.write_u16::<LittleEndian>(*i).unwrap();
		}
		self.i32(material_id).u32(0).f32s(&[0.0, 1000.0]);
		self.f32s(&[0.0, 0.0, 0.0, 1.0]).bools(&[true])
	}

	pub fn skinned_mesh(&mut self, name: &str, positions: &[[f32; 3]], indices: &[u16], material_id: i32) -> &mut Self {
		self.i32(3).string(name).i32(0).bools(&[true]);
		self.bools(&[true, true, false]);
		self.i32(1).string("bone0");
		self.f32s(&[1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
		self.i32(positions.len() as i32);
		for p in positions {
			self.f32s(p).f32s(&[0.0, 1.0, 0.0]).f32s(&[0.5, 0.25]).f32s(&[1.0, 0.0, 0.0]);
			self.f32s(&[1.0, 0.0, 0.0, 0.0]).f32s(&[0.0, 0.0, 0.0, 0.0]);
		}
		self.i32(indices.len() as i32);
		for i in indices {
			self.out.write_u16::<LittleEndian>(*i).unwrap();
		}
		self.i32(material_id).u32(0).f32s(&[0.0, 1000.0])
	}

	pub fn build(&self) -> Vec<u8> {
		self.out.clone()
	}
}
