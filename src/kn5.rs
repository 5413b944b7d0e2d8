use std::{fs::File, io::{BufReader, Cursor, Read}, path::Path};

use log::{debug, info};

use crate::{
	byte_stream::ByteReader,
	error::{Kn5Error, Result},
	material::Material,
	node::Node,
};

pub const KN5_MAGIC: &[u8; 6] = b"sc6969";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Texture {
	pub texture_type: i32,
	pub name: String,
	pub data: Vec<u8>,
}

impl Texture {
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		let texture_type = reader.read_i32()?;
		let name = reader.read_prefixed_string()?;
		let size = reader.read_count()?;
		Ok(Texture {
			texture_type,
			name,
			data: reader.read(size)?,
		})
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Model {
	pub version: i32,
	/// Only present in files newer than version 5.
	pub extra: Option<i32>,
	pub textures: Vec<Texture>,
	pub materials: Vec<Material>,
	pub root: Node,
}

impl Model {
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		let magic = reader.read(KN5_MAGIC.len())?;
		if magic.as_slice() != KN5_MAGIC {
			return Err(Kn5Error::Format(format!(
				"Not a valid kn5 file, magic: {}",
				String::from_utf8_lossy(&magic)
			)));
		}

		let version = reader.read_i32()?;
		let extra = if version > 5 {
			Some(reader.read_i32()?)
		} else {
			None
		};

		let num_textures = reader.read_count()?;
		let textures = reader.read_list(num_textures, Texture::read)?;

		let num_materials = reader.read_count()?;
		let materials = reader.read_list(num_materials, Material::read)?;

		let root = Node::read(reader)?;

		Ok(Model {
			version,
			extra,
			textures,
			materials,
			root,
		})
	}

	pub fn material(&self, material_id: i32) -> Result<&Material> {
		usize::try_from(material_id)
			.ok()
			.and_then(|i| self.materials.get(i))
			.ok_or_else(|| Kn5Error::Format(format!(
				"Material index out of bounds: {} (materials: {})",
				material_id,
				self.materials.len()
			)))
	}

	pub fn find_texture(&self, name: &str) -> Option<&Texture> {
		self.textures.iter().find(|t| t.name == name)
	}
}

pub fn read_kn5<P: AsRef<Path>>(path: P) -> Result<Model> {
	let path = path.as_ref();
	let file = File::open(path)?;
	let mut reader = ByteReader::new(BufReader::new(file));
	let model = Model::read(&mut reader)?;
	info!(
		"Read {} (version {}, {} textures, {} materials, {} nodes)",
		path.display(),
		model.version,
		model.textures.len(),
		model.materials.len(),
		model.root.count_nodes()
	);
	Ok(model)
}

pub fn read_kn5_from_bytes(bytes: &[u8]) -> Result<Model> {
	let mut reader = ByteReader::new(Cursor::new(bytes));
	let model = Model::read(&mut reader)?;
	debug!("Read kn5 from {} bytes, version {}", bytes.len(), model.version);
	Ok(model)
}
