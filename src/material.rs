use std::{fmt, io::Read};

use crate::{byte_stream::ByteReader, error::Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaBlendMode {
	Opaque,
	AlphaBlend,
	AlphaToCoverage,
	Unknown(u8),
}

impl From<u8> for AlphaBlendMode {
	fn from(value: u8) -> Self {
		match value {
			0 => AlphaBlendMode::Opaque,
			1 => AlphaBlendMode::AlphaBlend,
			2 => AlphaBlendMode::AlphaToCoverage,
			n => AlphaBlendMode::Unknown(n),
		}
	}
}

impl fmt::Display for AlphaBlendMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AlphaBlendMode::Opaque => write!(f, "Opaque"),
			AlphaBlendMode::AlphaBlend => write!(f, "AlphaBlend"),
			AlphaBlendMode::AlphaToCoverage => write!(f, "AlphaToCoverage"),
			AlphaBlendMode::Unknown(n) => write!(f, "Unknown({})", n),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthMode {
	Normal,
	NoWrite,
	Off,
	Unknown(i32),
}

impl From<i32> for DepthMode {
	fn from(value: i32) -> Self {
		match value {
			0 => DepthMode::Normal,
			1 => DepthMode::NoWrite,
			2 => DepthMode::Off,
			n => DepthMode::Unknown(n),
		}
	}
}

impl fmt::Display for DepthMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DepthMode::Normal => write!(f, "DepthNormal"),
			DepthMode::NoWrite => write!(f, "DepthNoWrite"),
			DepthMode::Off => write!(f, "DepthOff"),
			DepthMode::Unknown(n) => write!(f, "Unknown({})", n),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShaderProperty {
	pub name: String,
	pub value: f32,
	pub value2: [f32; 2],
	pub value3: [f32; 3],
	pub value4: [f32; 4],
}

impl ShaderProperty {
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		Ok(ShaderProperty {
			name: reader.read_prefixed_string()?,
			value: reader.read_f32()?,
			value2: reader.read_vec2()?,
			value3: reader.read_vec3()?,
			value4: reader.read_vec4()?,
		})
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextureMapping {
	pub name: String,
	pub slot: i32,
	pub texture_name: String,
}

impl TextureMapping {
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		Ok(TextureMapping {
			name: reader.read_prefixed_string()?,
			slot: reader.read_i32()?,
			texture_name: reader.read_prefixed_string()?,
		})
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
	pub name: String,
	pub shader_name: String,
	pub alpha_blend_mode: AlphaBlendMode,
	pub alpha_tested: bool,
	pub depth_mode: DepthMode,
	pub properties: Vec<ShaderProperty>,
	pub mappings: Vec<TextureMapping>,
}

impl Default for Material {
	fn default() -> Self {
		Material {
			name: String::new(),
			shader_name: String::new(),
			alpha_blend_mode: AlphaBlendMode::Opaque,
			alpha_tested: false,
			depth_mode: DepthMode::Normal,
			properties: Vec::new(),
			mappings: Vec::new(),
		}
	}
}

/// Which texture slot a mesh's visible color comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum TexturePath<'a> {
	Diffuse(Option<&'a TextureMapping>),
	Detail(&'a TextureMapping),
}

impl<'a> TexturePath<'a> {
	pub fn texture_name(&self) -> Option<&'a str> {
		match self {
			TexturePath::Diffuse(mapping) => mapping.map(|m| m.texture_name.as_str()),
			TexturePath::Detail(mapping) => Some(mapping.texture_name.as_str()),
		}
	}
}

impl Material {
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		let name = reader.read_prefixed_string()?;
		let shader_name = reader.read_prefixed_string()?;
		let alpha_blend_mode = AlphaBlendMode::from(reader.read_u8()?);
		let alpha_tested = reader.read_bool()?;
		let depth_mode = DepthMode::from(reader.read_i32()?);

		let num_properties = reader.read_count()?;
		let properties = reader.read_list(num_properties, ShaderProperty::read)?;

		let num_mappings = reader.read_count()?;
		let mappings = reader.read_list(num_mappings, TextureMapping::read)?;

		Ok(Material {
			name,
			shader_name,
			alpha_blend_mode,
			alpha_tested,
			depth_mode,
			properties,
			mappings,
		})
	}

	pub fn find_shader_property(&self, name: &str) -> Option<&ShaderProperty> {
		self.properties.iter().find(|p| p.name == name)
	}

	pub fn find_texture_mapping(&self, name: &str) -> Option<&TextureMapping> {
		self.mappings.iter().find(|m| m.name == name)
	}

	/// Scalar value of a property, `default` when the material lacks it.
	pub fn property_value_or(&self, name: &str, default: f32) -> f32 {
		self.find_shader_property(name)
			.map(|p| p.value)
			.unwrap_or(default)
	}

	/// `txDetail` wins over `txDiffuse` only when `useDetail` is non-zero and
	/// the detail mapping exists. `force_diffuse` skips the detail check.
	pub fn resolve_texture_path(&self, force_diffuse: bool) -> TexturePath<'_> {
		let diffuse = self.find_texture_mapping("txDiffuse");
		if force_diffuse {
			return TexturePath::Diffuse(diffuse);
		}
		let use_detail = self.property_value_or("useDetail", 0.0) != 0.0;
		match self.find_texture_mapping("txDetail") {
			Some(detail) if use_detail => TexturePath::Detail(detail),
			_ => TexturePath::Diffuse(diffuse),
		}
	}

	pub fn uv_multiplier(&self, path: &TexturePath) -> f32 {
		match path {
			TexturePath::Diffuse(_) => self.property_value_or("diffuseMult", 1.0),
			TexturePath::Detail(_) => match self.find_shader_property("detailUVMultiplier") {
				Some(p) if p.value != 0.0 => 1.0 / p.value,
				_ => 1.0,
			},
		}
	}
}
