use std::{collections::BTreeSet, fs, path::{Component, Path}};

use image::{DynamicImage, ImageFormat};
use log::{debug, info, warn};

use crate::{ac3d::png_texture_name, error::Result, kn5::Model, material::AlphaBlendMode};

const DDS_MAGIC: [u8; 4] = [0x44, 0x44, 0x53, 0x20];
const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

fn decode_texture(bytes: &[u8]) -> std::result::Result<DynamicImage, String> {
	if bytes.len() > 4 && bytes[0..4] == DDS_MAGIC {
		image::load_from_memory_with_format(bytes, ImageFormat::Dds).map_err(|e| e.to_string())
	} else if bytes.len() > 4 && bytes[0..4] == PNG_MAGIC {
		image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(|e| e.to_string())
	} else {
		Err("Unknown texture format".to_string())
	}
}

/// A texture is opaque when a material that uses it as its first mapping
/// does not blend.
fn is_opaque(model: &Model, texture_name: &str) -> bool {
	model.materials.iter()
		.filter(|m| m.mappings.first().is_some_and(|t| t.texture_name == texture_name))
		.any(|m| m.alpha_blend_mode == AlphaBlendMode::Opaque)
}

fn convert_to_png(bytes: &[u8], png_path: &Path, drop_alpha: bool) -> std::result::Result<(), String> {
	let image = decode_texture(bytes)?;
	let image = if drop_alpha {
		DynamicImage::ImageRgb8(image.to_rgb8())
	} else {
		image
	};
	image.save_with_format(png_path, ImageFormat::Png).map_err(|e| e.to_string())
}

/// True when `name` is a plain file name, so joining it to a directory stays
/// inside that directory.
fn is_plain_file_name(name: &str) -> bool {
	let mut components = Path::new(name).components();
	matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}

/// Writes every embedded texture into `directory` under its own name, never
/// overwriting an existing file. With `convert` set, `.dds` textures are
/// re-encoded as `.png` and the intermediate `.dds` removed if this call wrote
/// it. Names that are not a single plain file name are skipped.
pub fn write_textures<P: AsRef<Path>>(model: &Model, directory: P, convert: bool) -> Result<()> {
	let directory = directory.as_ref();
	fs::create_dir_all(directory)?;

	let mut files_to_delete = BTreeSet::new();
	for texture in model.textures.iter() {
		if !is_plain_file_name(&texture.name) {
			warn!("Skipping texture with unsafe name {:?}", texture.name);
			continue;
		}
		let texture_path = directory.join(&texture.name);
		let written = !texture_path.exists();
		if written {
			fs::write(&texture_path, &texture.data)?;
			debug!("Wrote texture {} ({} bytes)", texture_path.display(), texture.data.len());
		}

		if !convert {
			continue;
		}
		let png_name = png_texture_name(&texture.name);
		if png_name == texture.name {
			continue;
		}
		let png_path = directory.join(&png_name);
		if png_path.exists() {
			continue;
		}
		match convert_to_png(&texture.data, &png_path, is_opaque(model, &texture.name)) {
			Ok(()) => {
				info!("Converted {} to {}", texture.name, png_name);
				if written {
					files_to_delete.insert(texture_path);
				}
			}
			Err(e) => warn!("Failed to convert {} to {}: {}", texture.name, png_name, e),
		}
	}

	for file in files_to_delete {
		fs::remove_file(file)?;
	}
	Ok(())
}
