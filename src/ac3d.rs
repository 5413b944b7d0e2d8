use std::{fs::File, io::{BufWriter, Write}, path::Path};

use log::{debug, info, warn};

use crate::{
	error::{Kn5Error, Result},
	kn5::Model,
	material::Material,
	matrix::Matrix,
	node::{Geometry, Node, NodeKind},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportOptions {
	/// Reference `.png` instead of `.dds` texture files.
	pub convert_textures_to_png: bool,
	/// Write the `.acc` variant: vertex normals plus the extra texture channels.
	pub output_acc: bool,
	/// Always take the `txDiffuse` slot, ignoring `useDetail`.
	pub use_diffuse: bool,
}

/// Dense renumbering of the materials a subtree actually references,
/// in first-encountered pre-order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UsedMaterials {
	ids: Vec<i32>,
}

impl UsedMaterials {
	pub fn collect(root: &Node) -> Self {
		let mut used = UsedMaterials::default();
		used.visit(root);
		used
	}

	fn visit(&mut self, node: &Node) {
		if let Some(geometry) = node.geometry() {
			let id = geometry.material_id();
			if !self.ids.contains(&id) {
				self.ids.push(id);
			}
		}
		for child in node.children.iter() {
			self.visit(child);
		}
	}

	pub fn ids(&self) -> &[i32] {
		&self.ids
	}

	pub fn remap(&self, material_id: i32) -> Option<usize> {
		self.ids.iter().position(|id| *id == material_id)
	}
}

/// Swaps a `.dds`/`.DDS` extension for `.png`; names already pointing at a
/// png, or without a dds extension, are returned unchanged.
pub fn png_texture_name(name: &str) -> String {
	if name.contains(".png") || name.contains(".PNG") {
		return name.to_string();
	}
	match name.find(".dds").or_else(|| name.find(".DDS")) {
		Some(extension) => format!("{}.png", &name[..extension]),
		None => name.to_string(),
	}
}

/// Zero-area check: every component of (v1 - v0) x (v2 - v0) within epsilon.
pub fn is_degenerate(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> bool {
	let a = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
	let b = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
	let cross = [
		a[1] * b[2] - a[2] * b[1],
		a[2] * b[0] - a[0] * b[2],
		a[0] * b[1] - a[1] * b[0],
	];
	cross.iter().all(|c| c.abs() <= f32::EPSILON)
}

pub fn write_model<P: AsRef<Path>>(path: P, model: &Model, root: &Node, options: &ExportOptions) -> Result<()> {
	let path = path.as_ref();
	let file = File::create(path)?;
	let mut out = BufWriter::new(file);
	write_ac3d(&mut out, model, root, options)?;
	out.flush()?;
	info!("Wrote {}", path.display());
	Ok(())
}

pub fn write_ac3d<W: Write>(out: &mut W, model: &Model, root: &Node, options: &ExportOptions) -> Result<()> {
	let used = UsedMaterials::collect(root);
	debug!("{} of {} materials used below {}", used.ids().len(), model.materials.len(), root.name);

	writeln!(out, "AC3Db")?;
	for id in used.ids() {
		write_material(out, model.material(*id)?)?;
	}
	writeln!(out, "OBJECT world")?;
	writeln!(out, "kids 1")?;
	let mut writer = ObjectWriter { out, model, used: &used, options };
	writer.write_object(root)
}

fn clamped(material: &Material, name: &str, default: f32, max: f32) -> f32 {
	material.find_shader_property(name)
		.map(|p| p.value.clamp(0.0, max))
		.unwrap_or(default)
}

fn write_material<W: Write>(out: &mut W, material: &Material) -> Result<()> {
	let rgb = clamped(material, "ksDiffuse", 1.0, 1.0);
	let amb = clamped(material, "ksAmbient", 1.0, 1.0);
	let emis = clamped(material, "ksEmissive", 1.0, 1.0);
	let spec = clamped(material, "ksSpecular", 1.0, 1.0);
	let shi = clamped(material, "ksSpecularEXP", 0.0, 128.0) as i32;
	let trans = clamped(material, "ksAlphaRef", 0.0, 1.0);
	writeln!(
		out,
		"MATERIAL \"{}\" rgb {rgb} {rgb} {rgb}  amb {amb} {amb} {amb}  emis {emis} {emis} {emis}  spec {spec} {spec} {spec}  shi {shi}  trans {trans}",
		material.name,
	)?;
	Ok(())
}

struct ObjectWriter<'a, W: Write> {
	out: &'a mut W,
	model: &'a Model,
	used: &'a UsedMaterials,
	options: &'a ExportOptions,
}

impl<'a, W: Write> ObjectWriter<'a, W> {
	fn write_object(&mut self, node: &Node) -> Result<()> {
		match &node.kind {
			NodeKind::Transform(matrix) => self.write_group(node, Some(matrix))?,
			NodeKind::NotSet => self.write_group(node, None)?,
			NodeKind::Mesh(mesh) => self.write_poly(node, mesh)?,
			NodeKind::SkinnedMesh(mesh) => self.write_poly(node, mesh)?,
		}

		writeln!(self.out, "kids {}", node.children.len())?;
		for child in node.children.iter() {
			self.write_object(child)?;
		}
		Ok(())
	}

	fn write_group(&mut self, node: &Node, matrix: Option<&Matrix>) -> Result<()> {
		writeln!(self.out, "OBJECT group")?;
		writeln!(self.out, "name \"{}\"", node.name)?;
		let Some(matrix) = matrix else {
			return Ok(());
		};
		let m = &matrix.data;
		if matrix.is_rotation() {
			writeln!(
				self.out,
				"rot {} {} {} {} {} {} {} {} {}",
				m[0][0], m[0][1], m[0][2],
				m[1][0], m[1][1], m[1][2],
				m[2][0], m[2][1], m[2][2],
			)?;
		}
		if matrix.is_translation() {
			writeln!(self.out, "loc {} {} {}", m[3][0], m[3][1], m[3][2])?;
		}
		Ok(())
	}

	fn write_poly(&mut self, node: &Node, geometry: &dyn Geometry) -> Result<()> {
		let material = self.model.material(geometry.material_id())?;
		let new_material_id = self.used.remap(geometry.material_id())
			.ok_or_else(|| Kn5Error::Format(format!("Material {} was not collected", geometry.material_id())))?;

		writeln!(self.out, "OBJECT poly")?;
		writeln!(self.out, "name \"{}\"", node.name)?;

		let texture_path = material.resolve_texture_path(self.options.use_diffuse);
		if let Some(texture) = texture_path.texture_name() {
			let texture = if self.options.convert_textures_to_png {
				png_texture_name(texture)
			} else {
				texture.to_string()
			};
			if self.options.output_acc {
				writeln!(self.out, "texture \"{}\" base", texture)?;
				writeln!(self.out, "texture empty_texture_no_mapping tiled")?;
				writeln!(self.out, "texture empty_texture_no_mapping skids")?;
				writeln!(self.out, "texture empty_texture_no_mapping shad")?;
			} else {
				writeln!(self.out, "texture \"{}\"", texture)?;
			}
		} else {
			debug!("No texture for {} (material {})", node.name, material.name);
		}

		let vertex_count = geometry.vertex_count();
		writeln!(self.out, "numvert {}", vertex_count)?;
		for i in 0..vertex_count {
			let Some(vertex) = geometry.vertex(i) else { break };
			let p = vertex.position;
			if self.options.output_acc {
				let n = vertex.normal;
				writeln!(self.out, "{} {} {} {} {} {}", p[0], p[1], p[2], n[0], n[1], n[2])?;
			} else {
				writeln!(self.out, "{} {} {}", p[0], p[1], p[2])?;
			}
		}

		let triangles = self.valid_triangles(node, geometry)?;
		let uv_mult = material.uv_multiplier(&texture_path);
		writeln!(self.out, "numsurf {}", triangles.len())?;
		for triangle in triangles.iter() {
			writeln!(self.out, "SURF 0x10")?;
			writeln!(self.out, "mat {}", new_material_id)?;
			writeln!(self.out, "refs 3")?;
			for index in triangle {
				let uv = geometry.vertex(*index).map(|v| v.uv).unwrap_or_default();
				writeln!(self.out, "{} {} {}", index, uv[0] * uv_mult, -uv[1] * uv_mult)?;
			}
		}
		Ok(())
	}

	fn valid_triangles(&self, node: &Node, geometry: &dyn Geometry) -> Result<Vec<[usize; 3]>> {
		let mut triangles = Vec::with_capacity(geometry.indices().len() / 3);
		let mut dropped = 0;
		for chunk in geometry.indices().chunks_exact(3) {
			let triangle = [chunk[0] as usize, chunk[1] as usize, chunk[2] as usize];
			let mut positions = [[0.0; 3]; 3];
			for (position, index) in positions.iter_mut().zip(triangle) {
				*position = geometry.vertex(index)
					.ok_or_else(|| Kn5Error::Format(format!(
						"Vertex index {} out of bounds in {} ({} vertices)",
						index,
						node.name,
						geometry.vertex_count()
					)))?
					.position;
			}
			if is_degenerate(positions[0], positions[1], positions[2]) {
				dropped += 1;
			} else {
				triangles.push(triangle);
			}
		}
		if dropped > 0 {
			warn!("Dropped {} degenerate triangles from {}", dropped, node.name);
		}
		Ok(triangles)
	}
}
