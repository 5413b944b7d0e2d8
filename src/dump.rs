use std::{fs::File, io::{BufWriter, Write}, path::Path};

use crate::{
	error::Result,
	kn5::{Model, Texture},
	material::Material,
	matrix::Matrix,
	node::{Node, NodeKind, Vertex},
};

fn yes_no(value: bool) -> &'static str {
	if value { "true" } else { "false" }
}

pub fn dump_matrix<W: Write>(out: &mut W, matrix: &Matrix, indent: &str) -> Result<()> {
	writeln!(out, "{indent}matrix:")?;
	for row in matrix.data.iter() {
		writeln!(out, "{indent}  {}, {}, {}, {}", row[0], row[1], row[2], row[3])?;
	}
	Ok(())
}

fn dump_texture<W: Write>(out: &mut W, texture: &Texture, indent: &str) -> Result<()> {
	writeln!(out, "{indent}type: {}", texture.texture_type)?;
	writeln!(out, "{indent}name: {}", texture.name)?;
	writeln!(out, "{indent}size: {}", texture.data.len())?;
	Ok(())
}

fn dump_material<W: Write>(out: &mut W, material: &Material, indent: &str) -> Result<()> {
	writeln!(out, "{indent}name:             {}", material.name)?;
	writeln!(out, "{indent}shaderName:       {}", material.shader_name)?;
	writeln!(out, "{indent}alphaBlendMode:   {}", material.alpha_blend_mode)?;
	writeln!(out, "{indent}alphaTested:      {}", yes_no(material.alpha_tested))?;
	writeln!(out, "{indent}depthMode:        {}", material.depth_mode)?;

	writeln!(out, "{indent}shaderProperties: {}", material.properties.len())?;
	for (i, p) in material.properties.iter().enumerate() {
		writeln!(out, "{indent}shaderProperties[{i}]")?;
		writeln!(out, "{indent}  name:   {}", p.name)?;
		writeln!(out, "{indent}  value:  {}", p.value)?;
		writeln!(out, "{indent}  value2: {}, {}", p.value2[0], p.value2[1])?;
		writeln!(out, "{indent}  value3: {}, {}, {}", p.value3[0], p.value3[1], p.value3[2])?;
		writeln!(out, "{indent}  value4: {}, {}, {}, {}", p.value4[0], p.value4[1], p.value4[2], p.value4[3])?;
	}

	writeln!(out, "{indent}textureMappings:  {}", material.mappings.len())?;
	for (i, m) in material.mappings.iter().enumerate() {
		writeln!(out, "{indent}textureMappings[{i}]")?;
		writeln!(out, "{indent}  name:        {}", m.name)?;
		writeln!(out, "{indent}  slot:        {}", m.slot)?;
		writeln!(out, "{indent}  textureName: {}", m.texture_name)?;
	}
	Ok(())
}

fn dump_vertex<W: Write>(out: &mut W, v: &Vertex, indent: &str) -> Result<()> {
	writeln!(out, "{indent}position: {}, {}, {}", v.position[0], v.position[1], v.position[2])?;
	writeln!(out, "{indent}normal:   {}, {}, {}", v.normal[0], v.normal[1], v.normal[2])?;
	writeln!(out, "{indent}texture:  {}, {}", v.uv[0], v.uv[1])?;
	writeln!(out, "{indent}tangent:  {}, {}, {}", v.tangent[0], v.tangent[1], v.tangent[2])?;
	Ok(())
}

fn dump_indices<W: Write>(out: &mut W, indices: &[u16], indent: &str) -> Result<()> {
	writeln!(out, "{indent}indices:    {}", indices.len())?;
	for (i, index) in indices.iter().enumerate() {
		writeln!(out, "{indent}  indices[{i}]: {index}")?;
	}
	Ok(())
}

fn dump_node<W: Write>(out: &mut W, node: &Node, indent: &str) -> Result<()> {
	let nested = format!("{indent}  ");
	writeln!(out, "{indent}type:        {}", node.node_type())?;
	writeln!(out, "{indent}name:        {}", node.name)?;
	writeln!(out, "{indent}active:      {}", yes_no(node.active))?;

	match &node.kind {
		NodeKind::NotSet => {}
		NodeKind::Transform(matrix) => dump_matrix(out, matrix, indent)?,
		NodeKind::Mesh(mesh) => {
			writeln!(out, "{indent}castShadows: {}", yes_no(mesh.cast_shadows))?;
			writeln!(out, "{indent}visible:     {}", yes_no(mesh.visible))?;
			writeln!(out, "{indent}transparent: {}", yes_no(mesh.transparent))?;
			writeln!(out, "{indent}vertices:    {}", mesh.vertices.len())?;
			for (i, vertex) in mesh.vertices.iter().enumerate() {
				writeln!(out, "{indent}vertices[{i}]")?;
				dump_vertex(out, vertex, &nested)?;
			}
			dump_indices(out, &mesh.indices, indent)?;
			writeln!(out, "{indent}materialID: {}", mesh.material_id)?;
			writeln!(out, "{indent}layer:      {}", mesh.layer)?;
			writeln!(out, "{indent}lodIn:      {}", mesh.lod_in)?;
			writeln!(out, "{indent}lodOut:     {}", mesh.lod_out)?;
			let sphere = &mesh.bounding_sphere;
			writeln!(out, "{indent}boundingSphere:")?;
			writeln!(out, "{nested}center: {}, {}, {}", sphere.center[0], sphere.center[1], sphere.center[2])?;
			writeln!(out, "{nested}radius: {}", sphere.radius)?;
			writeln!(out, "{indent}renderable: {}", yes_no(mesh.renderable))?;
		}
		NodeKind::SkinnedMesh(mesh) => {
			writeln!(out, "{indent}castShadows: {}", yes_no(mesh.cast_shadows))?;
			writeln!(out, "{indent}visible:     {}", yes_no(mesh.visible))?;
			writeln!(out, "{indent}transparent: {}", yes_no(mesh.transparent))?;
			writeln!(out, "{indent}bones:       {}", mesh.bones.len())?;
			for (i, bone) in mesh.bones.iter().enumerate() {
				writeln!(out, "{indent}bones[{i}]")?;
				writeln!(out, "{nested}name:  {}", bone.name)?;
				dump_matrix(out, &bone.matrix, &nested)?;
			}
			writeln!(out, "{indent}vertices:    {}", mesh.vertices.len())?;
			for (i, vertex) in mesh.vertices.iter().enumerate() {
				writeln!(out, "{indent}vertices[{i}]")?;
				dump_vertex(out, &vertex.base, &nested)?;
				let w = vertex.weights;
				let b = vertex.bone_indices;
				writeln!(out, "{nested}weights:  {}, {}, {}, {}", w[0], w[1], w[2], w[3])?;
				writeln!(out, "{nested}indices:  {}, {}, {}, {}", b[0], b[1], b[2], b[3])?;
			}
			dump_indices(out, &mesh.indices, indent)?;
			writeln!(out, "{indent}materialID: {}", mesh.material_id)?;
			writeln!(out, "{indent}layer:      {}", mesh.layer)?;
			writeln!(out, "{indent}lodIn:      {}", mesh.lod_in)?;
			writeln!(out, "{indent}lodOut:     {}", mesh.lod_out)?;
		}
	}

	writeln!(out, "{indent}children: {}", node.children.len())?;
	for (i, child) in node.children.iter().enumerate() {
		writeln!(out, "{indent}children[{i}]")?;
		dump_node(out, child, &nested)?;
	}
	Ok(())
}

pub fn dump_model<W: Write>(out: &mut W, model: &Model) -> Result<()> {
	writeln!(out, "version: {}", model.version)?;
	if let Some(extra) = model.extra {
		writeln!(out, "extra: {}", extra)?;
	}

	writeln!(out, "textures: {}", model.textures.len())?;
	for (i, texture) in model.textures.iter().enumerate() {
		writeln!(out, "textures[{i}]")?;
		dump_texture(out, texture, "  ")?;
	}

	writeln!(out, "materials: {}", model.materials.len())?;
	for (i, material) in model.materials.iter().enumerate() {
		writeln!(out, "materials[{i}]")?;
		dump_material(out, material, "  ")?;
	}

	writeln!(out, "node:")?;
	dump_node(out, &model.root, "  ")
}

pub fn dump_model_to_file<P: AsRef<Path>>(path: P, model: &Model) -> Result<()> {
	let mut out = BufWriter::new(File::create(path)?);
	dump_model(&mut out, model)?;
	out.flush()?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::{material::AlphaBlendMode, test_util::mesh_with_positions};

	use super::*;

	#[test]
	fn dump_lists_every_section() {
		let model = Model {
			version: 6,
			extra: Some(3),
			textures: vec![Texture { texture_type: 1, name: "a.dds".to_string(), data: vec![0; 12] }],
			materials: vec![Material { name: "glass".to_string(), alpha_blend_mode: AlphaBlendMode::AlphaBlend, ..Default::default() }],
			root: Node::new_transform("root", Matrix::IDENTITY)
				.with_children(vec![Node::new_mesh("m", mesh_with_positions(&[[1.0, 2.0, 3.0]], &[0, 0, 0], 0))]),
		};
		let mut out = Vec::new();
		dump_model(&mut out, &model).unwrap();
		let text = String::from_utf8(out).unwrap();
		assert!(text.starts_with("version: 6\nextra: 3\ntextures: 1\n"));
		assert!(text.contains("  size: 12\n"));
		assert!(text.contains("  alphaBlendMode:   AlphaBlend\n"));
		assert!(text.contains("  type:        Transform\n"));
		assert!(text.contains("    type:        Mesh\n"));
		assert!(text.contains("      position: 1, 2, 3\n"));
		assert!(text.contains("    indices:    3\n"));
		assert!(text.contains("  children: 1\n"));
	}
}
