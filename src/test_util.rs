use byteorder::{LittleEndian, WriteBytesExt};

use crate::{
	kn5::{Model, Texture, KN5_MAGIC},
	material::{AlphaBlendMode, DepthMode, Material},
	matrix::Matrix,
	node::{BoundingSphere, Mesh, Node, NodeKind, SkinnedMesh, SkinnedVertex, Vertex},
};

pub fn mesh_with_positions(positions: &[[f32; 3]], indices: &[u16], material_id: i32) -> Mesh {
	Mesh {
		cast_shadows: true,
		visible: true,
		transparent: false,
		vertices: positions.iter()
			.enumerate()
			.map(|(i, p)| Vertex {
				position: *p,
				normal: [0.0, 1.0, 0.0],
				uv: [i as f32 * 0.25, 0.5],
				tangent: [1.0, 0.0, 0.0],
			})
			.collect(),
		indices: indices.to_vec(),
		material_id,
		layer: 0,
		lod_in: 0.0,
		lod_out: 0.0,
		bounding_sphere: BoundingSphere { center: [0.0, 0.0, 0.0], radius: 1.0 },
		renderable: true,
	}
}

/// Same vertices as `mesh_with_positions`, each fully weighted to bone 0.
pub fn skinned_with_positions(positions: &[[f32; 3]], indices: &[u16], material_id: i32) -> SkinnedMesh {
	let mesh = mesh_with_positions(positions, indices, material_id);
	SkinnedMesh {
		cast_shadows: mesh.cast_shadows,
		visible: mesh.visible,
		transparent: mesh.transparent,
		bones: Vec::new(),
		vertices: mesh.vertices.into_iter()
			.map(|base| SkinnedVertex { base, weights: [1.0, 0.0, 0.0, 0.0], bone_indices: [0.0; 4] })
			.collect(),
		indices: mesh.indices,
		material_id,
		layer: 0,
		lod_in: 0.0,
		lod_out: 0.0,
	}
}

fn put_f32s(out: &mut Vec<u8>, values: &[f32]) {
	for v in values {
		out.write_f32::<LittleEndian>(*v).unwrap();
	}
}

fn put_string(out: &mut Vec<u8>, s: &str) {
	out.write_i32::<LittleEndian>(s.len() as i32).unwrap();
	out.extend_from_slice(s.as_bytes());
}

fn put_matrix(out: &mut Vec<u8>, matrix: &Matrix) {
	for row in matrix.data.iter() {
		put_f32s(out, row);
	}
}

fn put_vertex(out: &mut Vec<u8>, vertex: &Vertex) {
	put_f32s(out, &vertex.position);
	put_f32s(out, &vertex.normal);
	put_f32s(out, &vertex.uv);
	put_f32s(out, &vertex.tangent);
}

fn put_indices(out: &mut Vec<u8>, indices: &[u16]) {
	out.write_i32::<LittleEndian>(indices.len() as i32).unwrap();
	for i in indices {
		out.write_u16::<LittleEndian>(*i).unwrap();
	}
}

pub fn encode_node(node: &Node) -> Vec<u8> {
	let mut out = Vec::new();
	put_node(&mut out, node);
	out
}

fn put_node(out: &mut Vec<u8>, node: &Node) {
	let type_tag = match node.kind {
		NodeKind::NotSet => 0,
		NodeKind::Transform(_) => 1,
		NodeKind::Mesh(_) => 2,
		NodeKind::SkinnedMesh(_) => 3,
	};
	out.write_i32::<LittleEndian>(type_tag).unwrap();
	put_string(out, &node.name);
	out.write_i32::<LittleEndian>(node.children.len() as i32).unwrap();
	out.push(node.active as u8);
	match &node.kind {
		NodeKind::NotSet => {}
		NodeKind::Transform(matrix) => put_matrix(out, matrix),
		NodeKind::Mesh(mesh) => {
			out.extend_from_slice(&[mesh.cast_shadows as u8, mesh.visible as u8, mesh.transparent as u8]);
			out.write_i32::<LittleEndian>(mesh.vertices.len() as i32).unwrap();
			for vertex in mesh.vertices.iter() {
				put_vertex(out, vertex);
			}
			put_indices(out, &mesh.indices);
			out.write_i32::<LittleEndian>(mesh.material_id).unwrap();
			out.write_u32::<LittleEndian>(mesh.layer).unwrap();
			put_f32s(out, &[mesh.lod_in, mesh.lod_out]);
			put_f32s(out, &mesh.bounding_sphere.center);
			put_f32s(out, &[mesh.bounding_sphere.radius]);
			out.push(mesh.renderable as u8);
		}
		NodeKind::SkinnedMesh(mesh) => {
			out.extend_from_slice(&[mesh.cast_shadows as u8, mesh.visible as u8, mesh.transparent as u8]);
			out.write_i32::<LittleEndian>(mesh.bones.len() as i32).unwrap();
			for bone in mesh.bones.iter() {
				put_string(out, &bone.name);
				put_matrix(out, &bone.matrix);
			}
			out.write_i32::<LittleEndian>(mesh.vertices.len() as i32).unwrap();
			for vertex in mesh.vertices.iter() {
				put_vertex(out, &vertex.base);
				put_f32s(out, &vertex.weights);
				put_f32s(out, &vertex.bone_indices);
			}
			put_indices(out, &mesh.indices);
			out.write_i32::<LittleEndian>(mesh.material_id).unwrap();
			out.write_u32::<LittleEndian>(mesh.layer).unwrap();
			put_f32s(out, &[mesh.lod_in, mesh.lod_out]);
		}
	}
	for child in node.children.iter() {
		put_node(out, child);
	}
}

fn put_texture(out: &mut Vec<u8>, texture: &Texture) {
	out.write_i32::<LittleEndian>(texture.texture_type).unwrap();
	put_string(out, &texture.name);
	out.write_i32::<LittleEndian>(texture.data.len() as i32).unwrap();
	out.extend_from_slice(&texture.data);
}

fn put_material(out: &mut Vec<u8>, material: &Material) {
	put_string(out, &material.name);
	put_string(out, &material.shader_name);
	out.push(match material.alpha_blend_mode {
		AlphaBlendMode::Opaque => 0,
		AlphaBlendMode::AlphaBlend => 1,
		AlphaBlendMode::AlphaToCoverage => 2,
		AlphaBlendMode::Unknown(n) => n,
	});
	out.push(material.alpha_tested as u8);
	out.write_i32::<LittleEndian>(match material.depth_mode {
		DepthMode::Normal => 0,
		DepthMode::NoWrite => 1,
		DepthMode::Off => 2,
		DepthMode::Unknown(n) => n,
	}).unwrap();
	out.write_i32::<LittleEndian>(material.properties.len() as i32).unwrap();
	for property in material.properties.iter() {
		put_string(out, &property.name);
		put_f32s(out, &[property.value]);
		put_f32s(out, &property.value2);
		put_f32s(out, &property.value3);
		put_f32s(out, &property.value4);
	}
	out.write_i32::<LittleEndian>(material.mappings.len() as i32).unwrap();
	for mapping in material.mappings.iter() {
		put_string(out, &mapping.name);
		out.write_i32::<LittleEndian>(mapping.slot).unwrap();
		put_string(out, &mapping.texture_name);
	}
}

pub fn encode_model(model: &Model) -> Vec<u8> {
	let mut out = KN5_MAGIC.to_vec();
	out.write_i32::<LittleEndian>(model.version).unwrap();
	if model.version > 5 {
		out.write_i32::<LittleEndian>(model.extra.unwrap_or(0)).unwrap();
	}
	out.write_i32::<LittleEndian>(model.textures.len() as i32).unwrap();
	for texture in model.textures.iter() {
		put_texture(&mut out, texture);
	}
	out.write_i32::<LittleEndian>(model.materials.len() as i32).unwrap();
	for material in model.materials.iter() {
		put_material(&mut out, material);
	}
	put_node(&mut out, &model.root);
	out
}
