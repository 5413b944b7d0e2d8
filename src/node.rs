use std::{fmt, io::Read};

use crate::{byte_stream::ByteReader, error::{Kn5Error, Result}, matrix::Matrix};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
	NotSet,
	Transform,
	Mesh,
	SkinnedMesh,
}

impl TryFrom<i32> for NodeType {
	type Error = Kn5Error;

	fn try_from(value: i32) -> Result<Self> {
		match value {
			0 => Ok(NodeType::NotSet),
			1 => Ok(NodeType::Transform),
			2 => Ok(NodeType::Mesh),
			3 => Ok(NodeType::SkinnedMesh),
			n => Err(Kn5Error::Format(format!("Unknown node type: {}", n))),
		}
	}
}

impl fmt::Display for NodeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			NodeType::NotSet => "NotSet",
			NodeType::Transform => "Transform",
			NodeType::Mesh => "Mesh",
			NodeType::SkinnedMesh => "SkinnedMesh",
		};
		f.write_str(name)
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vertex {
	pub position: [f32; 3],
	pub normal: [f32; 3],
	pub uv: [f32; 2],
	pub tangent: [f32; 3],
}

impl Vertex {
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		Ok(Vertex {
			position: reader.read_vec3()?,
			normal: reader.read_vec3()?,
			uv: reader.read_vec2()?,
			tangent: reader.read_vec3()?,
		})
	}

	pub fn transform(&mut self, matrix: &Matrix) {
		self.position = matrix.transform_point(self.position);
		self.normal = matrix.transform_vector(self.normal);
		self.tangent = matrix.transform_vector(self.tangent);
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkinnedVertex {
	pub base: Vertex,
	pub weights: [f32; 4],
	/// Stored as floats in the file.
	pub bone_indices: [f32; 4],
}

impl SkinnedVertex {
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		Ok(SkinnedVertex {
			base: Vertex::read(reader)?,
			weights: reader.read_vec4()?,
			bone_indices: reader.read_vec4()?,
		})
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bone {
	pub name: String,
	pub matrix: Matrix,
}

impl Bone {
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		Ok(Bone {
			name: reader.read_prefixed_string()?,
			matrix: Matrix::read(reader)?,
		})
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundingSphere {
	pub center: [f32; 3],
	pub radius: f32,
}

impl BoundingSphere {
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		Ok(BoundingSphere {
			center: reader.read_vec3()?,
			radius: reader.read_f32()?,
		})
	}
}

/// Read access shared by both mesh payloads.
pub trait Geometry {
	fn vertex_count(&self) -> usize;
	fn vertex(&self, index: usize) -> Option<&Vertex>;
	fn indices(&self) -> &[u16];
	fn material_id(&self) -> i32;
	fn transform_vertices(&mut self, matrix: &Matrix);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
	pub cast_shadows: bool,
	pub visible: bool,
	pub transparent: bool,
	pub vertices: Vec<Vertex>,
	pub indices: Vec<u16>,
	pub material_id: i32,
	pub layer: u32,
	pub lod_in: f32,
	pub lod_out: f32,
	pub bounding_sphere: BoundingSphere,
	pub renderable: bool,
}

impl Mesh {
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		let cast_shadows = reader.read_bool()?;
		let visible = reader.read_bool()?;
		let transparent = reader.read_bool()?;
		let num_vertices = reader.read_count()?;
		let vertices = reader.read_list(num_vertices, Vertex::read)?;
		let num_indices = reader.read_count()?;
		let indices = reader.read_list(num_indices, |r| r.read_u16())?;
		Ok(Mesh {
			cast_shadows,
			visible,
			transparent,
			vertices,
			indices,
			material_id: reader.read_i32()?,
			layer: reader.read_u32()?,
			lod_in: reader.read_f32()?,
			lod_out: reader.read_f32()?,
			bounding_sphere: BoundingSphere::read(reader)?,
			renderable: reader.read_bool()?,
		})
	}
}

impl Geometry for Mesh {
	fn vertex_count(&self) -> usize {
		self.vertices.len()
	}

	fn vertex(&self, index: usize) -> Option<&Vertex> {
		self.vertices.get(index)
	}

	fn indices(&self) -> &[u16] {
		&self.indices
	}

	fn material_id(&self) -> i32 {
		self.material_id
	}

	fn transform_vertices(&mut self, matrix: &Matrix) {
		for vertex in self.vertices.iter_mut() {
			vertex.transform(matrix);
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkinnedMesh {
	pub cast_shadows: bool,
	pub visible: bool,
	pub transparent: bool,
	pub bones: Vec<Bone>,
	pub vertices: Vec<SkinnedVertex>,
	pub indices: Vec<u16>,
	pub material_id: i32,
	pub layer: u32,
	pub lod_in: f32,
	pub lod_out: f32,
}

impl SkinnedMesh {
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		let cast_shadows = reader.read_bool()?;
		let visible = reader.read_bool()?;
		let transparent = reader.read_bool()?;
		let num_bones = reader.read_count()?;
		let bones = reader.read_list(num_bones, Bone::read)?;
		let num_vertices = reader.read_count()?;
		let vertices = reader.read_list(num_vertices, SkinnedVertex::read)?;
		let num_indices = reader.read_count()?;
		let indices = reader.read_list(num_indices, |r| r.read_u16())?;
		Ok(SkinnedMesh {
			cast_shadows,
			visible,
			transparent,
			bones,
			vertices,
			indices,
			material_id: reader.read_i32()?,
			layer: reader.read_u32()?,
			lod_in: reader.read_f32()?,
			lod_out: reader.read_f32()?,
		})
	}
}

impl Geometry for SkinnedMesh {
	fn vertex_count(&self) -> usize {
		self.vertices.len()
	}

	fn vertex(&self, index: usize) -> Option<&Vertex> {
		self.vertices.get(index).map(|v| &v.base)
	}

	fn indices(&self) -> &[u16] {
		&self.indices
	}

	fn material_id(&self) -> i32 {
		self.material_id
	}

	fn transform_vertices(&mut self, matrix: &Matrix) {
		for vertex in self.vertices.iter_mut() {
			vertex.base.transform(matrix);
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
	NotSet,
	Transform(Matrix),
	Mesh(Mesh),
	SkinnedMesh(SkinnedMesh),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub name: String,
	pub active: bool,
	pub kind: NodeKind,
	pub children: Vec<Node>,
}

impl Node {
	pub fn new_transform(name: &str, matrix: Matrix) -> Self {
		Node {
			name: name.to_string(),
			active: true,
			kind: NodeKind::Transform(matrix),
			children: Vec::new(),
		}
	}

	pub fn new_mesh(name: &str, mesh: Mesh) -> Self {
		Node {
			name: name.to_string(),
			active: true,
			kind: NodeKind::Mesh(mesh),
			children: Vec::new(),
		}
	}

	pub fn with_children(mut self, children: Vec<Node>) -> Self {
		self.children = children;
		self
	}

	/// Reads a node and, recursively, exactly as many children as it declares.
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		let node_type = NodeType::try_from(reader.read_i32()?)?;
		let name = reader.read_prefixed_string()?;
		let num_children = reader.read_count()?;
		let active = reader.read_bool()?;

		let kind = match node_type {
			NodeType::NotSet => NodeKind::NotSet,
			NodeType::Transform => NodeKind::Transform(Matrix::read(reader)?),
			NodeType::Mesh => NodeKind::Mesh(Mesh::read(reader)?),
			NodeType::SkinnedMesh => NodeKind::SkinnedMesh(SkinnedMesh::read(reader)?),
		};

		let children = reader.read_list(num_children, Node::read)?;

		Ok(Node {
			name,
			active,
			kind,
			children,
		})
	}

	pub fn node_type(&self) -> NodeType {
		match self.kind {
			NodeKind::NotSet => NodeType::NotSet,
			NodeKind::Transform(_) => NodeType::Transform,
			NodeKind::Mesh(_) => NodeType::Mesh,
			NodeKind::SkinnedMesh(_) => NodeType::SkinnedMesh,
		}
	}

	pub fn is_transform(&self) -> bool {
		matches!(self.kind, NodeKind::Transform(_))
	}

	pub fn matrix(&self) -> Option<&Matrix> {
		match &self.kind {
			NodeKind::Transform(matrix) => Some(matrix),
			_ => None,
		}
	}

	pub fn matrix_mut(&mut self) -> Option<&mut Matrix> {
		match &mut self.kind {
			NodeKind::Transform(matrix) => Some(matrix),
			_ => None,
		}
	}

	pub fn geometry(&self) -> Option<&dyn Geometry> {
		match &self.kind {
			NodeKind::Mesh(mesh) => Some(mesh as &dyn Geometry),
			NodeKind::SkinnedMesh(mesh) => Some(mesh as &dyn Geometry),
			_ => None,
		}
	}

	pub fn geometry_mut(&mut self) -> Option<&mut dyn Geometry> {
		match &mut self.kind {
			NodeKind::Mesh(mesh) => Some(mesh as &mut dyn Geometry),
			NodeKind::SkinnedMesh(mesh) => Some(mesh as &mut dyn Geometry),
			_ => None,
		}
	}

	pub fn count_nodes(&self) -> usize {
		1 + self.children.iter().map(Node::count_nodes).sum::<usize>()
	}

	/// Pre-order depth-first search for the first node with this type and name.
	pub fn find(&self, node_type: NodeType, name: &str) -> Option<&Node> {
		let path = self.find_path(node_type, name)?;
		self.node_at(&path)
	}

	pub fn find_mut(&mut self, node_type: NodeType, name: &str) -> Option<&mut Node> {
		let path = self.find_path(node_type, name)?;
		self.node_at_mut(&path)
	}

	/// Child indices leading from `self` to the first match; empty when `self` matches.
	pub fn find_path(&self, node_type: NodeType, name: &str) -> Option<Vec<usize>> {
		if self.node_type() == node_type && self.name == name {
			return Some(Vec::new());
		}
		for (i, child) in self.children.iter().enumerate() {
			if let Some(mut path) = child.find_path(node_type, name) {
				path.insert(0, i);
				return Some(path);
			}
		}
		None
	}

	pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
		let mut node = self;
		for i in path {
			node = node.children.get(*i)?;
		}
		Some(node)
	}

	pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
		let mut node = self;
		for i in path {
			node = node.children.get_mut(*i)?;
		}
		Some(node)
	}

	/// Detaches the child at `index`; `None` if there is no such child.
	pub fn remove_child(&mut self, index: usize) -> Option<Node> {
		if index < self.children.len() {
			Some(self.children.remove(index))
		} else {
			None
		}
	}

	/// Detaches the node at `path` from its parent. The node the path is
	/// relative to cannot detach itself.
	pub fn detach(&mut self, path: &[usize]) -> Option<Node> {
		let (last, parent_path) = path.split_last()?;
		self.node_at_mut(parent_path)?.remove_child(*last)
	}

	/// Bottom-up: a transform child left without children after its own
	/// subtree was pruned is dropped. Meshes always stay.
	pub fn remove_empty_nodes(&mut self) {
		for child in self.children.iter_mut() {
			child.remove_empty_nodes();
		}
		self.children.retain(|child| !(child.is_transform() && child.children.is_empty()));
	}

	/// Drops every inactive transform child together with its subtree.
	pub fn remove_inactive_nodes(&mut self) {
		self.children.retain(|child| !(child.is_transform() && !child.active));
		for child in self.children.iter_mut() {
			child.remove_inactive_nodes();
		}
	}

	/// Bakes `matrix` and every transform below it into the leaf vertices,
	/// leaving each transform node with an identity local matrix.
	pub fn transform(&mut self, matrix: &Matrix) {
		match &mut self.kind {
			NodeKind::Transform(local) => {
				let composed = matrix.multiply(local);
				local.make_identity();
				for child in self.children.iter_mut() {
					child.transform(&composed);
				}
			}
			NodeKind::Mesh(mesh) => mesh.transform_vertices(matrix),
			NodeKind::SkinnedMesh(mesh) => mesh.transform_vertices(matrix),
			NodeKind::NotSet => {
				for child in self.children.iter_mut() {
					child.transform(matrix);
				}
			}
		}
	}

	/// Effective matrix of the node at `path`: every transform from `self`
	/// down to and including that node, composed without mutating anything.
	pub fn world_transform(&self, path: &[usize]) -> Option<Matrix> {
		let mut node = self;
		let mut world = Matrix::IDENTITY;
		if let Some(local) = node.matrix() {
			world = world.multiply(local);
		}
		for i in path {
			node = node.children.get(*i)?;
			if let Some(local) = node.matrix() {
				world = world.multiply(local);
			}
		}
		Some(world)
	}
}
