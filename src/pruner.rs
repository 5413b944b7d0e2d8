use std::path::Path;

use log::{info, warn};

use crate::{
	ac3d::{write_model, ExportOptions},
	error::Result,
	kn5::Model,
	matrix::Matrix,
	node::{Node, NodeType},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtractMode {
	/// Export the matching transform node itself.
	#[default]
	Node,
	/// Export the matching node's only child.
	SingleChild,
}

/// A standalone copy of a named transform subtree, ready for export, plus
/// where the original sits in the primary tree.
pub struct Extracted {
	pub path: Vec<usize>,
	pub node: Node,
}

/// Copies the first transform named `name` (or its single child), resets the
/// copy's local matrix, prunes inactive nodes and bakes `conversion` into it.
/// The primary tree is left untouched.
pub fn prepare_extraction(model: &Model, name: &str, mode: ExtractMode, conversion: &Matrix) -> Option<Extracted> {
	let path = model.root.find_path(NodeType::Transform, name)?;
	let original = model.root.node_at(&path)?;
	let mut node = match mode {
		ExtractMode::Node => original.clone(),
		ExtractMode::SingleChild => {
			if original.children.len() != 1 {
				warn!("{} has {} children, expected exactly one", name, original.children.len());
			}
			original.children.first()?.clone()
		}
	};
	if let Some(matrix) = node.matrix_mut() {
		matrix.make_identity();
	}
	node.remove_inactive_nodes();
	node.transform(conversion);
	Some(Extracted { path, node })
}

/// Exports the named subtree to its own file, then detaches the original so
/// the primary export no longer contains it. `Ok(false)` when there is
/// nothing by that name.
pub fn extract<P: AsRef<Path>>(
	model: &mut Model,
	name: &str,
	mode: ExtractMode,
	conversion: &Matrix,
	path: P,
	options: &ExportOptions,
) -> Result<bool> {
	let Some(extracted) = prepare_extraction(model, name, mode, conversion) else {
		return Ok(false);
	};
	write_model(path, model, &extracted.node, options)?;
	if model.root.detach(&extracted.path).is_none() {
		warn!("{} is the scene root and stays in the primary tree", name);
	}
	info!("Extracted {}", name);
	Ok(true)
}

/// Detaches the first node with this type and name without exporting it.
pub fn remove(model: &mut Model, node_type: NodeType, name: &str) -> bool {
	let removed = model.root
		.find_path(node_type, name)
		.and_then(|path| model.root.detach(&path));
	match removed {
		Some(node) => {
			info!("Removed {} {}", node.node_type(), node.name);
			true
		}
		None => false,
	}
}
