use std::{fs, path::{Path, PathBuf}};

use log::info;

use crate::{
	ac3d::{write_model, ExportOptions},
	dump::dump_model_to_file,
	error::{Kn5Error, Result},
	kn5::read_kn5,
	matrix::Matrix,
	node::NodeType,
	pruner::{extract, remove, ExtractMode},
	textures::write_textures,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
	pub node_name: String,
	pub mode: ExtractMode,
	/// Written next to the primary output.
	pub file_name: String,
}

/// Everything one conversion needs; defaults produce a plain `.ac` with the
/// raw textures beside it.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertOptions {
	pub convert_textures_to_png: bool,
	pub output_acc: bool,
	pub use_diffuse: bool,
	pub write_textures: bool,
	pub write_dump: bool,
	/// Baked into every exported tree.
	pub conversion: Matrix,
	pub extractions: Vec<Extraction>,
	pub removals: Vec<(NodeType, String)>,
}

impl Default for ConvertOptions {
	fn default() -> Self {
		ConvertOptions {
			convert_textures_to_png: false,
			output_acc: false,
			use_diffuse: false,
			write_textures: true,
			write_dump: false,
			conversion: Matrix::IDENTITY,
			extractions: Vec::new(),
			removals: Vec::new(),
		}
	}
}

impl ConvertOptions {
	pub fn export_options(&self) -> ExportOptions {
		ExportOptions {
			convert_textures_to_png: self.convert_textures_to_png,
			output_acc: self.output_acc,
			use_diffuse: self.use_diffuse,
		}
	}
}

/// Converts one kn5 file and returns the path of the primary output.
/// Extractions run before removals, and both before the primary tree is
/// baked and pruned.
pub fn convert_kn5<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output_dir: Q, options: &ConvertOptions) -> Result<PathBuf> {
	let input = input.as_ref();
	let output_dir = output_dir.as_ref();
	let stem = input.file_stem()
		.and_then(|s| s.to_str())
		.ok_or_else(|| Kn5Error::Format(format!("Invalid input path: {}", input.display())))?;

	let mut model = read_kn5(input)?;
	fs::create_dir_all(output_dir)?;

	if options.write_dump {
		dump_model_to_file(output_dir.join(format!("{}.dump", stem)), &model)?;
	}
	if options.write_textures {
		write_textures(&model, output_dir, options.convert_textures_to_png)?;
	}

	let export_options = options.export_options();
	for extraction in options.extractions.iter() {
		let path = output_dir.join(&extraction.file_name);
		if !extract(&mut model, &extraction.node_name, extraction.mode, &options.conversion, &path, &export_options)? {
			info!("No {} to extract", extraction.node_name);
		}
	}
	for (node_type, name) in options.removals.iter() {
		remove(&mut model, *node_type, name);
	}

	model.root.transform(&options.conversion);
	model.root.remove_empty_nodes();

	let extension = if options.output_acc { "acc" } else { "ac" };
	let output = output_dir.join(format!("{}.{}", stem, extension));
	write_model(&output, &model, &model.root, &export_options)?;
	Ok(output)
}
