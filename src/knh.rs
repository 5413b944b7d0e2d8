use std::{fs::File, io::{BufReader, Read, Write}, path::Path};

use crate::{byte_stream::ByteReader, dump::dump_matrix, error::Result, matrix::Matrix};

/// One entry of a `.knh` hierarchy file: a named matrix with nested entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KnhEntry {
	pub name: String,
	pub matrix: Matrix,
	pub children: Vec<KnhEntry>,
}

impl KnhEntry {
	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		let name = reader.read_prefixed_string()?;
		let matrix = Matrix::read(reader)?;
		let num_children = reader.read_count()?;
		let children = reader.read_list(num_children, KnhEntry::read)?;
		Ok(KnhEntry { name, matrix, children })
	}

	pub fn find(&self, name: &str) -> Option<&KnhEntry> {
		if self.name == name {
			return Some(self);
		}
		self.children.iter().find_map(|child| child.find(name))
	}

	pub fn dump<W: Write>(&self, out: &mut W, indent: &str) -> Result<()> {
		writeln!(out, "{indent}name: {}", self.name)?;
		dump_matrix(out, &self.matrix, indent)?;
		writeln!(out, "{indent}children: {}", self.children.len())?;
		let nested = format!("{indent}    ");
		for (i, child) in self.children.iter().enumerate() {
			writeln!(out, "{indent}  children[{i}]")?;
			child.dump(out, &nested)?;
		}
		Ok(())
	}
}

pub fn read_knh<P: AsRef<Path>>(path: P) -> Result<KnhEntry> {
	let file = File::open(path)?;
	let mut reader = ByteReader::new(BufReader::new(file));
	KnhEntry::read(&mut reader)
}
