use std::io::Read;

use crate::{byte_stream::ByteReader, error::Result};

/// Row-major 4x4 matrix, row-vector convention: translation lives in row 3.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
	pub data: [[f32; 4]; 4],
}

impl Default for Matrix {
	fn default() -> Self {
		Matrix::IDENTITY
	}
}

impl Matrix {
	pub const IDENTITY: Matrix = Matrix {
		data: [
			[1.0, 0.0, 0.0, 0.0],
			[0.0, 1.0, 0.0, 0.0],
			[0.0, 0.0, 1.0, 0.0],
			[0.0, 0.0, 0.0, 1.0],
		],
	};

	pub fn from_rows(data: [[f32; 4]; 4]) -> Self {
		Matrix { data }
	}

	pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
		let mut matrix = Matrix::IDENTITY;
		matrix.data[3] = [x, y, z, 1.0];
		matrix
	}

	pub fn from_scale(x: f32, y: f32, z: f32) -> Self {
		let mut matrix = Matrix::IDENTITY;
		matrix.data[0][0] = x;
		matrix.data[1][1] = y;
		matrix.data[2][2] = z;
		matrix
	}

	pub fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
		let mut data = [[0.0; 4]; 4];
		for row in data.iter_mut() {
			*row = reader.read_vec4()?;
		}
		Ok(Matrix { data })
	}

	/// `a.multiply(b)` places `b` first: the result maps a point through `b`
	/// and then through `a`. Composing a parent with a child's local matrix is
	/// therefore `parent.multiply(local)`.
	pub fn multiply(&self, other: &Matrix) -> Matrix {
		let mut dst = [[0.0; 4]; 4];
		for i in 0..4 {
			for j in 0..4 {
				dst[i][j] = other.data[i][0] * self.data[0][j]
					+ other.data[i][1] * self.data[1][j]
					+ other.data[i][2] * self.data[2][j]
					+ other.data[i][3] * self.data[3][j];
			}
		}
		Matrix { data: dst }
	}

	pub fn make_identity(&mut self) {
		*self = Matrix::IDENTITY;
	}

	pub fn is_identity(&self) -> bool {
		self.data == Matrix::IDENTITY.data
	}

	/// Not a decomposition: any change to the upper 3x3 counts, scale included.
	pub fn is_rotation(&self) -> bool {
		(0..3).any(|i| (0..3).any(|j| self.data[i][j] != Matrix::IDENTITY.data[i][j]))
	}

	pub fn is_translation(&self) -> bool {
		self.data[3][..3].iter().any(|v| *v != 0.0)
	}

	/// Homogeneous point, translation applies.
	pub fn transform_point(&self, p: [f32; 3]) -> [f32; 3] {
		let m = &self.data;
		[
			p[0] * m[0][0] + p[1] * m[1][0] + p[2] * m[2][0] + m[3][0],
			p[0] * m[0][1] + p[1] * m[1][1] + p[2] * m[2][1] + m[3][1],
			p[0] * m[0][2] + p[1] * m[1][2] + p[2] * m[2][2] + m[3][2],
		]
	}

	/// Direction, upper 3x3 only.
	pub fn transform_vector(&self, v: [f32; 3]) -> [f32; 3] {
		let m = &self.data;
		[
			v[0] * m[0][0] + v[1] * m[1][0] + v[2] * m[2][0],
			v[0] * m[0][1] + v[1] * m[1][1] + v[2] * m[2][1],
			v[0] * m[0][2] + v[1] * m[1][2] + v[2] * m[2][2],
		]
	}

	pub fn approx_eq(&self, other: &Matrix, epsilon: f32) -> bool {
		self.data.iter().flatten()
			.zip(other.data.iter().flatten())
			.all(|(a, b)| (a - b).abs() <= epsilon)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Matrix {
		Matrix::from_rows([
			[0.0, 1.0, 0.0, 0.0],
			[-1.0, 0.0, 0.0, 0.0],
			[0.0, 0.0, 2.0, 0.0],
			[3.0, -4.0, 5.0, 1.0],
		])
	}

	#[test]
	fn identity_is_neutral_on_both_sides() {
		let m = sample();
		assert!(m.multiply(&Matrix::IDENTITY).approx_eq(&m, 1e-6));
		assert!(Matrix::IDENTITY.multiply(&m).approx_eq(&m, 1e-6));
	}

	#[test]
	fn multiply_applies_argument_first() {
		let parent = Matrix::from_translation(10.0, 0.0, 0.0);
		let local = Matrix::from_scale(2.0, 2.0, 2.0);
		let composed = parent.multiply(&local);
		// scaled first, then moved
		assert_eq!(composed.transform_point([1.0, 1.0, 1.0]), [12.0, 2.0, 2.0]);
		let reversed = local.multiply(&parent);
		assert_eq!(reversed.transform_point([1.0, 1.0, 1.0]), [22.0, 2.0, 2.0]);
	}

	#[test]
	fn classifiers_are_structural() {
		assert!(Matrix::IDENTITY.is_identity());
		assert!(!Matrix::IDENTITY.is_rotation());
		assert!(!Matrix::IDENTITY.is_translation());

		let translation = Matrix::from_translation(0.0, 0.0, 1.0);
		assert!(!translation.is_identity());
		assert!(!translation.is_rotation());
		assert!(translation.is_translation());

		// pure scale is reported as rotation
		let scale = Matrix::from_scale(1.0, 3.0, 1.0);
		assert!(scale.is_rotation());
		assert!(!scale.is_translation());

		// w column does not affect either classifier
		let mut projective = Matrix::IDENTITY;
		projective.data[0][3] = 0.5;
		assert!(!projective.is_identity());
		assert!(!projective.is_rotation());
		assert!(!projective.is_translation());
	}

	#[test]
	fn vectors_ignore_translation() {
		let m = sample();
		assert_eq!(m.transform_vector([1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]);
		assert_eq!(m.transform_point([1.0, 0.0, 0.0]), [3.0, -3.0, 5.0]);
	}
}
