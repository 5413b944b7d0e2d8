pub mod ac3d;
pub mod byte_stream;
pub mod c_exports;
pub mod convert;
pub mod dump;
pub mod error;
pub mod kn5;
pub mod knh;
pub mod material;
pub mod matrix;
pub mod node;
pub mod pruner;
pub mod textures;

#[cfg(test)]
mod test_util;

pub use error::{Kn5Error, Result};
pub use kn5::{read_kn5, read_kn5_from_bytes, Model, Texture};
pub use matrix::Matrix;
pub use node::{Node, NodeKind, NodeType};
