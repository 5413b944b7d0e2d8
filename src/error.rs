use thiserror::Error;

#[derive(Error, Debug)]
pub enum Kn5Error {
	#[error("format error: {0}")]
	Format(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Kn5Error>;
