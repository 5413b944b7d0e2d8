use std::env;

fn main() {
	let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();

	println!("cargo:rerun-if-changed=src/c_exports.rs");
	cbindgen::Builder::new()
		.with_src("src/c_exports.rs")
		.with_config(cbindgen::Config::from_root_or_default(crate_dir))
		.with_language(cbindgen::Language::C)
		.generate()
		.expect("Unable to generate bindings")
		.write_to_file("target/kn5_to_ac3d.h");
}
