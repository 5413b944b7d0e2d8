use std::ffi::{c_char, CStr};

use crate::{convert::{convert_kn5, ConvertOptions}, dump::dump_model_to_file, kn5::read_kn5};

pub const KN5_FLAG_PNG: u32 = 1;
pub const KN5_FLAG_ACC: u32 = 2;
pub const KN5_FLAG_DIFFUSE: u32 = 4;
pub const KN5_FLAG_NO_TEXTURES: u32 = 8;

fn path_arg(ptr: *const c_char) -> Option<String> {
	if ptr.is_null() {
		return None;
	}
	Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

#[no_mangle]
pub extern "C" fn kn5_init_logging() {
	let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

/// Returns 0 on success, -1 on failure.
#[no_mangle]
pub extern "C" fn kn5_convert(input: *const c_char, output_dir: *const c_char, flags: u32) -> i32 {
	let (Some(input), Some(output_dir)) = (path_arg(input), path_arg(output_dir)) else {
		return -1;
	};
	let options = ConvertOptions {
		convert_textures_to_png: flags & KN5_FLAG_PNG != 0,
		output_acc: flags & KN5_FLAG_ACC != 0,
		use_diffuse: flags & KN5_FLAG_DIFFUSE != 0,
		write_textures: flags & KN5_FLAG_NO_TEXTURES == 0,
		..Default::default()
	};
	match convert_kn5(&input, &output_dir, &options) {
		Ok(_) => 0,
		Err(e) => {
			log::error!("Error converting {}: {}", input, e);
			-1
		}
	}
}

#[no_mangle]
pub extern "C" fn kn5_dump(input: *const c_char, dump_path: *const c_char) -> i32 {
	let (Some(input), Some(dump_path)) = (path_arg(input), path_arg(dump_path)) else {
		return -1;
	};
	match read_kn5(&input).and_then(|model| dump_model_to_file(&dump_path, &model)) {
		Ok(()) => 0,
		Err(e) => {
			log::error!("Error dumping {}: {}", input, e);
			-1
		}
	}
}
