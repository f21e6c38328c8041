use cbindgen::Builder;
use std::env;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();

    // Generate C header file for hosts linking against the cdylib
    Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("LZMA2_INTERFACE_H")
        .with_sys_include("stddef.h")
        .with_sys_include("stdint.h")
        .generate()
        .expect("Unable to generate bindings")
        .write_to_file("lzma2_interface.h");

    println!("cargo:rerun-if-changed=src/lib.rs");
}
