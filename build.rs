fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    match rustc_version::version() {
        Ok(version) => println!("cargo:rustc-env=HELLO_CICD_RUSTC_VERSION={version}"),
        Err(e) => println!("cargo:warning=unable to determine rustc version: {e}"),
    }
}
