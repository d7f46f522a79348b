fn main() {
    if let Ok(value) = std::env::var("MP_BUILD_VERSION") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            println!("cargo:rustc-env=MP_BUILD_VERSION={trimmed}");
        }
    }
}
