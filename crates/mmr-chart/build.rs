// File: crates/mmr-chart/build.rs
// Summary: Links the Windows system libraries Skia/ICU expect at link time.

fn main() {
    #[cfg(target_os = "windows")]
    {
        // RegOpenKeyExW / RegQueryInfoKeyW come from ICU's data lookup.
        println!("cargo:rustc-link-lib=advapi32");
    }
}
