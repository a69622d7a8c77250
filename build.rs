use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

// Files the demo loads at start-up. Missing ones only produce a warning here;
// the demo itself reports them and exits with an error.
const REQUIRED_ASSETS: [&str; 4] = ["box.obj", "bricks.png", "normal_map.png", "normal_up.png"];

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");
    if !assets_src.exists() {
        println!("cargo:warning=no assets/ directory found, the demo will fail to start");
        return Ok(());
    }
    for asset in REQUIRED_ASSETS {
        if !assets_src.join(asset).exists() {
            println!("cargo:warning=missing asset assets/{asset}");
        }
    }

    // OUT_DIR is target/<profile>/build/<pkg>/out, the binary lives in target/<profile>.
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let Some(profile_dir) = out_dir.ancestors().nth(3) else {
        return Ok(());
    };
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    copy_items(&[assets_src], profile_dir, &copy_options)?;

    Ok(())
}
