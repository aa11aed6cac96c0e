fn main() {
    // Set the deployment target to match our minimum system version
    println!("cargo:rustc-env=MACOSX_DEPLOYMENT_TARGET=10.15");

    // The remote player page calls these through the capability in capabilities/remote.json
    tauri_build::try_build(
        tauri_build::Attributes::new().app_manifest(
            tauri_build::AppManifest::new().commands(&["page_notification", "relay_probe"]),
        ),
    )
    .expect("failed to run tauri-build");
}
