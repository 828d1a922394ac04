#[cfg(not(target_arch = "wasm32"))]
fn main() {
    pinchcam::native_main();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
