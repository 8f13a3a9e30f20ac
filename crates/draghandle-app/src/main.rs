//! Demo entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting DragHandle demo");

    let states = draghandle_app::demo::run();
    log::info!("Switch states: {:?}", states);
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
