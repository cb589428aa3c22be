mod api;
mod app;
mod dom;
mod storage;

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting time tracking dashboard"
  );

  wasm_bindgen_futures::spawn_local(
    app::start()
  );
}
