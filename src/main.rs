use log::{debug, error};
use longdpole::app::State;

fn main() {
    std::env::set_var("RUST_LOG", "longdpole=debug");
    env_logger::init();
    debug!("Debug on");
    // The balance view model spawns its rollout task with tokio; entering
    // a runtime here makes that possible from iced's update callbacks.
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Could not start a tokio runtime: {e}");
            return;
        }
    };
    let _guard = runtime.enter();
    let _ = iced::application("Long Double-Pole Balancing", State::update, State::view)
        .window_size(iced::Size::new(700.0, 560.0))
        .subscription(State::subscription)
        .run();
}
