use huewave::App;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let event_loop = EventLoop::new()
        .map_err(|err| anyhow::anyhow!("failed to create event loop: {err}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop
        .run_app(&mut app)
        .map_err(|err| anyhow::anyhow!("event loop error: {err}"))?;

    Ok(())
}
