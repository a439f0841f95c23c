use std::process::ExitCode;

use spinning_circles::SceneConfig;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SceneConfig::default();
    log::info!(
        "Starting with {} circles, keys 1-{} toggle them",
        config.circles.len(),
        config.circles.len()
    );

    run(config)
}

#[cfg(windows)]
fn run(config: SceneConfig) -> ExitCode {
    match spinning_circles::platform::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(windows))]
fn run(_config: SceneConfig) -> ExitCode {
    log::error!("The circle window needs the Win32 platform layer; only Windows is supported");
    ExitCode::FAILURE
}
