// StableBuddy - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. .env loading, startup checks (credential, output directory), model load
// 4. eframe GUI launch
//
// Any failure in steps 2-3 exits before a window is created.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can still use
// `crate::app::...`, `crate::ui::...` etc.
pub use stablebuddy::app;
pub use stablebuddy::core;
pub use stablebuddy::platform;
pub use stablebuddy::ui;
pub use stablebuddy::util;

use clap::Parser;
use std::sync::Arc;

/// Stable Buddy - type a prompt, generate an image, save it.
///
/// Requires the AUTH_TOKEN environment variable (or the variable named in
/// config.toml) to hold a model hub access token. A `.env` file in the
/// working directory is read first; it never overrides a set variable.
#[derive(Parser, Debug)]
#[command(name = "StableBuddy", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Log a fatal startup error, print it for users without a console log, and
/// exit non-zero.
fn fail_startup(error: &dyn std::error::Error) -> ! {
    tracing::error!(error = %error, "Startup failed");
    eprintln!("Error: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    // .env before anything reads the environment, RUST_LOG included.
    let dotenv_warning = platform::config::load_dotenv();

    // Config first so its log level and file can shape the subscriber.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (config, config_warnings) = platform::config::load_config(&platform_paths.config_dir);

    let _log_guard = util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "StableBuddy starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }
    if let Some(warning) = dotenv_warning {
        tracing::warn!(warning = %warning, "Environment file warning");
    }

    let model = match app::startup::prepare(&config, |var| std::env::var(var).ok())
        .and_then(|credential| app::startup::load_model(&config, credential))
    {
        Ok(model) => model,
        Err(e) => fail_startup(&e),
    };

    let state = app::state::AppState::new(model.info(), config.output_path(), config.dark_mode);
    let generation = app::generation::GenerationManager::new(Arc::new(model));

    tracing::info!(output = %config.output_path().display(), "Ready to launch GUI");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(util::constants::APP_NAME)
            .with_inner_size([
                util::constants::WINDOW_WIDTH,
                util::constants::WINDOW_HEIGHT,
            ])
            .with_min_inner_size([
                util::constants::WINDOW_WIDTH,
                util::constants::WINDOW_HEIGHT,
            ]),
        ..Default::default()
    };

    let dark_mode = config.dark_mode;
    let result = eframe::run_native(
        util::constants::APP_ID,
        native_options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, dark_mode);
            Ok(Box::new(gui::StableBuddyApp::new(state, generation)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch StableBuddy GUI: {e}");
        std::process::exit(1);
    }
}
