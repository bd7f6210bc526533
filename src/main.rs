mod app;
mod config;
mod engine;
mod library;
mod mpris;
mod runtime;
mod session;
mod store;
mod ui;

fn main() {
    if let Err(e) = runtime::run() {
        // The subscriber may not be installed yet, so say it on stderr too.
        tracing::error!(error = %e, "replay stopped");
        eprintln!("replay: {e}");
        std::process::exit(1);
    }
}
