#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use std::env;
use std::process;

use anyhow::Error;
use bistro::application::cli;
use bistro::configuration::app_dir;
use yansi::Paint;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Bistro has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() != "disabled backtrace" {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

#[tokio::main]
async fn main() {
    better_panic::Settings::auto().install();

    let mut log_guard = None;
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("bistro")
    {
        let debug_log_dir = env::var("BISTRO_LOG_DIR").unwrap_or_else(|_| {
            return app_dir(dirs::cache_dir()).to_string_lossy().to_string();
        });

        let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        log_guard = Some(guard);

        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    let res = cli::parse().await;
    drop(log_guard);

    if let Err(err) = res {
        handle_error(err);
    }

    process::exit(0);
}
