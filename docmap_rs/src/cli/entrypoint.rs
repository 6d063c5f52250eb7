//! Process entry point shared by the `docmap` binary.

use std::any::Any;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::progress;

use super::command::Cli;
use super::dispatch::dispatch;

/// Logs go to stderr; stdout is reserved for rendered output. `RUST_LOG`
/// wins over `--log-level`.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// True for the panic `print!` raises when stdout's reader has gone away,
/// e.g. `docmap generate --format mermaid | head`.
fn is_broken_pipe(payload: &(dyn Any + Send)) -> bool {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str));
    message.is_some_and(|m| m.contains("Broken pipe"))
}

/// A closed stdout ends the run successfully; every other panic keeps the
/// default report.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if is_broken_pipe(info.payload()) {
            debug!("stdout closed by reader, stopping output");
            std::process::exit(0);
        }
        default_hook(info);
    }));
}

/// Parse argv, run the command on a fresh runtime and map the outcome to an
/// exit code.
pub fn run() -> ExitCode {
    install_panic_hook();
    let cli = Cli::parse();
    init_tracing(&cli.global.log_level);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            progress::error(&format!("cannot start async runtime: {err}"));
            return ExitCode::FAILURE;
        }
    };

    let Cli { global, command } = cli;
    match runtime.block_on(dispatch(command, &global)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            progress::error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_pipe_payloads_are_recognised() {
        let static_msg: Box<dyn Any + Send> = Box::new("failed printing to stdout: Broken pipe (os error 32)");
        let owned_msg: Box<dyn Any + Send> =
            Box::new(String::from("failed printing to stdout: Broken pipe (os error 32)"));
        assert!(is_broken_pipe(static_msg.as_ref()));
        assert!(is_broken_pipe(owned_msg.as_ref()));

        let other: Box<dyn Any + Send> = Box::new("index out of bounds");
        let opaque: Box<dyn Any + Send> = Box::new(42_u32);
        assert!(!is_broken_pipe(other.as_ref()));
        assert!(!is_broken_pipe(opaque.as_ref()));
    }
}
