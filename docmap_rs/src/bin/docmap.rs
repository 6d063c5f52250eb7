use std::process::ExitCode;

fn main() -> ExitCode {
    docmap::cli::entrypoint::run()
}
