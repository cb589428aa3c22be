use std::process::ExitCode;

fn main() -> ExitCode {
    match timeboard_core::run(std::env::args_os().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("timeboard: {err:#}");
            ExitCode::FAILURE
        }
    }
}
