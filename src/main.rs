use std::process::ExitCode;

fn main() -> ExitCode {
    match notesketch::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("could not read note ({}): {}", err.kind(), err);
            ExitCode::FAILURE
        }
    }
}
