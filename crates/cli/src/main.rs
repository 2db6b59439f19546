use std::process::ExitCode;

fn main() -> ExitCode {
    boutique_cli::run()
}
