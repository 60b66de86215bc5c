use std::process::ExitCode;

fn main() -> ExitCode {
  lift_log_lib::run()
}
