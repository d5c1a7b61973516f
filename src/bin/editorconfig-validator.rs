use std::process::ExitCode;

use editorconfig_validator::cli::run;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    run().await
}
