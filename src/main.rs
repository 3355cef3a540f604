//! Entry point for the `ts-translator` command.

use std::io::Write;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use ts_translator::cli::{
    self,
    CliError,
    Status,
};

#[tokio::main]
async fn main() -> ExitCode {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(writer)
        .init();

    let result = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => {
            let mut stdout = std::io::stdout().lock();
            cli::run(command, &mut stdout).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(Status::Success) => ExitCode::SUCCESS,
        Ok(Status::Failure) => ExitCode::from(1),
        Err(e) => {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "error: {e}");
            if matches!(e, CliError::Usage(_)) {
                let _ = write!(stderr, "\n{}", cli::USAGE);
            }
            ExitCode::from(2)
        }
    }
}
