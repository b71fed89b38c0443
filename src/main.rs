// SPDX-License-Identifier: MPL-2.0
use meme_machine::app::{self, Command};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let command = match app::parse_args(pico_args::Arguments::from_env()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{}", app::HELP);
            return ExitCode::FAILURE;
        }
    };

    let result = match command {
        Command::Help => {
            print!("{}", app::HELP);
            Ok(())
        }
        Command::Serve(flags) => app::serve(flags).await,
        Command::Caption(flags) => app::caption(flags).await.map(|outcome| {
            for (index, caption) in outcome.captions.iter().enumerate() {
                log::info!("{}. {caption}", index + 1);
            }
            println!("{}", outcome.chosen);
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
