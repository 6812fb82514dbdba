mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use cli::{parse_args, print_completion, ParseOutcome};
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use domain::RoutineCommand;
use ports::inbound::UseCaseRunner;
use std::io::{self, Write};
use std::process;
use wiring::{wire_routine, App};

/// RoutineCommand をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&mut self, cmd: RoutineCommand) -> Result<i32, Error> {
        let command_name = cmd.name();
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let stdout = io::stdout();
        let mut out = stdout.lock();
        let use_case = &mut self.app.use_case;
        let result = match cmd {
            RoutineCommand::Products { category, search } => {
                use_case.products(category.as_deref(), search.as_deref(), &mut out)
            }
            RoutineCommand::Categories => use_case.categories(&mut out),
            RoutineCommand::Selected => use_case.selected(&mut out),
            RoutineCommand::Toggle { name } => use_case.toggle(&name, &mut out),
            RoutineCommand::Remove { position } => use_case.remove(position, &mut out),
            RoutineCommand::Clear => use_case.clear(&mut out),
            RoutineCommand::Generate => use_case.generate(&mut out),
            RoutineCommand::Shell => {
                let stdin = io::stdin();
                let mut input = stdin.lock();
                use_case.shell(&mut input, &mut out)
            }
        };
        let _ = out.flush();

        let code = result.as_ref().copied().unwrap_or_else(|e| e.exit_code());
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            let _ = self.app.logger.log(
                &LogRecord::new(LogLevel::Error, e.to_string())
                    .layer("cli")
                    .kind("error"),
            );
        }
        result
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("routine: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let app = wire_routine(&config)?;
    let mut runner = Runner { app };
    runner.run(config.command)
}

fn print_usage() {
    eprintln!("Usage: routine [options] [products|categories|selected|toggle|remove|clear|generate|shell]");
    eprintln!("Run `routine --help` for details.");
}
