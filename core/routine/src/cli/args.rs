use crate::domain::RoutineCommand;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::{CatalogLocation, ModelName};
use common::error::Error;
use common::llm::SettingsOverrides;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// -v / --verbose: 不具合調査用の冗長ログを stderr に出力する
    pub verbose: bool,
    /// --ephemeral: 選択をディスクに保存しない（このプロセスの間だけ保持）
    pub ephemeral: bool,
    pub catalog: Option<CatalogLocation>,
    pub endpoint: Option<String>,
    pub model: Option<ModelName>,
    pub timeout_secs: Option<u64>,
    pub command: RoutineCommand,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            ephemeral: false,
            catalog: None,
            endpoint: None,
            model: None,
            timeout_secs: None,
            command: RoutineCommand::Shell,
        }
    }
}

impl Config {
    /// config.json の値を上書きする項目
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout_secs,
            catalog: self.catalog.clone(),
        }
    }
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("routine")
        .about("Browse products, build a selection and get a beauty routine from an AI assistant")
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Emit verbose debug logs to stderr (for troubleshooting)")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("catalog")
                .long("catalog")
                .value_name("path|url")
                .help("Product catalog location (file path or http(s) URL)")
                .global(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("endpoint")
                .long("endpoint")
                .value_name("url")
                .help("Chat completion endpoint (POST URL)")
                .global(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Model name sent with each request (e.g. gpt-4o)")
                .global(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("timeout")
                .long("timeout")
                .value_name("secs")
                .help("Timeout for remote calls in seconds")
                .value_parser(value_parser!(u64).range(1..))
                .global(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("ephemeral")
                .long("ephemeral")
                .help("Keep the selection in memory only (nothing is written to disk)")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("completion")
                .long("completion")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .subcommand(
            clap::Command::new("products")
                .about("List products (selected ones are marked)")
                .arg(
                    clap::Arg::new("category")
                        .short('c')
                        .long("category")
                        .value_name("category")
                        .help("Only this category (exact match; `all` for every category)")
                        .num_args(1),
                )
                .arg(
                    clap::Arg::new("search")
                        .short('s')
                        .long("search")
                        .value_name("text")
                        .help("Case-insensitive text in name, brand or description")
                        .num_args(1),
                ),
        )
        .subcommand(clap::Command::new("categories").about("List product categories"))
        .subcommand(clap::Command::new("selected").about("Show the selected products"))
        .subcommand(
            clap::Command::new("toggle")
                .about("Select a product, or unselect it if already selected")
                .arg(
                    clap::Arg::new("name")
                        .help("Product name")
                        .required(true)
                        .num_args(1..)
                        .trailing_var_arg(true),
                ),
        )
        .subcommand(
            clap::Command::new("remove")
                .about("Remove the n-th selected product (as numbered by `selected`)")
                .arg(
                    clap::Arg::new("position")
                        .help("Position, starting at 1")
                        .required(true)
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand(clap::Command::new("clear").about("Remove all selected products"))
        .subcommand(
            clap::Command::new("generate").about("Generate a routine from the selected products"),
        )
        .subcommand(
            clap::Command::new("shell").about("Interactive session (default when no command is given)"),
        )
}

fn subcommand_to_command(matches: &clap::ArgMatches) -> RoutineCommand {
    match matches.subcommand() {
        Some(("products", sub)) => RoutineCommand::Products {
            category: sub.get_one::<String>("category").cloned(),
            search: sub.get_one::<String>("search").cloned(),
        },
        Some(("categories", _)) => RoutineCommand::Categories,
        Some(("selected", _)) => RoutineCommand::Selected,
        Some(("toggle", sub)) => RoutineCommand::Toggle {
            name: sub
                .get_many::<String>("name")
                .map(|words| words.cloned().collect::<Vec<_>>().join(" "))
                .unwrap_or_default(),
        },
        Some(("remove", sub)) => RoutineCommand::Remove {
            position: sub.get_one::<usize>("position").copied().unwrap_or(0),
        },
        Some(("clear", _)) => RoutineCommand::Clear,
        Some(("generate", _)) => RoutineCommand::Generate,
        _ => RoutineCommand::Shell,
    }
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        verbose: matches.get_flag("verbose"),
        ephemeral: matches.get_flag("ephemeral"),
        catalog: matches
            .get_one::<String>("catalog")
            .map(|s| CatalogLocation::new(s.clone())),
        endpoint: matches.get_one::<String>("endpoint").cloned(),
        model: matches
            .get_one::<String>("model")
            .map(|s| ModelName::new(s.clone())),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        command: subcommand_to_command(matches),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(clap_error)?;
    if let Some(&shell) = matches.get_one::<Shell>("completion") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }
    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[&str]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(clap_error)?;
    Ok(matches_to_config(&matches))
}

/// --help / --version は clap の整形済みテキストをそのまま出して終了する
fn clap_error(e: clap::Error) -> Error {
    use clap::error::ErrorKind;
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            std::process::exit(0);
        }
        _ => Error::invalid_argument(e.to_string()),
    }
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "routine", &mut std::io::stdout());
}
