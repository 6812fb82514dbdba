//! 配線: 標準アダプタで UseCase を組み立てる

use std::sync::Arc;

use common::adapter::{
    FileJsonLog, FileKeyValueStore, MemoryKeyValueStore, StderrLog, StdEnvResolver,
    StdFileSystem, TeeLog,
};
use common::error::Error;
use common::llm::{EchoProvider, LlmProvider, OpenAiCompatProvider, Settings};
use common::ports::outbound::{EnvResolver, FileSystem, KeyValueStore, Log, LogLevel};

use crate::adapter::{catalog_source_for, KvSelectionStorage, ProviderCompletion};
use crate::cli::Config;
use crate::usecase::{CatalogLoader, ChatUseCase, RoutineUseCase, SelectionStore};

/// この値を endpoint に指定するとリモートを呼ばずに Echo プロバイダを使う
pub const ECHO_ENDPOINT: &str = "echo";

/// 配線で組み立てた部品（main の Runner が使う）
pub struct App {
    pub use_case: RoutineUseCase,
    pub logger: Arc<dyn Log>,
}

/// 配線: 設定ファイルと CLI 指定から App を組み立てる
pub fn wire_routine(config: &Config) -> Result<App, Error> {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    wire_with(config, fs, env_resolver)
}

/// テストからも使う配線本体
pub fn wire_with(
    config: &Config,
    fs: Arc<dyn FileSystem>,
    env_resolver: Arc<dyn EnvResolver>,
) -> Result<App, Error> {
    let dirs = env_resolver.resolve_dirs()?;
    let logger = build_logger(Arc::clone(&fs), &dirs.log_file(), config.verbose);
    let settings = Settings::load(fs.as_ref(), &dirs.settings_file())?.apply(config.overrides());

    let kv: Arc<dyn KeyValueStore> = if config.ephemeral {
        Arc::new(MemoryKeyValueStore::new())
    } else {
        Arc::new(FileKeyValueStore::new(Arc::clone(&fs), dirs.store_dir()))
    };
    let store = SelectionStore::restore(
        Arc::new(KvSelectionStorage::new(kv)),
        Arc::clone(&logger),
    );

    let source = catalog_source_for(&settings.catalog, Arc::clone(&fs), settings.timeout)?;
    let catalog = CatalogLoader::new(source, Arc::clone(&logger));

    let provider = build_provider(&settings, Arc::clone(&env_resolver))?;
    let chat = ChatUseCase::new(
        Arc::new(ProviderCompletion::new(provider)),
        Arc::clone(&logger),
        settings.routine_max_tokens,
        settings.follow_up_max_tokens,
    );

    Ok(App {
        use_case: RoutineUseCase::new(catalog, store, chat, Arc::clone(&logger)),
        logger,
    })
}

fn build_logger(fs: Arc<dyn FileSystem>, path: &std::path::Path, verbose: bool) -> Arc<dyn Log> {
    let file: Arc<dyn Log> = Arc::new(FileJsonLog::new(fs, path));
    if verbose {
        Arc::new(TeeLog::new(vec![file, Arc::new(StderrLog::new(LogLevel::Debug))]))
    } else {
        file
    }
}

fn build_provider(
    settings: &Settings,
    env_resolver: Arc<dyn EnvResolver>,
) -> Result<Arc<dyn LlmProvider>, Error> {
    if settings.endpoint == ECHO_ENDPOINT {
        return Ok(Arc::new(EchoProvider::new()));
    }
    Ok(Arc::new(OpenAiCompatProvider::new(
        settings.model.to_string(),
        settings.endpoint.clone(),
        settings.api_key_env.clone(),
        settings.timeout,
        env_resolver,
    )?))
}
