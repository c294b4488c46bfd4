use vidgate_core::Config;
use vidgate_extractor::YtDlp;

/// Shared application state. Requests share no mutable state beyond the
/// filesystem namespace of randomized temp files, so this is plain data
/// behind an `Arc`.
pub struct AppState {
    pub config: Config,
    pub extractor: YtDlp,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let extractor = YtDlp::new(config.ytdlp_path(), config.download_dir());
        Self { config, extractor }
    }
}
