//! ロガーの設定。

use std::path::Path;

use ftlog::appender::FileAppender;
use ftlog::{LevelFilter, LoggerGuard};

/// `ftlog`をグローバルロガーとして登録します。
///
/// `log_file`が指定されればそのファイルへ、なければ標準エラー出力へ書き出します。
/// 返された`LoggerGuard`が破棄されると、残っているログが書き出されます。
pub fn configure_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<LoggerGuard, String> {
    let builder = ftlog::Builder::new().max_log_level(level);
    let builder = match log_file {
        Some(path) => builder.root(FileAppender::new(path)),
        None => builder.root(std::io::stderr()),
    };
    builder.try_init().map_err(|e| e.to_string())
}
