//! 日志初始化
use crate::config::LoggingConfig;
use tracing::Level;

/// 解析日志级别，无法识别时使用 info
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// 安装全局 fmt 订阅者
///
/// 返回本次是否安装成功。已经安装过订阅者时不做任何事并返回 `false`。
pub fn init_logging(config: &LoggingConfig) -> bool {
    let installed = tracing_subscriber::fmt()
        .with_max_level(parse_level(&config.level))
        .with_target(config.with_target)
        .with_ansi(config.ansi)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("[LOGGER] 日志已初始化: level={}", config.level);
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level(" warning "), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("info"), Level::INFO);
    }

    #[test]
    fn test_parse_level_falls_back_to_info() {
        assert_eq!(parse_level(""), Level::INFO);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }

    #[test]
    fn test_init_logging_twice_is_noop() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            with_target: true,
            ansi: false,
        };
        // 其它测试可能已经安装过订阅者，第二次调用一定不会成功
        let _ = init_logging(&config);
        assert!(!init_logging(&config));
    }
}
