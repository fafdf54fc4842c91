/// 解析命令行参数和配置文件
pub mod config;

/// 日志格式
pub mod log_format;
