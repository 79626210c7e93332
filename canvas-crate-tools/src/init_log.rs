use std::io::Write;

/// 初始化全局日志
///
/// 重复调用时保留第一次安装的 logger，返回 `false`。
pub fn init_log(level: log::LevelFilter) -> bool {
    env_logger::Builder::new()
        .format(|buf, record| {
            let info_style = buf
                .default_level_style(log::Level::Info)
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green)));
            let warn_style = buf
                .default_level_style(log::Level::Warn)
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow)));
            let error_style = buf
                .default_level_style(log::Level::Error)
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red)));
            let trace_style = buf
                .default_level_style(log::Level::Trace)
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Magenta)));

            let level_style = match record.level() {
                log::Level::Info => info_style,
                log::Level::Warn => warn_style,
                log::Level::Error => error_style,
                log::Level::Trace => trace_style,
                _ => buf.default_level_style(record.level()),
            };
            let grey_style = info_style.fg_color(Some(anstyle::Color::Rgb(anstyle::RgbColor(110, 110, 110))));

            let time = chrono::Local::now().format("%H:%M:%S%.3f");
            let level = record.level();
            // 缓存的日志来自多个线程，线程名比文件行号更有用
            let thread = std::thread::current();
            let thread_name = thread.name().unwrap_or("<unnamed>");
            let target = record.target();

            writeln!(
                buf,
                "{level_style}[{time}] {level}{level_style:#} {grey_style}[{thread_name}] {target}{grey_style:#} {}",
                record.args()
            )
        })
        .filter(None, level)
        .try_init()
        .is_ok()
}

/// 按名称解析日志级别，无法识别时退回 `Info`
pub fn parse_level(name: &str) -> log::LevelFilter {
    name.parse().unwrap_or(log::LevelFilter::Info)
}
