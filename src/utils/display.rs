//! Styled output helpers.
//!
//! Every macro takes the sink to write to as its first argument and evaluates
//! to the `std::io::Result<()>` of the underlying `writeln!`, so callers need
//! `std::io::Write` in scope.

#[macro_export]
macro_rules! success {
    ($out:expr, $($arg:tt)*) => {{
        writeln!(
            $out,
            "{}{}",
            ::yansi::Paint::masked("✅  ").fg(::yansi::Color::Green),
            ::yansi::Paint::green(format!($($arg)*))
        )
    }};
}

#[macro_export]
macro_rules! error {
    ($out:expr, $($arg:tt)*) => {{
        writeln!(
            $out,
            "{}{}",
            ::yansi::Paint::masked("❌  ").fg(::yansi::Color::Red),
            ::yansi::Paint::red(format!($($arg)*))
        )
    }};
}

#[macro_export]
macro_rules! warning {
    ($out:expr, $($arg:tt)*) => {{
        writeln!(
            $out,
            "{}{}",
            ::yansi::Paint::masked("⚠  ").fg(::yansi::Color::Yellow),
            ::yansi::Paint::yellow(format!($($arg)*))
        )
    }};
}

#[macro_export]
macro_rules! title {
    ($out:expr, $icon:tt, $($arg:tt)*) => {{
        writeln!(
            $out,
            "{}  {}",
            ::yansi::Paint::masked($icon).fg(::yansi::Color::Cyan),
            ::yansi::Paint::cyan(format!($($arg)*)).bold()
        )
    }};
}

#[macro_export]
macro_rules! tip {
    ($out:expr, $($arg:tt)*) => {{
        writeln!(
            $out,
            "{}{}",
            ::yansi::Paint::masked("💡  ").fg(::yansi::Color::Yellow),
            ::yansi::Paint::yellow(format!($($arg)*)).italic()
        )
    }};
}
