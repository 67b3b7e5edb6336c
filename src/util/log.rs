use std::sync::atomic::{AtomicU8, Ordering};

pub const LEVEL_ERROR: u8 = 0;
pub const LEVEL_WARN: u8 = 1;
pub const LEVEL_INFO: u8 = 2;
pub const LEVEL_DEBUG: u8 = 3;

static LEVEL: AtomicU8 = AtomicU8::new(LEVEL_INFO);

pub fn set_level(level: u8) {
    LEVEL.store(level.min(LEVEL_DEBUG), Ordering::Relaxed);
}

pub fn get_level() -> u8 {
    LEVEL.load(Ordering::Relaxed)
}

#[inline]
pub fn enabled(level: u8) -> bool {
    level <= get_level()
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        if $crate::util::log::enabled($crate::util::log::LEVEL_ERROR) {
            eprintln!(
                "[ERROR]({}:{}) {}",
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        if $crate::util::log::enabled($crate::util::log::LEVEL_WARN) {
            eprintln!(
                "[WARN]({}:{}) {}",
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        if $crate::util::log::enabled($crate::util::log::LEVEL_INFO) {
            eprintln!(
                "[INFO]({}:{}) {}",
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::util::log::enabled($crate::util::log::LEVEL_DEBUG) {
            eprintln!(
                "[DEBUG]({}:{}) {}",
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}

#[test]
fn test_level() {
    set_level(99);
    assert_eq!(get_level(), LEVEL_DEBUG);
    assert!(enabled(LEVEL_ERROR));
    set_level(LEVEL_INFO);
    assert!(!enabled(LEVEL_DEBUG));
    assert!(enabled(LEVEL_WARN));
}
