#![allow(dead_code)]

use dayflags::DayFlagValues;

pub fn flag(date: &str, state: i64) -> DayFlagValues {
    DayFlagValues::new(date, state)
}

pub fn christmas() -> DayFlagValues {
    flag("2024-12-25", 1)
}
