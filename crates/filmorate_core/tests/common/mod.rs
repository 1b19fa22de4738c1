#![allow(dead_code)]

use chrono::NaiveDate;
use filmorate_core::{Film, User};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn matrix() -> Film {
    Film::new("Matrix", date(1999, 3, 31), 120, 1)
}

pub fn film(name: &str) -> Film {
    Film::new(name, date(2001, 1, 1), 95, 2)
}

pub fn user(login: &str) -> User {
    User::new(format!("{login}@example.com"), login)
}
