//! Fixture users shipped with a fresh directory
//!
//! Identities 1..=11 are fixed; tests may rely on them unless they clear
//! the store first.

use chrono::NaiveDate;

use crate::models::{User, UserId};

/// Number of users in the default fixture
pub const DEFAULT_USER_COUNT: usize = 11;

/// The default fixture users with their fixed identities
pub fn default_users() -> Vec<User> {
    let rows: [(&str, &str, &str, bool, (i32, u32, u32)); DEFAULT_USER_COUNT] = [
        ("Peter", "Loew", "ploew@example.com", true, (1953, 7, 10)),
        ("Benjamin Franklin", "Gates", "bfgates@example.com", true, (1964, 5, 17)),
        ("Castor", "Troy", "ctroy@example.com", false, (1965, 4, 2)),
        ("Memphis", "Raines", "mraines@example.com", true, (1968, 11, 22)),
        ("Stanley", "Goodspeed", "sgodspeed@example.com", true, (1969, 8, 14)),
        ("H.I.", "McDunnough", "himcdunnough@example.com", true, (1959, 10, 3)),
        ("Cameron", "Poe", "cpoe@example.com", false, (1954, 1, 21)),
        ("Edward", "Malus", "emalus@example.com", false, (1966, 3, 27)),
        ("Damon", "Macready", "dmacready@example.com", false, (1967, 12, 12)),
        ("Johnny", "Blaze", "jblaze@example.com", true, (1966, 6, 6)),
        ("Robin", "Feld", "rfeld@example.com", true, (1957, 2, 5)),
    ];

    rows.into_iter()
        .zip(1_i64..)
        .filter_map(|((forename, surname, email, active, (y, m, d)), id)| {
            let dob = NaiveDate::from_ymd_opt(y, m, d)?;
            Some(User::new(forename, surname, email, active, dob).with_id(UserId::new(id)))
        })
        .collect()
}
