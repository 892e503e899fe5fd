#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use model::{
    core::{kind::ValueKind, value::Value},
    shape::{Record, RecordShape},
};

pub mod utils;

pub const LEVELS: [&str; 3] = ["Junior", "Mid", "Senior"];

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: Option<String>,
}

impl Record for Address {
    fn shape() -> RecordShape<Self> {
        RecordShape::new("Address")
            .field("city", ValueKind::String, |a: &Address| Value::from(a.city.as_str()))
            .optional_field("zip", ValueKind::String, |a: &Address| {
                a.zip.as_deref().map(Value::from)
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub name: String,
    pub age: i64,
    pub salary: i64,
    pub level: &'static str,
    pub hired: DateTime<Utc>,
    pub email: Option<String>,
    pub address: Option<Address>,
}

impl Record for Employee {
    fn shape() -> RecordShape<Self> {
        RecordShape::new("Employee")
            .field("name", ValueKind::String, |e: &Employee| Value::from(e.name.as_str()))
            .field("age", ValueKind::Integer, |e: &Employee| Value::Int(e.age))
            .field("salary", ValueKind::Integer, |e: &Employee| Value::Int(e.salary))
            .field("level", ValueKind::enumeration(LEVELS), |e: &Employee| {
                Value::Enum(e.level.to_string())
            })
            .field("hired", ValueKind::DateTime, |e: &Employee| Value::DateTime(e.hired))
            .optional_field("email", ValueKind::String, |e: &Employee| {
                e.email.as_deref().map(Value::from)
            })
            .optional_nested(
                "address",
                |e: &Employee| e.address.as_ref(),
                Address::shape(),
            )
    }
}

/// Destination record for cast scenarios: `age` lives at `yearsOld`, the name under
/// `profile.fullName`.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub full_name: String,
}

impl Record for Profile {
    fn shape() -> RecordShape<Self> {
        RecordShape::new("Profile").field("fullName", ValueKind::String, |p: &Profile| {
            Value::from(p.full_name.as_str())
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub years_old: i64,
    pub profile: Profile,
}

impl Record for User {
    fn shape() -> RecordShape<Self> {
        RecordShape::new("User")
            .field("yearsOld", ValueKind::Integer, |u: &User| Value::Int(u.years_old))
            .nested("profile", |u: &User| &u.profile, Profile::shape())
    }
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn employee(name: &str, age: i64, salary: i64, level: &'static str) -> Employee {
    Employee {
        name: name.to_string(),
        age,
        salary,
        level,
        hired: date(2020, 1, 1),
        email: None,
        address: None,
    }
}

/// John, Alice and Bob, in that order.
pub fn staff() -> Vec<Employee> {
    vec![
        Employee {
            hired: date(2021, 6, 1),
            address: Some(Address {
                city: "Bergen".to_string(),
                zip: None,
            }),
            ..employee("John", 24, 50000, "Junior")
        },
        Employee {
            email: Some("alice@example.com".to_string()),
            hired: date(2018, 3, 12),
            address: Some(Address {
                city: "Oslo".to_string(),
                zip: Some("0150".to_string()),
            }),
            ..employee("Alice", 31, 55000, "Senior")
        },
        Employee {
            hired: date(2019, 9, 30),
            ..employee("Bob", 25, 60000, "Mid")
        },
    ]
}

pub fn users() -> Vec<User> {
    [("john", 24), ("alice", 31), ("bob", 25)]
        .into_iter()
        .map(|(name, age)| User {
            years_old: age,
            profile: Profile {
                full_name: name.to_string(),
            },
        })
        .collect()
}
