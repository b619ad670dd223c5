//! Synthetic record factory

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;
use tally_core::{Department, NewSale, NewSalary, PRODUCTS};

use crate::config::Settings;

const FIRST_NAMES: &[&str] = &[
    "Agus", "Budi", "Citra", "Dewi", "Eko", "Fitri", "Gilang", "Hendra", "Indah", "Joko",
    "Kartika", "Lestari", "Made", "Nur", "Putri", "Rizky", "Siti", "Taufik", "Wahyu", "Yuni",
];

const LAST_NAMES: &[&str] = &[
    "Saputra", "Wijaya", "Hidayat", "Rahayu", "Susanto", "Pratama", "Kusuma", "Nugroho",
    "Siregar", "Halim", "Santoso", "Lubis", "Setiawan", "Permana", "Gunawan",
];

const QUANTITY: RangeInclusive<i32> = 1..=10;

pub struct Synthesizer {
    rng: StdRng,
    sale_cents: RangeInclusive<i64>,
    salary_cents: RangeInclusive<i64>,
}

impl Synthesizer {
    pub fn new(rng: StdRng, settings: &Settings) -> Self {
        Self {
            rng,
            sale_cents: settings.sale_cents.clone(),
            salary_cents: settings.salary_cents.clone(),
        }
    }

    pub fn salary(&mut self, now: DateTime<Utc>) -> NewSalary {
        let department = *Department::ALL
            .choose(&mut self.rng)
            .unwrap_or(&Department::Sales);
        NewSalary {
            employee_name: self.employee_name(),
            department,
            salary_amount: self.amount(self.salary_cents.clone()),
            payment_time: now,
        }
    }

    pub fn sale(&mut self, now: DateTime<Utc>) -> NewSale {
        let product = PRODUCTS.choose(&mut self.rng).unwrap_or(&PRODUCTS[0]);
        NewSale {
            product_name: product.to_string(),
            quantity: self.rng.gen_range(QUANTITY),
            total_amount: self.amount(self.sale_cents.clone()),
            sale_time: now,
        }
    }

    fn employee_name(&mut self) -> String {
        let first = FIRST_NAMES.choose(&mut self.rng).unwrap_or(&"Budi");
        let last = LAST_NAMES.choose(&mut self.rng).unwrap_or(&"Santoso");
        format!("{} {}", first, last)
    }

    // Drawn in whole cents so the amount always has two decimal places
    fn amount(&mut self, cents: RangeInclusive<i64>) -> f64 {
        self.rng.gen_range(cents) as f64 / 100.0
    }
}
