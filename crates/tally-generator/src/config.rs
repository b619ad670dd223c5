//! Generator settings

use clap::Args;
use std::ops::RangeInclusive;
use tally_core::{Decimal, Result, TallyError};

#[derive(Debug, Clone, Args)]
pub struct GeneratorArgs {
    /// Shortest pause between cycles, in seconds
    #[arg(long, env = "SLEEP_MIN_SECS", default_value_t = 5)]
    pub sleep_min_secs: u64,

    /// Longest pause between cycles, in seconds
    #[arg(long, env = "SLEEP_MAX_SECS", default_value_t = 10)]
    pub sleep_max_secs: u64,

    #[arg(long, env = "SALE_AMOUNT_MIN", default_value = "500000.00")]
    pub sale_amount_min: Decimal,

    #[arg(long, env = "SALE_AMOUNT_MAX", default_value = "25000000.00")]
    pub sale_amount_max: Decimal,

    #[arg(long, env = "SALARY_AMOUNT_MIN", default_value = "5000000.00")]
    pub salary_amount_min: Decimal,

    #[arg(long, env = "SALARY_AMOUNT_MAX", default_value = "15000000.00")]
    pub salary_amount_max: Decimal,
}

/// Validated generator settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub pause_secs: RangeInclusive<u64>,
    pub sale_cents: RangeInclusive<i64>,
    pub salary_cents: RangeInclusive<i64>,
}

impl GeneratorArgs {
    pub fn settings(&self) -> Result<Settings> {
        if self.sleep_min_secs > self.sleep_max_secs {
            return Err(TallyError::InvalidConfig(format!(
                "SLEEP_MIN_SECS ({}) is greater than SLEEP_MAX_SECS ({})",
                self.sleep_min_secs, self.sleep_max_secs
            )));
        }

        Ok(Settings {
            pause_secs: self.sleep_min_secs..=self.sleep_max_secs,
            sale_cents: cents_range("sale", &self.sale_amount_min, &self.sale_amount_max)?,
            salary_cents: cents_range(
                "salary",
                &self.salary_amount_min,
                &self.salary_amount_max,
            )?,
        })
    }
}

fn cents_range(label: &str, min: &Decimal, max: &Decimal) -> Result<RangeInclusive<i64>> {
    let to_cents = |d: &Decimal| {
        d.to_cents().ok_or_else(|| {
            TallyError::InvalidConfig(format!(
                "{} amount {} must have at most two decimal places",
                label, d
            ))
        })
    };
    let (min_cents, max_cents) = (to_cents(min)?, to_cents(max)?);

    if min_cents <= 0 {
        return Err(TallyError::InvalidConfig(format!(
            "{} amounts must be positive, got minimum {}",
            label, min
        )));
    }
    if min_cents > max_cents {
        return Err(TallyError::InvalidConfig(format!(
            "{} amount minimum {} is greater than maximum {}",
            label, min, max
        )));
    }
    Ok(min_cents..=max_cents)
}
