//! Dual-write generator loop
//!
//! Each cycle commits one sale and one salary to the relational store in a
//! single transaction, then mirrors both into the key-value store. The
//! relational commit is the durability point: mirror writes are best-effort,
//! independent of each other, and never retried.

use chrono::{SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tally_core::{
    CommittedIds, Mirror, RecordStore, Result, SaleItem, SalaryItem, TallyError,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::synth::Synthesizer;

/// What a single cycle achieved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Both records are durable; the flags report each mirror write
    Committed {
        ids: CommittedIds,
        sale_mirrored: bool,
        salary_mirrored: bool,
    },
    /// Nothing was persisted and nothing was mirrored
    RolledBack,
}

pub struct Generator {
    records: Arc<dyn RecordStore>,
    mirror: Mirror,
    synth: Synthesizer,
    pause_secs: RangeInclusive<u64>,
    rng: StdRng,
}

impl Generator {
    pub fn new(
        records: Arc<dyn RecordStore>,
        mirror: Mirror,
        settings: &Settings,
        mut rng: StdRng,
    ) -> Self {
        let synth = Synthesizer::new(StdRng::seed_from_u64(rng.gen()), settings);
        Self {
            records,
            mirror,
            synth,
            pause_secs: settings.pause_secs.clone(),
            rng,
        }
    }

    /// Verifies the relational store and creates the tables if needed.
    ///
    /// Failure here is a startup error, not something the loop recovers from.
    pub async fn initialize(
        records: Arc<dyn RecordStore>,
        mirror: Mirror,
        settings: &Settings,
    ) -> Result<Self> {
        records.ping().await?;
        records.ensure_schema().await?;
        info!("Relational store reachable, tables checked/created");
        info!(
            "Mirroring to tables '{}' and '{}'",
            mirror.sales_table(),
            mirror.salaries_table()
        );

        Ok(Self::new(records, mirror, settings, StdRng::from_entropy()))
    }

    /// Runs cycles until `shutdown` is cancelled
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!("Starting data generator (relational + key-value dual write)");

        while !shutdown.is_cancelled() {
            self.run_cycle().await;

            let pause = self.next_pause();
            info!("Sleeping for {} seconds", pause.as_secs());
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }

        info!("Data generator stopped");
    }

    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let now = Utc::now().trunc_subsecs(6);
        let salary = self.synth.salary(now);
        let sale = self.synth.sale(now);

        let ids = match self.records.insert_pair(&sale, &salary).await {
            Ok(ids) => {
                info!(
                    "Committed sale '{}' (id {}) and salary for '{}' (id {})",
                    sale.product_name, ids.sale_id, salary.employee_name, ids.salary_id
                );
                ids
            }
            Err(e) => {
                error!("Relational write failed, transaction rolled back: {}", e);
                return CycleOutcome::RolledBack;
            }
        };

        let sale_mirrored = match self.mirror_sale(ids.sale_id).await {
            Ok(()) => {
                debug!("Mirrored sale {}", ids.sale_id);
                true
            }
            Err(e) => {
                warn!("Mirror write for sale {} failed: {}", ids.sale_id, e);
                false
            }
        };

        let salary_mirrored = match self.mirror_salary(ids.salary_id).await {
            Ok(()) => {
                debug!("Mirrored salary {}", ids.salary_id);
                true
            }
            Err(e) => {
                warn!("Mirror write for salary {} failed: {}", ids.salary_id, e);
                false
            }
        };

        CycleOutcome::Committed {
            ids,
            sale_mirrored,
            salary_mirrored,
        }
    }

    // Reload so the mirror carries the store-assigned id and canonical values
    async fn mirror_sale(&self, id: i64) -> Result<()> {
        let sale = self
            .records
            .get_sale(id)
            .await?
            .ok_or_else(|| TallyError::NotFound(format!("sale {}", id)))?;
        self.mirror.put_sale(&SaleItem::from_sale(&sale)?).await
    }

    async fn mirror_salary(&self, id: i64) -> Result<()> {
        let salary = self
            .records
            .get_salary(id)
            .await?
            .ok_or_else(|| TallyError::NotFound(format!("salary {}", id)))?;
        self.mirror.put_salary(&SalaryItem::from_salary(&salary)?).await
    }

    fn next_pause(&mut self) -> Duration {
        Duration::from_secs(self.rng.gen_range(self.pause_secs.clone()))
    }
}
