//! Synthetic messy sales data.
//!
//! Every field is drawn independently. Nullable fields are left empty with
//! their configured probability, Region and Sales_Rep come from candidate
//! lists that contain case variants of the same value, and a few exact
//! duplicate rows are appended before the whole set is shuffled.

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::io::write_csv;
use crate::schema::{
    CUSTOMER_EMAIL, DATE, DISCOUNT, INVALID_EMAIL_SENTINEL, ORDER_ID, PRODUCT, PRODUCTS, QUANTITY,
    REGION, REGION_VARIANTS, RawSalesRecord, SALES_REP, SALES_REP_VARIANTS, UNIT_PRICE,
};
use crate::utils::round2;
use chrono::Duration;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Counts of defects injected into a generated dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectCounts {
    pub missing_order_id: usize,
    pub missing_date: usize,
    pub missing_quantity: usize,
    pub missing_unit_price: usize,
    pub invalid_email: usize,
    pub missing_discount: usize,
    pub duplicate_rows: usize,
}

impl DefectCounts {
    /// Tally the defects present in a set of records.
    ///
    /// `duplicate_rows` is not derivable from the records alone and is left
    /// at zero.
    pub fn from_records(records: &[RawSalesRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.missing_order_id += usize::from(record.order_id.is_none());
            counts.missing_date += usize::from(record.date.is_none());
            counts.missing_quantity += usize::from(record.quantity.is_none());
            counts.missing_unit_price += usize::from(record.unit_price.is_none());
            counts.invalid_email += usize::from(record.customer_email == INVALID_EMAIL_SENTINEL);
            counts.missing_discount += usize::from(record.discount.is_none());
        }
        counts
    }
}

/// Outcome of a generator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub path: PathBuf,
    pub rows_written: usize,
    pub defects: DefectCounts,
}

/// Produces synthetic sales records with injected data-quality defects.
pub struct DataGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl DataGenerator {
    /// Create a generator. Seeded configs give reproducible output.
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate `rows` records, append `duplicate_rows` exact copies of
    /// randomly chosen records, then shuffle.
    pub fn generate(&mut self) -> Vec<RawSalesRecord> {
        let mut records: Vec<RawSalesRecord> = (0..self.config.rows)
            .map(|index| self.generate_record(index))
            .collect();

        for _ in 0..self.config.duplicate_rows {
            if let Some(copy) = records.choose(&mut self.rng).cloned() {
                records.push(copy);
            }
        }

        records.shuffle(&mut self.rng);
        debug!("Generated {} records", records.len());
        records
    }

    fn generate_record(&mut self, index: usize) -> RawSalesRecord {
        let rates = self.config.defect_rates;

        let order_id = self
            .keep(rates.missing_order_id)
            .then(|| format!("ORD{:03}", index + 1));

        let offset = self.rng.gen_range(0..=self.config.date_span_days);
        let date = (self.config.start_date + Duration::days(offset))
            .format("%Y-%m-%d")
            .to_string();
        let date = self.keep(rates.missing_date).then_some(date);

        let product = pick(&mut self.rng, &PRODUCTS);

        let (qmin, qmax) = self.config.quantity_range;
        let quantity = self.rng.gen_range(qmin..=qmax);
        let quantity = self.keep(rates.missing_quantity).then_some(quantity);

        let (pmin, pmax) = self.config.unit_price_range;
        let unit_price = round2(self.rng.gen_range(pmin..=pmax));
        let unit_price = self.keep(rates.missing_unit_price).then_some(unit_price);

        let region = pick(&mut self.rng, &REGION_VARIANTS);
        let sales_rep = pick(&mut self.rng, &SALES_REP_VARIANTS);

        let customer_email = if self.keep(rates.invalid_email) {
            format!("customer{}@email.com", index)
        } else {
            INVALID_EMAIL_SENTINEL.to_string()
        };

        let (dmin, dmax) = self.config.discount_range;
        let discount = round2(self.rng.gen_range(dmin..=dmax));
        let discount = self.keep(rates.missing_discount).then_some(discount);

        RawSalesRecord {
            order_id,
            date,
            product,
            quantity,
            unit_price,
            region,
            sales_rep,
            customer_email,
            discount,
        }
    }

    /// True when the value survives a defect with probability `defect_rate`.
    fn keep(&mut self, defect_rate: f64) -> bool {
        self.rng.r#gen::<f64>() >= defect_rate
    }

    /// Build the 9-column raw DataFrame from records.
    pub fn to_dataframe(records: &[RawSalesRecord]) -> Result<DataFrame> {
        let order_ids: Vec<Option<&str>> = records.iter().map(|r| r.order_id.as_deref()).collect();
        let dates: Vec<Option<&str>> = records.iter().map(|r| r.date.as_deref()).collect();
        let products: Vec<&str> = records.iter().map(|r| r.product.as_str()).collect();
        let quantities: Vec<Option<i64>> = records.iter().map(|r| r.quantity).collect();
        let prices: Vec<Option<f64>> = records.iter().map(|r| r.unit_price).collect();
        let regions: Vec<&str> = records.iter().map(|r| r.region.as_str()).collect();
        let reps: Vec<&str> = records.iter().map(|r| r.sales_rep.as_str()).collect();
        let emails: Vec<&str> = records.iter().map(|r| r.customer_email.as_str()).collect();
        let discounts: Vec<Option<f64>> = records.iter().map(|r| r.discount).collect();

        let df = DataFrame::new(vec![
            Column::new(ORDER_ID.into(), order_ids),
            Column::new(DATE.into(), dates),
            Column::new(PRODUCT.into(), products),
            Column::new(QUANTITY.into(), quantities),
            Column::new(UNIT_PRICE.into(), prices),
            Column::new(REGION.into(), regions),
            Column::new(SALES_REP.into(), reps),
            Column::new(CUSTOMER_EMAIL.into(), emails),
            Column::new(DISCOUNT.into(), discounts),
        ])?;

        Ok(df)
    }

    /// Generate a dataset and write it to the configured path.
    pub fn write_csv(&mut self) -> Result<GenerationSummary> {
        let records = self.generate();
        let mut df = Self::to_dataframe(&records)?;
        let path = self.config.output_path.clone();
        write_csv(&mut df, &path)?;

        let defects = DefectCounts {
            duplicate_rows: self.config.duplicate_rows,
            ..DefectCounts::from_records(&records)
        };
        info!(
            "Messy sales data generated: {} ({} rows)",
            path.display(),
            records.len()
        );

        Ok(GenerationSummary {
            path,
            rows_written: records.len(),
            defects,
        })
    }
}

fn pick<R: Rng>(rng: &mut R, candidates: &[&str]) -> String {
    candidates
        .choose(rng)
        .map(|s| s.to_string())
        .unwrap_or_default()
}
