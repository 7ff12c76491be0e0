use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Column dates: `count` days starting at `first`, `step` days apart.
fn date_headers(first: NaiveDate, step: i64, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| (first + Duration::days(step * i as i64)).format(DATE_FORMAT).to_string())
        .collect()
}

/// Random walk with drift, one value per date.
fn walk(rng: &mut SimpleRng, start: f64, drift: f64, noise: f64, n: usize) -> Vec<f64> {
    let mut value = start;
    (0..n)
        .map(|_| {
            value = (value * (1.0 + drift) + rng.gauss(0.0, noise)).max(0.0);
            value
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Prices: CSV, weekly columns, decimal commas and gaps
// ---------------------------------------------------------------------------

fn write_prices(rng: &mut SimpleRng, path: &str) -> Result<usize> {
    let first = NaiveDate::from_ymd_opt(2023, 1, 2).context("sample start date")?;
    let dates = date_headers(first, 7, 104);

    let items: [(&str, &str, f64, f64); 6] = [
        ("Milk", "l", 1.10, 0.002),
        ("Bread", "pcs", 2.40, 0.001),
        ("Eggs", "dozen", 3.20, 0.004),
        ("Coffee", "kg", 14.00, 0.003),
        ("Rice", "kg", 1.80, -0.001),
        ("Butter", "kg", 8.50, 0.0),
    ];

    let mut writer = csv::Writer::from_path(path).context("creating price sheet")?;
    let mut header = vec!["id".to_string(), "Item".to_string(), "Unit".to_string()];
    header.extend(dates.iter().cloned());
    writer.write_record(&header)?;

    let mut rows = 0;
    for (id, &(name, unit, base, drift)) in items.iter().enumerate() {
        let values = walk(rng, base, drift, base * 0.01, dates.len());
        let mut record = vec![(id + 1).to_string(), name.to_string(), unit.to_string()];
        for v in values {
            let roll = rng.next_f64();
            let cell = if roll < 0.08 {
                String::new()
            } else if roll < 0.10 {
                "--".to_string()
            } else {
                format!("{v:.2}").replace('.', ",")
            };
            record.push(cell);
        }
        writer.write_record(&record)?;
        rows += 1;
    }

    // Late correction of one item; the later row should win.
    let mut correction = vec!["99".to_string(), "Milk".to_string(), "l".to_string()];
    correction.extend(std::iter::repeat(String::new()).take(dates.len() - 1));
    correction.push("1,99".to_string());
    writer.write_record(&correction)?;
    rows += 1;

    writer.flush()?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Quantities: Parquet, text columns every three days
// ---------------------------------------------------------------------------

fn write_quantities(rng: &mut SimpleRng, path: &str) -> Result<usize> {
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).context("sample start date")?;
    let dates = date_headers(first, 3, 122);

    let items: [(&str, f64, f64); 5] = [
        ("Bolts", 500.0, 0.004),
        ("Nuts", 800.0, -0.003),
        ("Washers", 0.0, 0.0),
        ("Screws", 300.0, -0.02),
        ("Rivets", 150.0, 0.002),
    ];

    let mut fields = vec![Field::new("Item", DataType::Utf8, false)];
    fields.extend(dates.iter().map(|d| Field::new(d.as_str(), DataType::Utf8, true)));
    let schema = Arc::new(Schema::new(fields));

    let series: Vec<Vec<Option<String>>> = items
        .iter()
        .map(|&(name, base, drift)| {
            // Washers arrive mid-year.
            let values = if name == "Washers" {
                let mut v = vec![0.0; dates.len() / 2];
                v.extend(walk(rng, 200.0, 0.0, 5.0, dates.len() - v.len()));
                v
            } else {
                walk(rng, base, drift, base * 0.02, dates.len())
            };
            values
                .into_iter()
                .map(|v| (rng.next_f64() >= 0.05).then(|| format!("{}", v.round())))
                .collect()
        })
        .collect();

    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
        items.iter().map(|(name, _, _)| *name).collect::<Vec<_>>(),
    ))];
    for d in 0..dates.len() {
        let column: Vec<Option<&str>> = series.iter().map(|s| s[d].as_deref()).collect();
        columns.push(Arc::new(StringArray::from(column)));
    }

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating quantity sheet")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(items.len())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let prices = "sample_prices.csv";
    let rows = write_prices(&mut rng, prices)?;
    println!("Wrote {rows} price rows to {prices}");

    let quantities = "sample_quantities.parquet";
    let rows = write_quantities(&mut rng, quantities)?;
    println!("Wrote {rows} quantity rows to {quantities}");

    Ok(())
}
