use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Seeded xoshiro256** generator; each operator draws from its own stream
/// so adding an operator does not shift the others' readings.
struct StudyRng {
    s: [u64; 4],
}

impl StudyRng {
    /// splitmix64 expansion of `seed` into the 256-bit state.
    fn from_seed(seed: u64) -> Self {
        let mut z = seed;
        let mut next = || {
            z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut x = z;
            x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            x ^ (x >> 31)
        };
        StudyRng {
            s: [next(), next(), next(), next()],
        }
    }

    /// Independent stream `index` derived from the study seed.
    fn stream(seed: u64, index: u64) -> Self {
        Self::from_seed(seed ^ index.wrapping_mul(0xD1B5_4A32_D192_ED03))
    }

    fn next_u64(&mut self) -> u64 {
        let out = self.s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = self.s[1] << 17;
        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];
        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);
        out
    }

    /// Uniform in `(0, 1]`.
    fn unit(&mut self) -> f64 {
        ((self.next_u64() >> 11) + 1) as f64 / (1u64 << 53) as f64
    }

    /// Normal draw via Box-Muller.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let r = (-2.0 * self.unit().ln()).sqrt();
        let theta = std::f64::consts::TAU * self.unit();
        mean + std_dev * r * theta.cos()
    }
}

/// Round to the 3 decimals a caliper would show.
fn reading(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn main() {
    // Usage: generate_sample [seed]
    let seed: u64 = match std::env::args().nth(1) {
        Some(arg) => arg.parse().expect("seed must be an unsigned integer"),
        None => 42,
    };

    let part = "Shaft_D25";
    let nominal = 25.0;
    let trials = 10;
    // (operator, bias, repeatability sigma)
    let operators = [("Alice", 0.000, 0.004), ("Bob", 0.006, 0.005), ("Chen", -0.003, 0.008)];

    let mut all_operator: Vec<&str> = Vec::new();
    let mut all_trial: Vec<i64> = Vec::new();
    let mut all_value: Vec<f64> = Vec::new();

    let mut streams: Vec<StudyRng> = (0..operators.len() as u64)
        .map(|i| StudyRng::stream(seed, i))
        .collect();

    for trial in 1..=trials {
        for (&(operator, bias, sigma), rng) in operators.iter().zip(&mut streams) {
            all_operator.push(operator);
            all_trial.push(trial);
            all_value.push(reading(rng.normal(nominal + bias, sigma)));
        }
    }
    let n = all_value.len();

    // Write CSV
    let csv_path = "sample_study.csv";
    let mut csv_writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    csv_writer
        .write_record(["operator", "part", "trial", "value"])
        .expect("Failed to write CSV header");
    for i in 0..n {
        csv_writer
            .write_record([
                all_operator[i].to_string(),
                part.to_string(),
                all_trial[i].to_string(),
                all_value[i].to_string(),
            ])
            .expect("Failed to write CSV row");
    }
    csv_writer.flush().expect("Failed to flush CSV file");

    // Build Arrow arrays
    let schema = Arc::new(Schema::new(vec![
        Field::new("operator", DataType::Utf8, false),
        Field::new("part", DataType::Utf8, false),
        Field::new("trial", DataType::Int64, false),
        Field::new("value", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(all_operator)),
            Arc::new(StringArray::from(vec![part; n])),
            Arc::new(Int64Array::from(all_trial)),
            Arc::new(Float64Array::from(all_value)),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let parquet_path = "sample_study.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {n} measurements ({} operators × {trials} trials of {part}, seed {seed}) to {csv_path} and {parquet_path}",
        operators.len()
    );
}
