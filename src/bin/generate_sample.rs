use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Per-species measurement profile: (mean, std-dev) for bill length, bill
/// depth, flipper length and body mass, plus the islands it is found on.
struct Profile {
    species: &'static str,
    islands: &'static [&'static str],
    count: usize,
    bill_length: (f64, f64),
    bill_depth: (f64, f64),
    flipper_length: (f64, f64),
    body_mass: (f64, f64),
}

const PROFILES: [Profile; 3] = [
    Profile {
        species: "Adelie",
        islands: &["Torgersen", "Biscoe", "Dream"],
        count: 152,
        bill_length: (38.8, 2.7),
        bill_depth: (18.3, 1.2),
        flipper_length: (190.0, 6.5),
        body_mass: (3700.0, 460.0),
    },
    Profile {
        species: "Gentoo",
        islands: &["Biscoe"],
        count: 124,
        bill_length: (47.5, 3.1),
        bill_depth: (15.0, 1.0),
        flipper_length: (217.0, 6.5),
        body_mass: (5076.0, 504.0),
    },
    Profile {
        species: "Chinstrap",
        islands: &["Dream"],
        count: 68,
        bill_length: (48.8, 3.3),
        bill_depth: (18.4, 1.1),
        flipper_length: (196.0, 7.1),
        body_mass: (3733.0, 384.0),
    },
];

/// Minimal deterministic PRNG (splitmix64)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, (mean, std_dev): (f64, f64)) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn round_to(v: f64, step: f64) -> f64 {
    (v / step).round() * step
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut species = Vec::new();
    let mut island = Vec::new();
    let mut bill_length: Vec<Option<f64>> = Vec::new();
    let mut bill_depth: Vec<Option<f64>> = Vec::new();
    let mut flipper_length: Vec<Option<f64>> = Vec::new();
    let mut body_mass: Vec<Option<f64>> = Vec::new();
    let mut sex: Vec<Option<&str>> = Vec::new();
    let mut year = Vec::new();

    for profile in &PROFILES {
        for i in 0..profile.count {
            // Roughly one record in fifty is unmeasured, like the field data.
            let measured = rng.next_f64() > 0.02;
            let measure = |rng: &mut SimpleRng, dist: (f64, f64), step: f64| {
                measured.then(|| round_to(rng.gauss(dist), step))
            };

            species.push(profile.species);
            island.push(rng.pick(profile.islands));
            bill_length.push(measure(&mut rng, profile.bill_length, 0.1));
            bill_depth.push(measure(&mut rng, profile.bill_depth, 0.1));
            flipper_length.push(measure(&mut rng, profile.flipper_length, 1.0));
            body_mass.push(measure(&mut rng, profile.body_mass, 25.0));
            sex.push(measured.then(|| rng.pick(&["male", "female"])));
            year.push(2007 + (i % 3) as i64);
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("species", DataType::Utf8, false),
        Field::new("island", DataType::Utf8, false),
        Field::new("bill_length_mm", DataType::Float64, true),
        Field::new("bill_depth_mm", DataType::Float64, true),
        Field::new("flipper_length_mm", DataType::Float64, true),
        Field::new("body_mass_g", DataType::Float64, true),
        Field::new("sex", DataType::Utf8, true),
        Field::new("year", DataType::Int64, false),
    ]));

    let n_rows = species.len();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(species)),
            Arc::new(StringArray::from(island)),
            Arc::new(Float64Array::from(bill_length)),
            Arc::new(Float64Array::from(bill_depth)),
            Arc::new(Float64Array::from(flipper_length)),
            Arc::new(Float64Array::from(body_mass)),
            Arc::new(StringArray::from(sex)),
            Arc::new(Int64Array::from(year)),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_penguins.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n_rows} synthetic penguin records to {output_path}");
}
