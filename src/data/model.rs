use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Species – the categorical column every chart is keyed on
// ---------------------------------------------------------------------------

/// Penguin species present in the Palmer archipelago dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Adelie,
    Gentoo,
    Chinstrap,
}

impl Species {
    /// All species in checkbox order.
    pub const ALL: [Species; 3] = [Species::Adelie, Species::Gentoo, Species::Chinstrap];

    /// Position in [`Species::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Adelie => "Adelie",
            Species::Gentoo => "Gentoo",
            Species::Chinstrap => "Chinstrap",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown species '{0}'")]
pub struct UnknownSpecies(pub String);

impl FromStr for Species {
    type Err = UnknownSpecies;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The upstream table sometimes carries the long form,
        // e.g. "Adelie Penguin (Pygoscelis adeliae)".
        let head = s.split_whitespace().next().unwrap_or("");
        Species::ALL
            .into_iter()
            .find(|sp| sp.name().eq_ignore_ascii_case(head))
            .ok_or_else(|| UnknownSpecies(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Attribute – the numeric measurement columns
// ---------------------------------------------------------------------------

/// One of the four numeric measurement columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "bill_length_mm")]
    BillLength,
    #[serde(rename = "bill_depth_mm")]
    BillDepth,
    #[serde(rename = "flipper_length_mm")]
    FlipperLength,
    #[serde(rename = "body_mass_g")]
    BodyMass,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::BillLength,
        Attribute::BillDepth,
        Attribute::FlipperLength,
        Attribute::BodyMass,
    ];

    /// Column name as it appears in the source table.
    pub fn column(self) -> &'static str {
        match self {
            Attribute::BillLength => "bill_length_mm",
            Attribute::BillDepth => "bill_depth_mm",
            Attribute::FlipperLength => "flipper_length_mm",
            Attribute::BodyMass => "body_mass_g",
        }
    }

    /// Read this attribute from a record (`None` when the value is `NA`).
    pub fn value(self, record: &Record) -> Option<f64> {
        match self {
            Attribute::BillLength => record.bill_length_mm,
            Attribute::BillDepth => record.bill_depth_mm,
            Attribute::FlipperLength => record.flipper_length_mm,
            Attribute::BodyMass => record.body_mass_g,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the penguins table
// ---------------------------------------------------------------------------

/// A single penguin observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub species: Species,
    pub island: String,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub flipper_length_mm: Option<f64>,
    pub body_mass_g: Option<f64>,
    pub sex: Option<String>,
    pub year: Option<i64>,
}

impl Record {
    /// Column order used by loaders and table artifacts.
    pub const COLUMNS: [&'static str; 8] = [
        "species",
        "island",
        "bill_length_mm",
        "bill_depth_mm",
        "flipper_length_mm",
        "body_mass_g",
        "sex",
        "year",
    ];
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The immutable base table. Wrapped in an `Arc` once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record count per species, in `Species::ALL` order.
    pub fn species_counts(&self) -> [(Species, usize); 3] {
        Species::ALL.map(|sp| (sp, self.records.iter().filter(|r| r.species == sp).count()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal record with both scatter coordinates set.
    pub(crate) fn record(species: Species, body_mass_g: f64, bill_length_mm: f64) -> Record {
        Record {
            species,
            island: "Torgersen".into(),
            bill_length_mm: Some(bill_length_mm),
            bill_depth_mm: Some(18.0),
            flipper_length_mm: Some(190.0),
            body_mass_g: Some(body_mass_g),
            sex: Some("female".into()),
            year: Some(2007),
        }
    }

    #[test]
    fn species_parses_short_and_long_forms() {
        assert_eq!("Adelie".parse::<Species>().unwrap(), Species::Adelie);
        assert_eq!(" gentoo ".parse::<Species>().unwrap(), Species::Gentoo);
        assert_eq!(
            "Chinstrap penguin (Pygoscelis antarctica)".parse::<Species>().unwrap(),
            Species::Chinstrap
        );
        assert!("Emperor".parse::<Species>().is_err());
        assert!("".parse::<Species>().is_err());
    }

    #[test]
    fn attribute_reads_matching_field() {
        let r = record(Species::Adelie, 3750.0, 39.1);
        assert_eq!(Attribute::BodyMass.value(&r), Some(3750.0));
        assert_eq!(Attribute::BillLength.value(&r), Some(39.1));
        assert_eq!(Attribute::BillDepth.value(&r), Some(18.0));
        assert_eq!(Attribute::FlipperLength.value(&r), Some(190.0));
    }

    #[test]
    fn attribute_serializes_as_column_name() {
        let json = serde_json::to_string(&Attribute::FlipperLength).unwrap();
        assert_eq!(json, "\"flipper_length_mm\"");
        let back: Attribute = serde_json::from_str("\"body_mass_g\"").unwrap();
        assert_eq!(back, Attribute::BodyMass);
    }

    #[test]
    fn species_counts_cover_all_species() {
        let ds = Dataset::new(vec![
            record(Species::Gentoo, 5000.0, 47.0),
            record(Species::Gentoo, 5100.0, 48.0),
        ]);
        assert_eq!(
            ds.species_counts(),
            [(Species::Adelie, 0), (Species::Gentoo, 2), (Species::Chinstrap, 0)]
        );
    }
}
