//! Synonym tables shipped with the tool.
//!
//! Entries are in lookup order; biomarker spellings and menopause keywords
//! are matched first-declared-first. New spellings found in lab sheets should
//! be appended, not substituted.

use harmonize_model::{ControlledField, SynonymCatalog, SynonymTable};

type Entries = &'static [(&'static str, &'static [&'static str])];

const BIOMARKERS: Entries = &[
    ("HER2", &["her2"]),
    ("ER", &["er", "estrogen receptor"]),
    ("PR", &["pr", "progesterone receptor"]),
    ("HER2 FISH", &["fish"]),
    ("PDL1", &["pdl1"]),
    ("ALK", &["alk"]),
    ("ROS", &["ros"]),
    ("EGFR", &["egfr"]),
    ("KRAS", &["kras"]),
    ("PIK3CA", &["pik3ca"]),
    ("ESR1", &["esr1"]),
    ("AR", &["ar"]),
    ("BRCA1", &["BRCA1"]),
    ("BRCA2", &["BRCA2"]),
    ("Menopausal Status", &["menopause status"]),
];

const POSITIVE_NEGATIVE: Entries = &[
    (
        "positive",
        &[
            "Positive",
            "positive",
            "strong positive",
            "weak positive",
            "moderately positive",
            "2+",
            "3+",
            "1",
            "2",
            "3",
            "4",
            "5",
            "6",
            "7",
            "8",
            "9",
            "10",
            "11",
            "12",
        ],
    ),
    ("negative", &["Negative", "negative", "0", "none", "not detected", "1+"]),
    ("mutated", &["mutated", "mutation detected", "mutation", "mut"]),
    (
        "not mutated",
        &["not mutated", "no mutation detected", "wild type", "wt", "no mutation", "no mut"],
    ),
];

const HER2_IHC: Entries = &[
    ("3+", &["3+", "3", "3+ (strong)", "3+ (moderate)", "3+ (weak)"]),
    ("2+/ISH-", &["2+ (negative fish/cish)"]),
    ("2+/ISH+", &["2+ (positive fish/cish)"]),
    ("1+", &["1+", "1", "1+ (strong)", "1+ (moderate)", "1+ (weak)"]),
    ("0", &["0", "negative", "not detected", "no expression"]),
];

const MENOPAUSE: Entries = &[
    ("premenopause", &["pre menopause"]),
    ("postmenopause", &["post menopause"]),
    ("perimenopause", &["peri menopause"]),
    ("not applicable", &["irrelevant"]),
    ("menopause", &["menopause"]),
];

const STABILIZER: Entries = &[("Streck", &["Streck Cell-Free DNA BCT"])];

const GENDER: Entries = &[
    ("Male", &["m", "male", "M", "Male"]),
    ("Female", &["f", "female", "F", "Female"]),
];

const SINGLE_DOUBLE_SPUN: Entries = &[
    ("Single", &["single", "Single", "1"]),
    ("Double", &["double", "Double", "2"]),
];

const SAMPLE_TIMEPOINT: Entries = &[("treatment-naïve", &["Initial-0"])];

const STAGE: Entries = &[
    ("I", &["I", "IA", "IB"]),
    ("II", &["II", "IIA", "IIB"]),
    ("III", &["III", "IIIA", "IIIB"]),
    ("IV", &["IV", "IVA", "IVB"]),
];

const HEMOLYSIS: Entries = &[
    ("no hemolysis", &["No"]),
    ("light hemolysis", &["Light Hemolysis"]),
    ("hemolysis", &[" Hemolysis"]),
    ("strong hemolysis", &["Strong Hemolysis"]),
];

/// Built-in table for `field`, or `None` for vocabularies that start empty
/// (race, smoking history).
pub fn builtin_table(field: ControlledField) -> Option<SynonymTable> {
    let entries = match field {
        ControlledField::Biomarker => BIOMARKERS,
        ControlledField::PositiveNegative => POSITIVE_NEGATIVE,
        ControlledField::Her2Ihc => HER2_IHC,
        ControlledField::Menopause => MENOPAUSE,
        ControlledField::Stabilizer => STABILIZER,
        ControlledField::Gender => GENDER,
        ControlledField::SingleDoubleSpun => SINGLE_DOUBLE_SPUN,
        ControlledField::SampleTimepoint => SAMPLE_TIMEPOINT,
        ControlledField::Stage => STAGE,
        ControlledField::Hemolysis => HEMOLYSIS,
        ControlledField::Race | ControlledField::SmokingHistory => return None,
    };
    Some(SynonymTable::build(
        entries
            .iter()
            .map(|(canonical, variants)| (*canonical, variants.iter().copied())),
    ))
}

/// Every built-in table.
pub fn builtin_catalog() -> SynonymCatalog {
    let mut catalog = SynonymCatalog::new();
    for field in ControlledField::ALL {
        if let Some(table) = builtin_table(field) {
            catalog.insert(field, table);
        }
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_covers_shipped_vocabularies() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.len(), 10);
        assert!(catalog.get(ControlledField::Race).is_none());
        assert!(catalog.get(ControlledField::SmokingHistory).is_none());
    }

    #[test]
    fn builtin_lookups() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.table(ControlledField::Stage).lookup("iib"), Ok("II"));
        assert_eq!(catalog.table(ControlledField::Gender).lookup(" F "), Ok("Female"));
        assert_eq!(
            catalog.table(ControlledField::Hemolysis).lookup("hemolysis"),
            Ok("hemolysis")
        );
        assert_eq!(
            catalog.table(ControlledField::Her2Ihc).first_label_for("2+ (negative FISH/CISH)"),
            Some("2+/ISH-")
        );
    }

    #[test]
    fn biomarker_order_is_preserved() {
        let table = builtin_table(ControlledField::Biomarker).unwrap();
        let labels: Vec<&str> = table.labels().collect();
        assert_eq!(labels[..4], ["HER2", "ER", "PR", "HER2 FISH"]);
    }
}
