//! Output templates and the catalog of known template fields.

use std::collections::HashSet;

use serde::Serialize;

/// Field names the pipeline treats specially.
pub mod field_names {
    pub const AGE_AT_COLLECTION: &str = "AgeAtCollection";
    pub const COLLECTION_DATE: &str = "Date of Blood Draw/Cell Collection";
    pub const TIME_OF_DRAW: &str = "Time of Draw";
    pub const HEIGHT: &str = "Height";
    pub const WEIGHT: &str = "Weight";
    pub const BMI: &str = "BMI";
    pub const MENOPAUSAL_STATUS: &str = "Menopausal Status";
    pub const STABILIZER: &str = "Stabilizer";
    pub const GENDER: &str = "Gender";
    pub const SINGLE_DOUBLE_SPUN: &str = "Single or Double Spun";
    pub const SAMPLE_TIMEPOINT: &str = "Sample Timepoint";
    pub const STAGE: &str = "Stage";
    pub const HEMOLYSIS: &str = "Hemolysis";
    pub const RACE: &str = "Race";
    pub const SMOKING_HISTORY: &str = "SmokingHistory";
}

/// A field users can map, with the values the receiving system accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateFieldSpec {
    pub name: &'static str,
    /// Accepted values; empty means free text.
    pub allowed: &'static [&'static str],
    pub definition: &'static str,
    /// Whether the field may be filled by an elapsed-days calculation.
    pub computable: bool,
}

/// Mappable template fields in presentation order.
pub const TEMPLATE_FIELDS: &[TemplateFieldSpec] = &[
    TemplateFieldSpec {
        name: "ExternalId",
        allowed: &[],
        definition: "Sample ID received from site",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Received Date",
        allowed: &[],
        definition: "Must be in format XX-MON-YYYY (e.g. 01-JAN-2023)",
        computable: false,
    },
    TemplateFieldSpec {
        name: "ContainerType",
        allowed: &["Slide", "Tube", "Plate", "FFPE Block"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Volume_uL",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "TubeBarcode",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Concentration",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "ConcentrationUnits",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Organism",
        allowed: &["Human", "Mouse", "Mouse PDX"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Stabilizer",
        allowed: &["Streck", "Accucyte", "EDTA", "PAXgene ccfDNA"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Single or Double Spun",
        allowed: &["Single", "Double"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Processing Method",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Processing Time(hrs)",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Freeze Thaw Status",
        allowed: &["0", "1", "2", "3", "4", "Unknown"],
        definition: "Number of freeze-thaw cycles the sample has undergone.",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Hemolysis",
        allowed: &["no hemolysis", "light hemolysis", "strong hemolysis", "hemolysis"],
        definition: "Documentation for quality of plasma (leave blank for non-plasma samples)",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Project",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Matched FFPE Available",
        allowed: &["Yes", "No"],
        definition: "Add for plasma samples (not for FFPE samples themselves)",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Date of Blood Draw/Cell Collection",
        allowed: &[],
        definition: "Must be in format XX-MON-YYYY (e.g. 01-JAN-2023)",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Time of Draw",
        allowed: &[],
        definition: "Must be in format HH:MM (e.g. 14:30)",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Block Size",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Tissue Size",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Tissue Weight (mg)",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "% Tumor",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "% Necrosis",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Surgery Type",
        allowed: &["biopsy", "resection"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Tumor Tissue Type",
        allowed: &["primary", "metastasis"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Data Transformer",
        allowed: &[],
        definition: "Your name",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Date of Transformation",
        allowed: &[],
        definition: "Must be in format XX-MON-YYYY (e.g. 01-JAN-2023)",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Other Sample Notes",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "ExSpecimenId",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Collection Site",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "SpecimenType",
        allowed: &["Cell Line", "Blood"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Condition",
        allowed: &["cancer", "autoimmune", "pregnancy", "healthy"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Diagnostic Condition",
        allowed: &["breast cancer", "colorectal cancer", "lung cancer", "gastroesophageal cancer", "multiple sclerosis", "osteosarcoma", "ovarian cancer"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Histology",
        allowed: &["adenocarcinoma", "carcinoma", "epithelial tumor", "endometrioid carcinoma", "mucinous adenocarcinoma", "infiltrating ductal carcinoma", "infiltrating lobular carcinoma", "large cell neuroendocrine carcinoma", "large cell carcinoma", "lobular carcinoma in situ", "ductal carcinoma in situ", "non-small cell lung cancer NOS", "phylloides tumor", "secretory carcinoma", "small cell carcinoma", "squamous cell carcinoma", "signet ring cell carcinoma", "neuroendocrine carcinoma", "NOS", "metastatic castration-resistant prostate cancer (mCRPC)", "invasive carcinoma NOS", "acinar adenocarcinoma", "pleomorphic carcinoma", "lepidic adenocarcinoma", "papillary adenocarcinoma", "metaplastic carcinoma", "serous carcinoma", "not applicable", "not received", "SPMS", "RRMS", "PPMS"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Height",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Weight",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Duration between Cancer Diagnosis and Blood Draw (days)",
        allowed: &[],
        definition: "",
        computable: true,
    },
    TemplateFieldSpec {
        name: "Duration between Metastatic Diagnosis and Blood Draw (days)",
        allowed: &[],
        definition: "",
        computable: true,
    },
    TemplateFieldSpec {
        name: "Sample Timepoint",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Sample Timepoint Description",
        allowed: &["treatment-naïve", "undergoing treatment", "progression", "study termination"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "AgeAtCollection",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Detailed Anatomical Location",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Grade",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Tumor Size",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "TNM",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Duration between TNM Staging and Blood Draw (days)",
        allowed: &[],
        definition: "",
        computable: true,
    },
    TemplateFieldSpec {
        name: "Stage",
        allowed: &["I", "II", "III", "IV"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Stage Detailed",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Morphology Code",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Description of Morphology Code",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Metastatic Sites",
        allowed: &[],
        definition: "Organs the cancer has metastasized to, e.g. liver, lung, bone, brain",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Vehicle Control",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Media Conditions",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Additional Supplements to Media",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Protocols for Harvesting Cell Lines",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Blood collection date (days from birth)",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Number of lines of metastatic therapy at time of blood draw",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Number of lines of chemotherapy at time of blood draw",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Number of lines of anti-HER2 therapy at time of blood draw",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Number of lines of endocrine therapy at time of blood draw",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Overall Survival(months)",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Treatment Data",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Progression Free Survival(months)",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Gestational Age at Collection",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Fetus Sex",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Menopausal Status",
        allowed: &["premenopause", "perimenopause", "menopause", "postmenopause"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Blood Type",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "RNA-Sequencing Available",
        allowed: &["Yes", "No"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "ExPatientId",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Source",
        allowed: &["AstraZeneca", "Biomedica CRO Inc.", "DxBio", "ATCC", "Biometas", "Menarini", "Coriell", "Precision for Medicine", "BMS", "Discovery Life Sciences", "Rarecyte", "Proteo", "AMSBIO", "UPMC", "Indivumed GmbH", "Research Blood Components", "Garner Biosolutions Inc", "Genentech", "Genentech-UCSF", "MD Anderson", "MT Group", "MGH Klempner", "Other", "OHSU", "DFCI", "UCSF", "Turku", "Duke", "EMD Serono", "Novartis", "Tyra"],
        definition: "Vendor or Academic partner where samples were sourced from",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Country",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Gender",
        allowed: &["Male", "Female", "Unknown"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Race",
        allowed: &["American Indian or Alaska Native", "Asian", "Black or African American", "Hispanic or Latino", "Native Hawaiian or Other Pacific Islander", "White"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "MedicalHistory",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "FamilyHistory",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "AlcoholHistory",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "SmokingHistory",
        allowed: &["Current Smoker", "Former Smoker", "Never Smoked", "not received", "not applicable", "Smoking History Present"],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Number of years smoked or smoking",
        allowed: &[],
        definition: "",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Smoking Notes",
        allowed: &[],
        definition: "Number of packs, ect.",
        computable: false,
    },
    TemplateFieldSpec {
        name: "Donor Notes",
        allowed: &[],
        definition: "Any other info not captured above",
        computable: false,
    },];

/// Columns written by extraction and derived measurements rather than by
/// user directives.
pub const EXTRACTED_FIELDS: &[&str] = &[
    "BMI",
    "HER2 IHC",
    "HER2",
    "HER2 Value",
    "HER2 FISH",
    "HER2 FISH Value",
    "ER",
    "ER Value",
    "PR",
    "PR Value",
    "PDL1",
    "PDL1 Value",
    "ALK",
    "ALK Value",
    "ROS",
    "ROS Value",
    "EGFR",
    "EGFR Value",
    "KRAS",
    "KRAS Value",
    "PIK3CA",
    "PIK3CA Value",
    "ESR1",
    "ESR1 Value",
    "AR",
    "AR Value",
    "BRCA1",
    "BRCA1 Value",
    "BRCA2",
    "BRCA2 Value",
    "Menopausal Status Value",
];

/// Fields backfilled with "not received" when nothing populated them.
pub const DEFAULT_REQUIRED_FIELDS: &[&str] = &[
    "Tube Barcode",
    "Concentration Units",
    "Single or Double Spun",
    "Processing Method",
    "Freeze Thaw Status",
    "Project",
    "Matched FFPE Available",
    "Surgery Type",
    "Tumor Tissue Type",
    "Other Sample Notes",
    "Collection Site",
    "Histology",
    "Sample Timepoint",
    "Sample Timepoint Description",
    "Detailed Anatomical Location",
    "Grade",
    "Tumor Size",
    "TNM",
    "Stage",
    "Stage_detailed",
    "Morphology Code",
    "Description of Morphology Code",
    "Metastatic Sites",
    "Vehicle Control",
    "Media Conditions",
    "Additional Supplements to Media",
    "Protocols for Harvesting Cell Lines",
    "Menopausal Status",
    "HER2 IHC",
    "HER2",
    "FISH",
    "HER2 Change from Previous Sample",
    "ER",
    "ER Notes",
    "ER Status Change From Previous Sample",
    "PR",
    "PR Notes",
    "PR Status Change From Previous Sample",
    "AR Notes",
    "AR Status Change From Previous Sample",
    "ROS",
    "ALK",
    "EGFR",
    "EGFR Allele Information",
    "PDL1",
    "KRAS",
    "PIK3CA",
    "ESR1",
    "BRCA1",
    "BRCA2",
    "FOLR1",
    "Biomarker Notes",
    "Country",
    "Gender",
    "Race",
    "SmokingHistory",
];

/// Looks up a catalog entry by exact field name.
pub fn field_spec(name: &str) -> Option<&'static TemplateFieldSpec> {
    TEMPLATE_FIELDS.iter().find(|spec| spec.name == name)
}

/// Ordered list of output column names.
///
/// The output table has exactly these columns, in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Template {
    fields: Vec<String>,
}

impl Template {
    /// Builds a template, dropping blank names and repeated names after the
    /// first occurrence.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let fields = fields
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.trim().is_empty())
            .filter(|name| seen.insert(name.clone()))
            .collect();
        Self { fields }
    }

    /// The built-in template: every catalog field plus the extracted columns.
    pub fn standard() -> Self {
        Self::new(
            TEMPLATE_FIELDS
                .iter()
                .map(|spec| spec.name)
                .chain(EXTRACTED_FIELDS.iter().copied()),
        )
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|name| name == field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
