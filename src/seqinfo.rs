//! Per-series metadata handed to heuristics
//!
//! A `SeqInfo` summarises one acquired series as extracted from its DICOM
//! headers by the scanning stage. Heuristics only read it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeqInfo {
    pub total_files_till_now: u32,
    pub example_dcm_file: String,
    pub series_id: String,
    pub dcm_dir_name: String,
    pub series_files: u32,
    pub dim1: u32,
    pub dim2: u32,
    pub dim3: u32,
    pub dim4: u32,
    #[serde(rename = "TR")]
    pub tr: f64,
    #[serde(rename = "TE")]
    pub te: f64,
    pub protocol_name: String,
    pub is_motion_corrected: bool,
    pub is_derived: bool,
    pub patient_id: Option<String>,
    pub study_description: Option<String>,
    pub referring_physician_name: Option<String>,
    pub series_description: String,
    pub sequence_name: String,
    pub image_type: Vec<String>,
    pub accession_number: Option<String>,
    pub patient_age: Option<String>,
    pub patient_sex: Option<String>,
    pub date: Option<String>,
    pub series_uid: Option<String>,
}

impl SeqInfo {
    /// Minimal series description, mostly useful in tests
    pub fn new(series_id: impl Into<String>, protocol_name: impl Into<String>) -> Self {
        Self {
            series_id: series_id.into(),
            protocol_name: protocol_name.into(),
            ..Default::default()
        }
    }

    pub fn with_series_description(mut self, description: impl Into<String>) -> Self {
        self.series_description = description.into();
        self
    }

    pub fn with_dims(mut self, dim1: u32, dim2: u32, dim3: u32, dim4: u32) -> Self {
        self.dim1 = dim1;
        self.dim2 = dim2;
        self.dim3 = dim3;
        self.dim4 = dim4;
        self
    }

    pub fn with_image_type<I, S>(mut self, image_type: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_type = image_type.into_iter().map(Into::into).collect();
        self
    }

    pub fn derived(mut self) -> Self {
        self.is_derived = true;
        self
    }

    pub fn motion_corrected(mut self) -> Self {
        self.is_motion_corrected = true;
        self
    }
}
