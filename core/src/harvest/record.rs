use crate::extraction::tags::{
    get_string_value, get_values, INSTITUTION_NAME, MANUFACTURER, MANUFACTURER_MODEL_NAME,
    MODALITY, SERIES_DATE,
};
use crate::harvest::identity::HierarchicalId;
use crate::types::TagSelector;
use dicom_object::InMemDicomObject;
use serde::{Deserialize, Serialize};

/// Acquisition context shared by every record harvested from one frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Provenance {
    pub institution: String,
    pub manufacturer: String,
    pub model: String,
    pub modality: String,
    pub year: String,
}

impl Provenance {
    /// Reads the provenance fields of a frame
    ///
    /// Absent attributes become empty strings. The year is the first four
    /// characters of SeriesDate.
    pub fn from_frame(dcm: &InMemDicomObject) -> Self {
        let text = |tag| get_string_value(dcm, tag).unwrap_or_default();
        Self {
            institution: text(INSTITUTION_NAME),
            manufacturer: text(MANUFACTURER),
            model: text(MANUFACTURER_MODEL_NAME),
            modality: text(MODALITY),
            year: text(SERIES_DATE).chars().take(4).collect(),
        }
    }
}

/// One harvested value
///
/// Field order is the column order of the output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestRecord {
    pub institution: String,
    pub manufacturer: String,
    pub model: String,
    pub modality: String,
    pub year: String,
    pub tag: String,
    pub value: String,
    pub subject: String,
    pub session: String,
    pub series: String,
    pub image: String,
}

impl HarvestRecord {
    pub fn new(provenance: &Provenance, tag: &str, value: String, id: &HierarchicalId) -> Self {
        Self {
            institution: provenance.institution.clone(),
            manufacturer: provenance.manufacturer.clone(),
            model: provenance.model.clone(),
            modality: provenance.modality.clone(),
            year: provenance.year.clone(),
            tag: tag.to_string(),
            value,
            subject: id.subject.clone(),
            session: id.session.clone(),
            series: id.series.clone(),
            image: id.image.clone(),
        }
    }
}

/// Harvests the tags of interest from one frame
///
/// For every selector present in the frame, emits one record per value:
/// multiplicity 0 or 1 yields a single record, larger multiplicities one
/// record per stored value. Absent tags are skipped.
pub fn harvest_frame(
    dcm: &InMemDicomObject,
    selectors: &[TagSelector],
    id: &HierarchicalId,
) -> Vec<HarvestRecord> {
    let provenance = Provenance::from_frame(dcm);
    selectors
        .iter()
        .filter_map(|selector| {
            get_values(dcm, selector.tag).map(|values| (selector, values))
        })
        .flat_map(|(selector, values)| {
            let provenance = &provenance;
            values
                .into_iter()
                .map(move |value| HarvestRecord::new(provenance, &selector.name, value, id))
        })
        .collect()
}
