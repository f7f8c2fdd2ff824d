//! Legacy MR attribute reconstruction
//!
//! Enhanced MR objects retire ScanningSequence, SequenceVariant, ScanOptions
//! and AngioFlag from the per-frame encoding. This module derives them again
//! from the enhanced per-frame attributes of one materialized frame, so that
//! each frame carries what a single-frame MR image would have carried.
//!
//! Each classification is an ordered table of [`Rule`]s. Every rule looks at
//! the frame on its own and may contribute one code; contributions are
//! unioned with any pre-existing values, de-duplicated and sorted.

use crate::error::{HarvestError, Result};
use crate::types::FrameType;
use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use dicom_object::InMemDicomObject;
use log::trace;
use std::collections::BTreeSet;

use super::tags::{
    get_multi_string_value, get_multiplicity, get_string_value, ANGIO_FLAG,
    ECHO_PLANAR_PULSE_SEQUENCE, ECHO_PULSE_SEQUENCE, ECHO_TIME, EFFECTIVE_ECHO_TIME,
    FLOW_COMPENSATION, FRAME_TYPE, INVERSION_RECOVERY, MAGNETIZATION_TRANSFER,
    OVERSAMPLING_PHASE, PARTIAL_FOURIER_DIRECTION, RECTILINEAR_PHASE_ENCODE_REORDERING,
    SCANNING_SEQUENCE, SCAN_OPTIONS, SEGMENTED_K_SPACE_TRAVERSAL, SEQUENCE_VARIANT,
    SPATIAL_PRESATURATION, SPECTRALLY_SELECTED_SUPPRESSION, SPOILING,
    STEADY_STATE_PULSE_SEQUENCE,
};

/// What a rule gets to look at
pub struct RuleInput<'a> {
    pub attributes: &'a InMemDicomObject,
    pub frame_type: &'a FrameType,
}

impl RuleInput<'_> {
    fn value(&self, tag: Tag) -> Option<String> {
        get_string_value(self.attributes, tag)
    }

    /// Value of `tag`, or `default` when absent
    fn value_or(&self, tag: Tag, default: &str) -> String {
        self.value(tag).unwrap_or_else(|| default.to_string())
    }

    fn flavor(&self) -> &str {
        self.frame_type.flavor.as_deref().unwrap_or_default()
    }
}

/// One entry of a classification table
pub struct Rule {
    pub name: &'static str,
    pub derive: fn(&RuleInput) -> Option<&'static str>,
}

fn when(condition: bool, code: &'static str) -> Option<&'static str> {
    condition.then_some(code)
}

/// ScanningSequence (0018,0020)
///
/// GR and SE are tested independently: an echo pulse sequence that is
/// neither SPIN nor GRADIENT (e.g. BOTH) contributes both codes.
pub const SCANNING_SEQUENCE_RULES: &[Rule] = &[
    Rule {
        name: "gradient recalled",
        derive: |input| {
            input
                .value(ECHO_PULSE_SEQUENCE)
                .and_then(|v| when(v != "SPIN", "GR"))
        },
    },
    Rule {
        name: "spin echo",
        derive: |input| {
            input
                .value(ECHO_PULSE_SEQUENCE)
                .and_then(|v| when(v != "GRADIENT", "SE"))
        },
    },
    Rule {
        name: "inversion recovery",
        derive: |input| when(input.value_or(INVERSION_RECOVERY, "NO") == "YES", "IR"),
    },
    Rule {
        name: "echo planar",
        derive: |input| when(input.value_or(ECHO_PLANAR_PULSE_SEQUENCE, "NO") == "YES", "EP"),
    },
];

/// SequenceVariant (0018,0021)
pub const SEQUENCE_VARIANT_RULES: &[Rule] = &[
    Rule {
        name: "segmented k-space",
        derive: |input| {
            when(
                input.value_or(SEGMENTED_K_SPACE_TRAVERSAL, "SINGLE") != "SINGLE",
                "SK",
            )
        },
    },
    Rule {
        name: "magnetization transfer contrast",
        derive: |input| when(input.value_or(MAGNETIZATION_TRANSFER, "NONE") != "NONE", "MTC"),
    },
    Rule {
        name: "steady state",
        derive: |input| match input.value(STEADY_STATE_PULSE_SEQUENCE).as_deref() {
            None | Some("NONE") => None,
            Some("TIME_REVERSED") => Some("TRSS"),
            Some(_) => Some("SS"),
        },
    },
    Rule {
        name: "spoiled",
        derive: |input| when(input.value_or(SPOILING, "NONE") != "NONE", "SP"),
    },
    Rule {
        name: "oversampling phase",
        derive: |input| when(input.value_or(OVERSAMPLING_PHASE, "NONE") != "NONE", "OSP"),
    },
];

/// ScanOptions (0018,0022)
pub const SCAN_OPTIONS_RULES: &[Rule] = &[
    Rule {
        name: "phase encode reordering",
        derive: |input| {
            when(
                input.value_or(RECTILINEAR_PHASE_ENCODE_REORDERING, "LINEAR") != "LINEAR",
                "PER",
            )
        },
    },
    Rule {
        name: "cardiac gating",
        derive: |input| when(input.flavor().starts_with("CARD"), "CG"),
    },
    Rule {
        name: "respiratory gating",
        derive: |input| when(input.flavor().ends_with("RESP_GATED"), "RG"),
    },
    Rule {
        name: "partial fourier",
        derive: |input| match input.value(PARTIAL_FOURIER_DIRECTION).as_deref() {
            Some("PHASE") => Some("PFP"),
            Some("FREQUENCY") => Some("PFF"),
            _ => None,
        },
    },
    Rule {
        name: "spatial presaturation",
        derive: |input| when(input.value_or(SPATIAL_PRESATURATION, "NONE") != "NONE", "SP"),
    },
    Rule {
        name: "fat suppression",
        derive: |input| {
            when(
                input
                    .value_or(SPECTRALLY_SELECTED_SUPPRESSION, "NONE")
                    .starts_with("FAT"),
                "FS",
            )
        },
    },
    Rule {
        name: "flow compensation",
        derive: |input| when(input.value_or(FLOW_COMPENSATION, "NONE") != "NONE", "FC"),
    },
];

/// Reads the existing values of a classification attribute
///
/// Branches on the declared multiplicity: a single-valued attribute is one
/// code, a multi-valued one contributes each of its values. Empty
/// attributes contribute nothing.
fn existing_codes(dcm: &InMemDicomObject, tag: Tag) -> BTreeSet<String> {
    let codes = match get_multiplicity(dcm, tag) {
        None | Some(0) => Vec::new(),
        Some(1) => get_string_value(dcm, tag).into_iter().collect(),
        Some(_) => get_multi_string_value(dcm, tag).unwrap_or_default(),
    };
    codes.into_iter().filter(|code| !code.is_empty()).collect()
}

/// Evaluates a rule table on top of the attribute's pre-existing values
///
/// Returns the sorted, de-duplicated codes. When `default` is given and no
/// code results, the classification is that single default code.
pub fn classify(
    input: &RuleInput,
    tag: Tag,
    rules: &[Rule],
    default: Option<&'static str>,
) -> Vec<String> {
    let mut codes = existing_codes(input.attributes, tag);
    for rule in rules {
        if let Some(code) = (rule.derive)(input) {
            trace!("{} rule '{}' adds {}", tag, rule.name, code);
            codes.insert(code.to_string());
        }
    }
    if codes.is_empty() {
        if let Some(code) = default {
            codes.insert(code.to_string());
        }
    }
    codes.into_iter().collect()
}

/// Extracts the FrameType of a frame
///
/// # Errors
///
/// Returns [`HarvestError::TagNotFound`] if FrameType is absent and
/// [`HarvestError::InvalidValue`] if it has fewer than three components.
pub fn extract_frame_type(dcm: &InMemDicomObject) -> Result<FrameType> {
    let values = get_multi_string_value(dcm, FRAME_TYPE)
        .ok_or_else(|| HarvestError::TagNotFound(format!("FrameType {}", FRAME_TYPE)))?;
    let frame_type = FrameType::from_values(&values);
    frame_type.require_flavor()?;
    Ok(frame_type)
}

/// Reconstructs the legacy MR attributes of one materialized frame
///
/// Applies, in order:
/// 1. EchoTime ← EffectiveEchoTime, when present
/// 2. ScanningSequence from [`SCANNING_SEQUENCE_RULES`]
/// 3. SequenceVariant from [`SEQUENCE_VARIANT_RULES`] (defaults to NONE)
/// 4. AngioFlag = Y when the FrameType flavor is ANGIO
/// 5. ScanOptions from [`SCAN_OPTIONS_RULES`]
///
/// The result only depends on the enhanced attributes and the pre-existing
/// legacy values, so running it again on its own output changes nothing.
///
/// # Errors
///
/// Fails if FrameType is missing or has no third component.
pub fn reconstruct_legacy_attributes(dcm: &InMemDicomObject) -> Result<InMemDicomObject> {
    let frame_type = extract_frame_type(dcm)?;
    let mut fixed = dcm.clone();

    if let Ok(effective) = dcm.element(EFFECTIVE_ECHO_TIME) {
        let echo_time = effective.to_str()?.trim().to_string();
        fixed.put(DataElement::new(
            ECHO_TIME,
            VR::DS,
            PrimitiveValue::from(echo_time),
        ));
    }

    let input = RuleInput {
        attributes: dcm,
        frame_type: &frame_type,
    };
    let scanning_sequence = classify(&input, SCANNING_SEQUENCE, SCANNING_SEQUENCE_RULES, None);
    let sequence_variant = classify(
        &input,
        SEQUENCE_VARIANT,
        SEQUENCE_VARIANT_RULES,
        Some("NONE"),
    );
    let scan_options = classify(&input, SCAN_OPTIONS, SCAN_OPTIONS_RULES, None);

    fixed.put(codes_element(SCANNING_SEQUENCE, scanning_sequence));
    fixed.put(codes_element(SEQUENCE_VARIANT, sequence_variant));
    if frame_type.require_flavor()? == "ANGIO" {
        fixed.put(DataElement::new(ANGIO_FLAG, VR::CS, PrimitiveValue::from("Y")));
    }
    fixed.put(codes_element(SCAN_OPTIONS, scan_options));

    Ok(fixed)
}

fn codes_element(tag: Tag, codes: Vec<String>) -> DataElement<InMemDicomObject> {
    if codes.is_empty() {
        DataElement::empty(tag, VR::CS)
    } else {
        DataElement::new(tag, VR::CS, PrimitiveValue::Strs(codes.into()))
    }
}
