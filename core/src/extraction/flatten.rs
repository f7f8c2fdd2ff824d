use dicom_object::InMemDicomObject;

/// Flattens a (possibly nested) data set into a single flat attribute set
///
/// Walks all data elements depth-first, descending into every item of every
/// sequence. Sequence elements themselves are dropped; their leaf descendants
/// are kept under their own tags. When a tag is met more than once, the
/// occurrence visited last wins.
pub fn flatten(dcm: &InMemDicomObject) -> InMemDicomObject {
    let mut flat = InMemDicomObject::new_empty();
    collect_leaves(dcm, &mut flat);
    flat
}

/// Flattens every item of a sequence into one flat attribute set
///
/// Items are visited in order, so a tag present in several items keeps the
/// value from the last one.
pub fn flatten_items(items: &[InMemDicomObject]) -> InMemDicomObject {
    let mut flat = InMemDicomObject::new_empty();
    for item in items {
        collect_leaves(item, &mut flat);
    }
    flat
}

fn collect_leaves(dcm: &InMemDicomObject, out: &mut InMemDicomObject) {
    for elem in dcm.iter() {
        match elem.items() {
            Some(items) => {
                for item in items {
                    collect_leaves(item, out);
                }
            }
            None => {
                out.put(elem.clone());
            }
        }
    }
}

/// Returns a new attribute set equal to `base` overlaid by `top`
///
/// Elements of `top` replace elements of `base` with the same tag entirely;
/// neither input is modified.
pub fn overlay(base: &InMemDicomObject, top: &InMemDicomObject) -> InMemDicomObject {
    let mut merged = base.clone();
    for elem in top.iter() {
        merged.put(elem.clone());
    }
    merged
}
