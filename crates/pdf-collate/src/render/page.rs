//! Output page construction
//!
//! Two ways a source page reaches an output document: redrawn as an XObject
//! on a new canvas, or copied with its dictionary intact.

use super::output::OutputDocument;
use super::xobject::{
    copy_object_deep, create_page_xobject, inherited_attribute, page_media_box, page_rotation,
};
use super::LoadedDocument;
use crate::constants::{FALLBACK_MEDIA_BOX, INHERITABLE_PAGE_KEYS, PAGE_XOBJECT_NAME};
use crate::geometry::TransformPlan;
use crate::types::{CollateError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Draw page `index` of `source` onto a fresh page of `plan.target_size`.
pub fn render_planned_page(
    output: &mut OutputDocument,
    source: &LoadedDocument,
    index: usize,
    plan: &TransformPlan,
) -> Result<()> {
    let page_id = source.page_id(index)?;
    let doc = &mut output.doc;
    let cache = output.copies.entry(source.key).or_default();

    let xobject_id = create_page_xobject(doc, &source.doc, page_id, cache)?;

    let media_box = page_media_box(&source.doc, page_id)
        .unwrap_or([0.0, 0.0, FALLBACK_MEDIA_BOX.0, FALLBACK_MEDIA_BOX.1]);
    let matrix = placement_matrix(plan, media_box, page_rotation(&source.doc, page_id));
    let content = generate_placement_command(PAGE_XOBJECT_NAME, &matrix);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut xobjects = Dictionary::new();
    xobjects.set(PAGE_XOBJECT_NAME, Object::Reference(xobject_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let page_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(plan.target_size.width),
                Object::Real(plan.target_size.height),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]);

    let page_id = doc.add_object(page_dict);
    output.pages.push(page_id);
    Ok(())
}

/// Copy page `index` of `source` into `output` unchanged.
///
/// Attributes the page inherits from its page tree are written onto the copy,
/// since the source tree is not carried over.
pub fn copy_page(output: &mut OutputDocument, source: &LoadedDocument, index: usize) -> Result<()> {
    let page_id = source.page_id(index)?;
    let doc = &mut output.doc;
    let cache = output.copies.entry(source.key).or_default();

    // Reserve the copy's id first so back-references (e.g. /P in annotations)
    // resolve to the copy instead of dragging in the source page again. A page
    // reached earlier through a link destination already has an id; its copy
    // is completed here.
    let new_page_id = match cache.get(&page_id) {
        Some(&id) if output.pages.contains(&id) => {
            return Err(CollateError::InvalidPage(format!(
                "page {} was already copied into this document",
                index + 1
            )));
        }
        Some(&id) => id,
        None => {
            let id = doc.new_object_id();
            cache.insert(page_id, id);
            id
        }
    };

    match copy_page_dictionary(doc, &source.doc, page_id, cache) {
        Ok(new_dict) => {
            doc.objects.insert(new_page_id, Object::Dictionary(new_dict));
            output.pages.push(new_page_id);
            Ok(())
        }
        Err(e) => {
            doc.objects.insert(new_page_id, Object::Null);
            cache.remove(&page_id);
            Err(e)
        }
    }
}

/// The page's dictionary copied into `doc`, with inherited attributes made
/// explicit and without `/Parent`
fn copy_page_dictionary(
    doc: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let page_dict = source.get_dictionary(page_id)?;

    let mut new_dict = Dictionary::new();
    for (key, value) in page_dict.iter() {
        if key.as_slice() == b"Parent" {
            continue;
        }
        new_dict.set(key.clone(), copy_object_deep(doc, source, value, cache)?);
    }

    for key in INHERITABLE_PAGE_KEYS {
        if new_dict.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(source, page_id, key) {
            new_dict.set(key.to_vec(), copy_object_deep(doc, source, value, cache)?);
        }
    }
    Ok(new_dict)
}

/// Matrix drawing a page's form onto the target canvas.
///
/// The form's coordinates start at the MediaBox origin, which is not always
/// (0, 0). The page is turned upright according to its `/Rotate` (clockwise
/// degrees), then scaled and offset as planned.
fn placement_matrix(plan: &TransformPlan, media_box: [f32; 4], rotation: u16) -> [f32; 6] {
    let [x0, y0, x1, y1] = media_box;
    let (origin_x, origin_y) = (x0.min(x1), y0.min(y1));
    let (width, height) = ((x1 - x0).abs(), (y1 - y0).abs());

    // [a b c d e f] taking (0, 0)..(width, height) to the displayed page
    let [a, b, c, d, e, f] = match rotation {
        90 => [0.0, -1.0, 1.0, 0.0, 0.0, width],
        180 => [-1.0, 0.0, 0.0, -1.0, width, height],
        270 => [0.0, 1.0, -1.0, 0.0, height, 0.0],
        _ => [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    let s = plan.scale;
    let e = s * (e - a * origin_x - c * origin_y) + plan.offset_x;
    let f = s * (f - b * origin_x - d * origin_y) + plan.offset_y;
    [s * a, s * b, s * c, s * d, e, f].map(|v| if v == 0.0 { 0.0 } else { v })
}

/// Generate the PDF content stream command to place a page.
fn generate_placement_command(xobject_name: &str, matrix: &[f32; 6]) -> String {
    let [a, b, c, d, e, f] = matrix;
    format!(
        "q {} {} {} {} {} {} cm /{} Do Q\n",
        a, b, c, d, e, f, xobject_name
    )
}
