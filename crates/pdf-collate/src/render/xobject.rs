//! XObject creation and object copying
//!
//! A source page is turned into a Form XObject so it can be drawn onto a
//! fresh output page under an arbitrary transformation matrix.

use crate::constants::FALLBACK_MEDIA_BOX;
use crate::types::{CollateError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

// =============================================================================
// XObject Creation
// =============================================================================

/// Create an XObject from a source page.
///
/// Objects reachable from the page's resources are copied once per output
/// document; `cache` maps source object ids to their copies.
///
/// # Arguments
/// * `output` - The output document to add the XObject to
/// * `source` - The source document containing the page
/// * `page_id` - The object ID of the source page
/// * `cache` - Cache to avoid copying the same object multiple times
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;

    let media_box = page_media_box(source, page_id)
        .unwrap_or([0.0, 0.0, FALLBACK_MEDIA_BOX.0, FALLBACK_MEDIA_BOX.1]);

    let content_data = get_page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set(
        "BBox",
        Object::Array(media_box.iter().map(|&v| Object::Real(v)).collect()),
    );
    xobject_dict.set("FormType", Object::Integer(1));

    if let Some(resources) = inherited_attribute(source, page_id, b"Resources") {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the content stream data from a page.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(arr) => get_concatenated_content_streams(doc, arr),
            _ => get_single_content_stream(doc, *id),
        },
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

/// Get content from a single content stream reference
fn get_single_content_stream(doc: &Document, id: ObjectId) -> Result<Vec<u8>> {
    if let Ok(stream) = doc.get_object(id)?.as_stream() {
        Ok(stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone()))
    } else {
        Ok(Vec::new())
    }
}

/// Concatenate multiple content streams
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            let content = get_single_content_stream(doc, *id)?;
            result.extend_from_slice(&content);
            result.push(b'\n');
        }
    }

    Ok(result)
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// The copy's id is reserved and cached before its contents are copied, so
/// reference cycles (annotations pointing back at their page) terminate.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let copied = source
                .get_object(*id)
                .map_err(CollateError::from)
                .and_then(|referenced| copy_object_deep(output, source, referenced, cache));
            match copied {
                Ok(copied) => {
                    output.objects.insert(new_id, copied);
                    Ok(Object::Reference(new_id))
                }
                Err(e) => {
                    // Objects copied meanwhile may already point at `new_id`
                    output.objects.insert(new_id, Object::Null);
                    cache.remove(id);
                    Err(e)
                }
            }
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        // Primitive types: just clone
        _ => Ok(obj.clone()),
    }
}

/// Copy a dictionary's entries. Page tree nodes lose their `/Parent` so a
/// link to another page does not pull in the whole source page tree.
fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let is_tree_node = matches!(
        dict.get(b"Type"),
        Ok(Object::Name(name)) if name.as_slice() == b"Page" || name.as_slice() == b"Pages"
    );

    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        if is_tree_node && key.as_slice() == b"Parent" {
            continue;
        }
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

// =============================================================================
// Page Attributes
// =============================================================================

/// Maximum page tree depth walked when resolving inherited attributes
const MAX_TREE_DEPTH: usize = 64;

/// Look up a page attribute, walking up the page tree for inherited values.
///
/// Indirect values are resolved.
pub fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return resolve(doc, value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }

    None
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        _ => Some(obj),
    }
}

/// The page's MediaBox as `[x0, y0, x1, y1]`, inherited if necessary
pub fn page_media_box(doc: &Document, page_id: ObjectId) -> Option<[f32; 4]> {
    let values = inherited_attribute(doc, page_id, b"MediaBox")?
        .as_array()
        .ok()?;
    if values.len() != 4 {
        return None;
    }

    let mut rect = [0.0; 4];
    for (slot, value) in rect.iter_mut().zip(values) {
        *slot = extract_number(resolve(doc, value)?)?;
    }
    Some(rect)
}

/// The page's `/Rotate` in degrees, normalized to 0, 90, 180 or 270.
///
/// Values that are not a multiple of 90 are invalid and read as 0.
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> u16 {
    let degrees = inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|value| value.as_i64().ok())
        .unwrap_or(0);
    match degrees.rem_euclid(360) {
        90 => 90,
        180 => 180,
        270 => 270,
        _ => 0,
    }
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_copy_leaves_no_dangling_reference() {
        let mut source = Document::with_version("1.7");
        let missing = (99, 0);
        let parent = source.add_object(Dictionary::from_iter(vec![(
            "Child",
            Object::Reference(missing),
        )]));

        let mut output = Document::with_version("1.7");
        let mut cache = HashMap::new();
        let result = copy_object_deep(&mut output, &source, &Object::Reference(parent), &mut cache);

        assert!(result.is_err());
        assert!(cache.is_empty());
        // Every id handed out during the attempt resolves to an object
        for id in 1..=output.max_id {
            assert!(output.get_object((id, 0)).is_ok());
        }
    }

    #[test]
    fn test_page_rotation_inherited_and_normalized() {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let rotated = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Rotate", Object::Integer(-90)),
        ]));
        let inheriting = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
        ]));
        let odd = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Rotate", Object::Integer(45)),
        ]));
        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Rotate", Object::Integer(540)),
            ])),
        );

        assert_eq!(page_rotation(&doc, rotated), 270);
        assert_eq!(page_rotation(&doc, inheriting), 180);
        assert_eq!(page_rotation(&doc, odd), 0);
    }
}
