//! Output document under construction

use crate::constants::OUTPUT_PDF_VERSION;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// A document being assembled page by page.
///
/// Pages are collected without a page tree; the tree and catalog are only
/// written by [`OutputDocument::finish`], which lets finished parts be joined
/// by plain object renumbering.
#[derive(Debug)]
pub struct OutputDocument {
    pub(crate) doc: Document,
    pub(crate) pages: Vec<ObjectId>,
    /// Per source document: source object id -> copied object id
    pub(crate) copies: HashMap<u64, HashMap<ObjectId, ObjectId>>,
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputDocument {
    pub fn new() -> Self {
        Self {
            doc: Document::with_version(OUTPUT_PDF_VERSION),
            pages: Vec::new(),
            copies: HashMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Move all pages of `other` to the end of this document
    pub fn append(&mut self, other: OutputDocument) {
        let offset = self.doc.max_id;

        for (id, object) in other.doc.objects {
            self.doc
                .objects
                .insert(shift_id(id, offset), remap_object_refs(object, offset));
        }
        self.pages
            .extend(other.pages.into_iter().map(|id| shift_id(id, offset)));
        self.doc.max_id = self.doc.max_id.max(other.doc.max_id + offset);
    }

    /// Write the page tree and catalog and return the finished document
    pub fn finish(mut self) -> Document {
        let pages_id = self.doc.new_object_id();

        for page_id in &self.pages {
            if let Some(Object::Dictionary(page)) = self.doc.objects.get_mut(page_id) {
                page.set("Parent", Object::Reference(pages_id));
            }
        }

        let kids: Vec<Object> = self.pages.iter().map(|&id| Object::Reference(id)).collect();
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(self.pages.len() as i64)),
        ]);
        self.doc
            .objects
            .insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        self.doc
    }
}

fn shift_id(id: ObjectId, offset: u32) -> ObjectId {
    (id.0 + offset, id.1)
}

/// Recursively shift object references by `offset`
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference(shift_id(id, offset)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_blank_pages(count: usize) -> OutputDocument {
        let mut output = OutputDocument::new();
        for _ in 0..count {
            let marker = output.doc.add_object(Object::Integer(7));
            let page = output.doc.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Marker", Object::Reference(marker)),
            ]));
            output.pages.push(page);
        }
        output
    }

    #[test]
    fn test_append_shifts_ids_without_collisions() {
        let mut first = with_blank_pages(2);
        let second = with_blank_pages(3);
        let objects_before = first.doc.objects.len() + second.doc.objects.len();

        first.append(second);

        assert_eq!(first.page_count(), 5);
        assert_eq!(first.doc.objects.len(), objects_before);
        for page_id in &first.pages {
            let page = first.doc.get_dictionary(*page_id).unwrap();
            let marker = page.get(b"Marker").unwrap().as_reference().unwrap();
            assert_eq!(first.doc.get_object(marker).unwrap().as_i64().unwrap(), 7);
        }
    }

    #[test]
    fn test_finish_builds_page_tree() {
        let doc = with_blank_pages(2).finish();
        assert_eq!(doc.get_pages().len(), 2);
        for (_, page_id) in doc.get_pages() {
            let page = doc.get_dictionary(page_id).unwrap();
            assert!(page.get(b"Parent").is_ok());
        }
    }
}
