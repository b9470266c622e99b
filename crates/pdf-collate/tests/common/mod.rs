#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

pub const LETTER: (i64, i64) = (612, 792);
pub const A4: (i64, i64) = (595, 842);

/// Build a PDF whose page `i` has size `sizes[i]` and content naming
/// `"<label> p<i + 1>"`
pub fn create_test_pdf(label: &str, sizes: &[(i64, i64)]) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for (i, &(width, height)) in sizes.iter().enumerate() {
        let content = format!("BT ({} p{}) Tj ET", label, i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(sizes.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

pub fn pdf_bytes(label: &str, sizes: &[(i64, i64)]) -> Vec<u8> {
    to_bytes(create_test_pdf(label, sizes))
}

pub fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

/// Set `/Rotate` on page `index` (zero-based)
pub fn rotate_page(doc: &mut Document, index: usize, degrees: i64) {
    let page_id = page_ids(doc)[index];
    doc.get_dictionary_mut(page_id)
        .unwrap()
        .set("Rotate", Object::Integer(degrees));
}

/// Text of the page's own content stream
pub fn page_content(doc: &Document, page_id: ObjectId) -> String {
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

pub fn uniform(size: (i64, i64), pages: usize) -> Vec<(i64, i64)> {
    vec![size; pages]
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

pub fn number(object: &Object) -> f32 {
    match object {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r,
        other => panic!("not a number: {:?}", other),
    }
}

pub fn media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let page = doc.get_dictionary(page_id).unwrap();
    let values = page.get(b"MediaBox").unwrap().as_array().unwrap();
    [
        number(&values[0]),
        number(&values[1]),
        number(&values[2]),
        number(&values[3]),
    ]
}

/// Text of the original page drawn on `page_id`, whether the page was
/// redrawn through an XObject or copied as is
pub fn page_marker(doc: &Document, page_id: ObjectId) -> String {
    let page = doc.get_dictionary(page_id).unwrap();
    let xobject = page
        .get(b"Resources")
        .and_then(Object::as_dict)
        .and_then(|resources| resources.get(b"XObject"))
        .and_then(Object::as_dict)
        .and_then(|xobjects| xobjects.get(b"P0"))
        .and_then(Object::as_reference);

    let content = match xobject {
        Ok(id) => {
            let stream = doc.get_object(id).unwrap().as_stream().unwrap();
            stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone())
        }
        Err(_) => doc.get_page_content(page_id).unwrap(),
    };

    let text = String::from_utf8_lossy(&content);
    let start = text.find('(').unwrap() + 1;
    let end = text.find(')').unwrap();
    text[start..end].to_string()
}
