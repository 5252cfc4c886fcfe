//! Page tree, catalog and document info

use crate::constants::PDF_VERSION;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Start an empty output document; returns it with the reserved page tree ID
pub fn new_document() -> (Document, ObjectId) {
    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();
    (doc, pages_id)
}

/// Write the page tree, catalog and optional title once all pages exist
pub fn finish_document(
    doc: &mut Document,
    pages_id: ObjectId,
    page_ids: &[ObjectId],
    title: Option<&str>,
) {
    let kids = page_ids
        .iter()
        .map(|id| Object::Reference(*id))
        .collect::<Vec<_>>();

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(page_ids.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(Dictionary::from_iter(vec![(
            "Title",
            Object::string_literal(title),
        )]));
        doc.trailer.set("Info", info_id);
    }
}
