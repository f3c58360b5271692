//! Page extraction: one standalone PDF per source page, via lopdf.
//!
//! Each page is deep-copied into a fresh document whose page tree holds only
//! that page. Two details keep the result self-contained:
//!
//! * inheritable attributes (`Resources`, `MediaBox`, `CropBox`, `Rotate`)
//!   that the page takes from its page-tree ancestors are written onto the
//!   copy, since the ancestors are not copied;
//! * references that lead to other pages or page-tree nodes (link
//!   destinations, the `Parent` chain) become `null`, otherwise copying one
//!   page would drag the whole document along.

use std::collections::{HashMap, VecDeque};

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::error::SplitError;

/// Attributes a page may inherit from its page-tree ancestors.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in broken files.
const MAX_TREE_DEPTH: usize = 64;

/// Parse decoded bytes into a document.
pub fn parse_document(bytes: &[u8]) -> Result<Document, SplitError> {
    let doc = Document::load_mem(bytes).map_err(|e| SplitError::InvalidPdf {
        detail: e.to_string(),
    })?;
    debug!("Parsed PDF {} ({} objects)", doc.version, doc.objects.len());
    Ok(doc)
}

/// Page object ids in document order.
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Number of pages; zero is rejected because there is nothing to split.
pub fn page_count(doc: &Document) -> Result<usize, SplitError> {
    match doc.get_pages().len() {
        0 => Err(SplitError::EmptyDocument),
        n => Ok(n),
    }
}

/// Serialize every page as its own PDF. The first failing page aborts the
/// whole split.
pub fn extract_pages(doc: &Document) -> Result<Vec<Vec<u8>>, SplitError> {
    page_ids(doc)
        .into_iter()
        .enumerate()
        .map(|(idx, page_id)| {
            let bytes =
                extract_page(doc, page_id).map_err(|e| SplitError::PageProcessingFailed {
                    page: idx + 1,
                    detail: e.to_string(),
                })?;
            debug!("Extracted page {} → {} bytes", idx + 1, bytes.len());
            Ok(bytes)
        })
        .collect()
}

/// Build and serialize a single-page document holding `page_id`.
pub fn extract_page(source: &Document, page_id: ObjectId) -> Result<Vec<u8>, lopdf::Error> {
    let mut target = Document::with_version(source.version.clone());
    let pages_id = target.new_object_id();

    let page = PageCopier::new(source, &mut target).copy_page(page_id, pages_id)?;

    target.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page)],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = target.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    target.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    target.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Copies one page and everything it references from `source` to `target`.
///
/// References are followed breadth-first through `pending`, so long reference
/// chains such as action `/Next` lists use constant stack. Only direct nested
/// arrays and dictionaries are walked recursively.
struct PageCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
    /// `(source id, reserved target id)` still to be copied.
    pending: VecDeque<(ObjectId, ObjectId)>,
}

impl<'a> PageCopier<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            id_map: HashMap::new(),
            pending: VecDeque::new(),
        }
    }

    fn copy_page(&mut self, page_id: ObjectId, parent: ObjectId) -> Result<ObjectId, lopdf::Error> {
        // Reserved up front so annotation back-pointers (/P) resolve to the copy.
        let new_id = self.reserve(page_id);

        let mut page = self.source.get_dictionary(page_id)?.clone();
        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited(self.source, &page, key) {
                page.set(key, value.clone());
            }
        }
        page.remove(b"Parent");

        let mut page = self.remap_dict(page);
        page.set("Parent", parent);
        self.target.objects.insert(new_id, Object::Dictionary(page));

        self.drain();
        Ok(new_id)
    }

    fn reserve(&mut self, source_id: ObjectId) -> ObjectId {
        let new_id = self.target.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);
        new_id
    }

    /// Target id for `source_id`, queueing the object on first sight.
    fn map_reference(&mut self, source_id: ObjectId) -> ObjectId {
        if let Some(&mapped) = self.id_map.get(&source_id) {
            return mapped;
        }
        let new_id = self.reserve(source_id);
        self.pending.push_back((source_id, new_id));
        new_id
    }

    fn drain(&mut self) {
        while let Some((source_id, new_id)) = self.pending.pop_front() {
            // Dangling references and other pages stay null.
            let object = match self.source.get_object(source_id) {
                Ok(object) if !is_page_tree_node(object) => object.clone(),
                _ => continue,
            };
            let copied = self.remap(object);
            self.target.objects.insert(new_id, copied);
        }
    }

    fn remap(&mut self, object: Object) -> Object {
        match object {
            Object::Reference(id) => Object::Reference(self.map_reference(id)),
            Object::Array(items) => {
                Object::Array(items.into_iter().map(|item| self.remap(item)).collect())
            }
            Object::Dictionary(dict) => Object::Dictionary(self.remap_dict(dict)),
            Object::Stream(mut stream) => {
                stream.dict = self.remap_dict(stream.dict);
                Object::Stream(stream)
            }
            other => other,
        }
    }

    fn remap_dict(&mut self, mut dict: Dictionary) -> Dictionary {
        for (_, value) in dict.iter_mut() {
            let original = std::mem::replace(value, Object::Null);
            *value = self.remap(original);
        }
        dict
    }
}

/// Nearest ancestor value of an inheritable page attribute.
fn inherited<'d>(doc: &'d Document, page: &Dictionary, key: &[u8]) -> Option<&'d Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

fn is_page_tree_node(object: &Object) -> bool {
    object
        .as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(Object::as_name)
        .is_ok_and(|name| name == b"Page" || name == b"Pages")
}
