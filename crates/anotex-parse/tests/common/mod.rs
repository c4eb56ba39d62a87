//! In-memory PDF builders shared by the integration tests.

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

/// A page to be written: its content stream and annotation dictionaries.
pub struct TestPage {
    pub content: Vec<u8>,
    pub annots: Vec<Object>,
    pub xobjects: Vec<(String, Stream)>,
}

impl TestPage {
    pub fn new(content: &[u8]) -> Self {
        Self {
            content: content.to_vec(),
            annots: Vec::new(),
            xobjects: Vec::new(),
        }
    }

    pub fn annot(mut self, annot: impl Into<Object>) -> Self {
        self.annots.push(annot.into());
        self
    }

    pub fn form(mut self, name: &str, form: Stream) -> Self {
        self.xobjects.push((name.to_string(), form));
        self
    }
}

/// Builds a PDF with a Helvetica `/F1` font on every page.
#[derive(Default)]
pub struct TestPdf {
    info: Option<Dictionary>,
    pages: Vec<TestPage>,
}

impl TestPdf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(mut self, info: Dictionary) -> Self {
        self.info = Some(info);
        self
    }

    pub fn page(mut self, page: TestPage) -> Self {
        self.pages.push(page);
        self
    }

    pub fn build_document(self) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids = Vec::new();
        for page in self.pages {
            let content_id = doc.add_object(Stream::new(dictionary! {}, page.content));
            let mut xobjects = Dictionary::new();
            for (name, form) in page.xobjects {
                let form_id = doc.add_object(form);
                xobjects.set(name, form_id);
            }
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                    "XObject" => xobjects,
                },
                "Annots" => page.annots,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        if let Some(info) = self.info {
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }
        doc
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = self.build_document();
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}

pub fn rect(r: [i64; 4]) -> Object {
    Object::Array(r.iter().map(|&v| Object::Integer(v)).collect())
}

pub fn highlight(r: [i64; 4]) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Highlight",
        "Rect" => rect(r),
    }
}

pub fn note(r: [i64; 4], contents: &str) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Text",
        "Rect" => rect(r),
        "Contents" => Object::string_literal(contents),
    }
}

/// A PDF text string in UTF-16BE with a byte-order mark.
pub fn utf16_text(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// "One Two" at (72, 700) and "Three" at (72, 600), Helvetica 12.
pub const ONE_TWO_THREE: &[u8] = b"BT /F1 12 Tf 72 700 Td (One Two) Tj 0 -100 Td (Three) Tj ET";

const PASSWORD_PADDING: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: Vec<u8> = (0..=255).collect();
    let mut j = 0usize;
    for i in 0..256 {
        j = (j + usize::from(s[i]) + usize::from(key[i % key.len()])) & 0xFF;
        s.swap(i, j);
    }
    let (mut i, mut j) = (0usize, 0usize);
    data.iter()
        .map(|&byte| {
            i = (i + 1) & 0xFF;
            j = (j + usize::from(s[i])) & 0xFF;
            s.swap(i, j);
            byte ^ s[(usize::from(s[i]) + usize::from(s[j])) & 0xFF]
        })
        .collect()
}

/// Encrypt every string nested in `obj`, including inline annotation
/// dictionaries inside arrays.
fn encrypt_strings(obj: &mut Object, key: &[u8]) {
    match obj {
        Object::String(bytes, _) => *bytes = rc4(key, bytes),
        Object::Array(items) => items.iter_mut().for_each(|item| encrypt_strings(item, key)),
        Object::Dictionary(dict) => dict
            .iter_mut()
            .for_each(|(_, value)| encrypt_strings(value, key)),
        Object::Stream(stream) => stream
            .dict
            .iter_mut()
            .for_each(|(_, value)| encrypt_strings(value, key)),
        _ => {}
    }
}

/// Serialize `doc` encrypted with the standard security handler
/// (RC4 40-bit, revision 2) under `user_password`.
pub fn encrypted(mut doc: Document, user_password: &[u8]) -> Vec<u8> {
    let file_id = b"anotex-test-id16";
    let permissions: i32 = -4;

    let len = user_password.len().min(32);
    let mut padded = user_password[..len].to_vec();
    padded.extend_from_slice(&PASSWORD_PADDING[..32 - len]);

    let owner_key = md5::compute(&padded);
    let o_value = rc4(&owner_key[..5], &padded);

    let mut ctx = md5::Context::new();
    ctx.consume(&padded);
    ctx.consume(&o_value);
    ctx.consume((permissions as u32).to_le_bytes());
    ctx.consume(file_id);
    let key = ctx.compute()[..5].to_vec();
    let u_value = rc4(&key, &PASSWORD_PADDING);

    for (&(num, generation), obj) in doc.objects.iter_mut() {
        let mut object_key = key.clone();
        object_key.extend_from_slice(&num.to_le_bytes()[..3]);
        object_key.extend_from_slice(&generation.to_le_bytes()[..2]);
        let digest = md5::compute(&object_key);
        let object_key = &digest[..10];
        encrypt_strings(obj, object_key);
        if let Object::Stream(stream) = obj {
            let content = rc4(object_key, &stream.content);
            stream.set_content(content);
        }
    }

    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "O" => Object::String(o_value, StringFormat::Literal),
        "U" => Object::String(u_value, StringFormat::Literal),
        "P" => i64::from(permissions),
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(file_id.to_vec(), StringFormat::Literal),
            Object::String(file_id.to_vec(), StringFormat::Literal),
        ]),
    );

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
