//! Test: every supported and unsupported field kind compiles

use hydrenv::{FieldKind, Hydrate};

#[derive(Default, Hydrate)]
struct Kinds {
    text: String,
    flag: bool,
    a: i8,
    b: i16,
    c: i32,
    d: i64,
    e: isize,
    f: u8,
    g: u16,
    h: u32,
    i: u64,
    j: usize,
    bytes: Vec<u8>,
    qualified: std::vec::Vec<u8>,
    names: Vec<String>,
    ratio: f64,
    maybe: Option<String>,
    #[env(secret)]
    r#type: String,
}

fn main() {
    let descriptors = Kinds::descriptors();

    assert_eq!(descriptors.len(), 18);
    assert_eq!(descriptors[13].kind, FieldKind::Bytes);
    assert_eq!(descriptors[14].kind, FieldKind::Sequence { element: "String" });
    assert_eq!(descriptors[17].name, "type");
    assert!(descriptors[17].secret);
}
