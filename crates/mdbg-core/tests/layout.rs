//! Tests for the class layout cache.

mod common;

use common::write_temp;
use mdbg_core::{ClassLayoutCache, MdbgError};

const OBJECT: &str = "Ljava_2Flang_2FObject_3B";
const STRING: &str = "Ljava_2Flang_2FString_3B";
const POINT: &str = "Lexample_2FPoint_3B";

fn sample_defs() -> String
{
    format!(
        "// runtime object layout\n\
         OBJ_CLASS({OBJECT}, 16, THE_ROOT)\n\
         OBJ_FIELD({OBJECT}, shadow, 0, 8)\n\
         OBJ_FIELD({OBJECT}, monitor, 8, 4)\n\
         OBJ_CLASS({STRING}, 32, {OBJECT})\n\
         OBJ_CLASS({POINT}, 24, {OBJECT})\n\
         OBJ_FIELD({POINT}, x, 16, 4)\n\
         OBJ_FIELD({POINT}, y, 20, 4)\n\
         OBJ_FIELD({STRING}, count, 16, 4)\n"
    )
}

#[test]
fn test_load_parses_classes_and_fields()
{
    let file = write_temp(&sample_defs());
    let cache = ClassLayoutCache::load(file.path()).unwrap();

    assert_eq!(cache.len(), 3);

    let object = cache.class(OBJECT).unwrap();
    assert_eq!(object.size, 16);
    assert!(object.is_root());
    assert_eq!(object.fields.len(), 2);
    assert_eq!(object.fields[0].name, "shadow");
    assert_eq!(object.fields[1].offset, 8);
    assert_eq!(object.fields[1].length, 4);
}

#[test]
fn test_fields_attach_by_name_not_position()
{
    let file = write_temp(&sample_defs());
    let cache = ClassLayoutCache::load(file.path()).unwrap();

    // The `count` field line appears after the Point declarations but
    // names String explicitly.
    let string = cache.class(STRING).unwrap();
    assert_eq!(string.fields.len(), 1);
    assert_eq!(string.fields[0].name, "count");

    let point = cache.class(POINT).unwrap();
    assert_eq!(point.fields.len(), 2);
}

#[test]
fn test_chain_is_root_first()
{
    let file = write_temp(&sample_defs());
    let cache = ClassLayoutCache::load(file.path()).unwrap();

    let chain = cache.chain(POINT).unwrap();
    let names: Vec<&str> = chain.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, vec![OBJECT, POINT]);
}

#[test]
fn test_chain_with_missing_link_is_none()
{
    let file = write_temp(&format!("OBJ_CLASS({POINT}, 24, {OBJECT})\n"));
    let cache = ClassLayoutCache::load(file.path()).unwrap();

    // Point's base class was never declared: no partial chain.
    assert!(cache.chain(POINT).is_none());
    assert!(cache.chain("Lmissing_3B").is_none());
}

#[test]
fn test_cyclic_chain_terminates()
{
    let file = write_temp(
        "OBJ_CLASS(La_3B, 8, Lb_3B)\n\
         OBJ_CLASS(Lb_3B, 8, La_3B)\n",
    );
    let cache = ClassLayoutCache::load(file.path()).unwrap();
    assert!(cache.chain("La_3B").is_none());
}

#[test]
fn test_malformed_lines_are_skipped()
{
    let file = write_temp(&format!(
        "OBJ_CLASS({OBJECT}, 16, THE_ROOT)\n\
         OBJ_CLASS(broken\n\
         OBJ_CLASS(Lno_2FSize_3B, huge, THE_ROOT)\n\
         OBJ_FIELD({OBJECT}, shadow, 0, 8)\n\
         OBJ_FIELD(Lunknown_3B, ghost, 0, 8)\n\
         OBJ_FIELD({OBJECT}, monitor, eight, 4)\n\
         #define SOMETHING_ELSE 1\n"
    ));
    let cache = ClassLayoutCache::load(file.path()).unwrap();

    assert_eq!(cache.len(), 1);
    let object = cache.class(OBJECT).unwrap();
    assert_eq!(object.fields.len(), 1);
    assert_eq!(object.fields[0].name, "shadow");
}

#[test]
fn test_find_classes_by_substring()
{
    let file = write_temp(&sample_defs());
    let cache = ClassLayoutCache::load(file.path()).unwrap();

    let matches = cache.find_classes("java_2Flang");
    assert_eq!(matches, vec![OBJECT, STRING]);

    assert!(cache.find_classes("NoSuchClass").is_empty());
}

#[test]
fn test_missing_file_is_io_error()
{
    let result = ClassLayoutCache::load(std::path::Path::new("/nonexistent/core.macros.def"));
    assert!(matches!(result, Err(MdbgError::Io(_))));
}
