use alloc::vec;
use alloc::vec::Vec;

use crate::{Entity, EntityReader, QuoteKind};

/// Parses to completion, panicking on any defect.
fn entities(src: &[u8]) -> Vec<Entity> {
    let mut reader = EntityReader::from_slice(src);
    reader
        .entities()
        .collect::<Result<Vec<_>, _>>()
        .expect("well-formed source")
}

fn num(text: &str) -> Entity {
    Entity::Numeric { text: text.into() }
}

fn op(name: &str) -> Entity {
    Entity::Operation { name: name.into() }
}

#[test]
fn final_token_alone() {
    assert_eq!(entities(b"|;"), vec![Entity::Eof]);
}

#[test]
fn filler_before_final_token() {
    assert_eq!(entities(b"  # comment\n\t\n|;"), vec![Entity::Eof]);
}

#[test]
fn array_of_three_numerics() {
    assert_eq!(
        entities(b"[1,2,3]|;"),
        vec![
            Entity::BeginGroup,
            num("1"),
            Entity::EndGroup,
            Entity::BeginGroup,
            num("2"),
            Entity::EndGroup,
            Entity::BeginGroup,
            num("3"),
            Entity::EndGroup,
            Entity::Array { count: 3 },
            Entity::Eof,
        ]
    );
}

#[test]
fn empty_array() {
    assert_eq!(
        entities(b"[]|;"),
        vec![Entity::Array { count: 0 }, Entity::Eof]
    );
}

#[test]
fn empty_elements_still_count() {
    // `[,]` is two empty elements, each in its implicit group.
    assert_eq!(
        entities(b"[,]|;"),
        vec![
            Entity::BeginGroup,
            Entity::EndGroup,
            Entity::BeginGroup,
            Entity::EndGroup,
            Entity::Array { count: 2 },
            Entity::Eof,
        ]
    );
}

#[test]
fn nested_empty_array() {
    assert_eq!(
        entities(b"[[]]|;"),
        vec![
            Entity::BeginGroup,
            Entity::Array { count: 0 },
            Entity::EndGroup,
            Entity::Array { count: 1 },
            Entity::Eof,
        ]
    );
}

#[test]
fn group_inside_array_element() {
    assert_eq!(
        entities(b"[(1)]|;"),
        vec![
            Entity::BeginGroup,
            Entity::BeginGroup,
            num("1"),
            Entity::EndGroup,
            Entity::EndGroup,
            Entity::Array { count: 1 },
            Entity::Eof,
        ]
    );
}

#[test]
fn simple_metacommand() {
    assert_eq!(
        entities(b"%foo;|;"),
        vec![
            Entity::BeginMeta,
            Entity::MetaToken { text: "foo".into() },
            Entity::EndMeta,
            Entity::Eof,
        ]
    );
}

#[test]
fn metacommand_tokens_are_not_dispatched() {
    // Inside `% ... ;` even digits and brackets are bare meta tokens.
    assert_eq!(
        entities(b"%v 2 [;|;"),
        vec![
            Entity::BeginMeta,
            Entity::MetaToken { text: "v".into() },
            Entity::MetaToken { text: "2".into() },
            Entity::MetaToken { text: "[".into() },
            Entity::EndMeta,
            Entity::Eof,
        ]
    );
}

#[test]
fn meta_string() {
    assert_eq!(
        entities(b"%include \"f.txt\";|;"),
        vec![
            Entity::BeginMeta,
            Entity::MetaToken {
                text: "include".into()
            },
            Entity::MetaString {
                prefix: "".into(),
                kind: QuoteKind::Quoted,
                payload: "f.txt".into(),
            },
            Entity::EndMeta,
            Entity::Eof,
        ]
    );
}

#[test]
fn nested_groups() {
    assert_eq!(
        entities(b"((=x))|;"),
        vec![
            Entity::BeginGroup,
            Entity::BeginGroup,
            Entity::Get { name: "x".into() },
            Entity::EndGroup,
            Entity::EndGroup,
            Entity::Eof,
        ]
    );
}

#[test]
fn name_entities_by_leading_character() {
    assert_eq!(
        entities(b"?v @c :a =g add\n|;"),
        vec![
            Entity::Variable { name: "v".into() },
            Entity::Constant { name: "c".into() },
            Entity::Assign { name: "a".into() },
            Entity::Get { name: "g".into() },
            op("add"),
            Entity::Eof,
        ]
    );
}

#[test]
fn numeric_shapes() {
    assert_eq!(
        entities(b"+1 -2.5 3e9 0xFF\n|;"),
        vec![num("+1"), num("-2.5"), num("3e9"), num("0xFF"), Entity::Eof]
    );
}

#[test]
fn quoted_string_with_prefix() {
    assert_eq!(
        entities(b"img\"a\\\"b\" |;"),
        vec![
            Entity::String {
                prefix: "img".into(),
                kind: QuoteKind::Quoted,
                payload: "a\\\"b".into(),
            },
            Entity::Eof,
        ]
    );
}

#[test]
fn curly_string_keeps_inner_braces() {
    assert_eq!(
        entities(b"body{outer {inner} tail} |;"),
        vec![
            Entity::String {
                prefix: "body".into(),
                kind: QuoteKind::Curly,
                payload: "outer {inner} tail".into(),
            },
            Entity::Eof,
        ]
    );
}

#[test]
fn string_spanning_lines_keeps_canonical_breaks() {
    assert_eq!(
        entities(b"\"a\r\nb\" |;"),
        vec![
            Entity::String {
                prefix: "".into(),
                kind: QuoteKind::Quoted,
                payload: "a\nb".into(),
            },
            Entity::Eof,
        ]
    );
}

#[test]
fn embedded_prefix_only() {
    assert_eq!(
        entities(b"blob`\n|;"),
        vec![
            Entity::Embedded {
                prefix: "blob".into()
            },
            Entity::Eof,
        ]
    );
}

#[test]
fn strings_as_array_elements() {
    assert_eq!(
        entities(b"[\"a\",\"b\"]|;"),
        vec![
            Entity::BeginGroup,
            Entity::String {
                prefix: "".into(),
                kind: QuoteKind::Quoted,
                payload: "a".into(),
            },
            Entity::EndGroup,
            Entity::BeginGroup,
            Entity::String {
                prefix: "".into(),
                kind: QuoteKind::Quoted,
                payload: "b".into(),
            },
            Entity::EndGroup,
            Entity::Array { count: 2 },
            Entity::Eof,
        ]
    );
}

#[test]
fn bom_is_stripped_and_reported() {
    let mut reader = EntityReader::from_slice(b"\xEF\xBB\xBF|;");
    assert_eq!(reader.read(), Ok(Entity::Eof));
    assert!(reader.had_bom());
}

#[test]
fn eof_is_sticky() {
    let mut reader = EntityReader::from_slice(b"|;");
    assert_eq!(reader.read(), Ok(Entity::Eof));
    assert_eq!(reader.read(), Ok(Entity::Eof));
    assert_eq!(reader.read(), Ok(Entity::Eof));
}

#[test]
fn iterator_yields_eof_then_ends() {
    let mut reader = EntityReader::from_slice(b"1 2\n|;");
    let collected: Vec<_> = reader.entities().collect();
    assert_eq!(
        collected,
        vec![Ok(num("1")), Ok(num("2")), Ok(Entity::Eof)]
    );
    assert_eq!(reader.entities().next(), Some(Ok(Entity::Eof)));
}

#[test]
fn entity_codes_are_stable() {
    assert_eq!(Entity::Eof.code(), 0);
    assert_eq!(Entity::BeginGroup.code(), 12);
    assert_eq!(Entity::Array { count: 3 }.code(), 14);
    assert!(Entity::Eof.is_eof());
    assert!(!Entity::BeginGroup.is_eof());
}

#[test]
fn round_trip_reconstructs_source_span() {
    let src = b"pic\"pay\\{load}\" |;";
    let parsed = entities(src);
    let Entity::String {
        prefix,
        kind,
        payload,
    } = &parsed[0]
    else {
        panic!("expected a string entity");
    };
    assert_eq!(*kind, QuoteKind::Quoted);
    let mut rebuilt = Vec::new();
    rebuilt.extend_from_slice(prefix);
    rebuilt.push(b'"');
    rebuilt.extend_from_slice(payload);
    rebuilt.push(b'"');
    assert_eq!(rebuilt, &src[..rebuilt.len()]);
}
