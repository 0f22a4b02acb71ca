use alloc::vec::Vec;

use rstest::rstest;

use crate::{Entity, EntityReader, Error, ErrorKind, ReaderOptions};

/// Drives the reader to its first error, asserting stickiness along
/// the way: the identical error must come back on further reads.
fn expect_error(src: &[u8]) -> Error {
    expect_error_with(src, ReaderOptions::default())
}

fn expect_error_with(src: &[u8], options: ReaderOptions) -> Error {
    let mut reader = EntityReader::with_options(crate::SliceSource::new(src), options);
    let mut seen = Vec::new();
    let err = loop {
        match reader.read() {
            Ok(Entity::Eof) => panic!("parsed to EOF, entities: {seen:?}"),
            Ok(entity) => seen.push(entity),
            Err(err) => break err,
        }
    };
    assert_eq!(reader.read(), Err(err.clone()), "errors must be sticky");
    assert_eq!(reader.read(), Err(err.clone()), "errors must stay sticky");
    err
}

#[rstest]
#[case(b")|;", ErrorKind::UnmatchedRightParen)]
#[case(b"]|;", ErrorKind::UnmatchedRightBracket)]
#[case(b",|;", ErrorKind::CommaOutsideArray)]
#[case(b"[1] ]|;", ErrorKind::UnmatchedRightBracket)]
#[case(b"[(1,2)]|;", ErrorKind::OpenGroupAtArrayBoundary)]
#[case(b"[(1]|;", ErrorKind::OpenGroupAtArrayBoundary)]
#[case(b"[1)]|;", ErrorKind::UnmatchedRightParen)]
#[case(b"%% |;", ErrorKind::MetacommandNesting)]
#[case(b"; |;", ErrorKind::SemicolonOutsideMetacommand)]
#[case(b"%img` |;", ErrorKind::EmbedInsideMetacommand)]
fn structural_defects(#[case] src: &[u8], #[case] expected: ErrorKind) {
    assert_eq!(expect_error(src).kind(), expected);
}

#[rstest]
#[case(b"%doc |;", ErrorKind::UnclosedMetacommandAtEof)]
#[case(b"[1 |;", ErrorKind::UnclosedArrayAtEof)]
#[case(b"[ |;", ErrorKind::UnclosedArrayAtEof)]
#[case(b"(|;", ErrorKind::UnclosedGroupAtEof)]
#[case(b"[(1 |;", ErrorKind::UnclosedGroupAtEof)]
fn open_state_at_final_token(#[case] src: &[u8], #[case] expected: ErrorKind) {
    assert_eq!(expect_error(src).kind(), expected);
}

#[rstest]
#[case(b"", ErrorKind::UnexpectedEof)]
#[case(b"abc", ErrorKind::UnexpectedEof)]
#[case(b"# only a comment\n", ErrorKind::UnexpectedEof)]
#[case(b"|; extra", ErrorKind::TrailerAfterFinalToken)]
#[case(b"ab\x01 |;", ErrorKind::IllegalCharacter)]
#[case(b"\x80 |;", ErrorKind::IllegalCharacter)]
#[case(b"\xEF\xBB |;", ErrorKind::BadByteOrderMark)]
#[case(b"\"no closer", ErrorKind::UnterminatedString)]
#[case(b"{no closer", ErrorKind::UnterminatedString)]
#[case(b"\"a\x00b\" |;", ErrorKind::NulByteInString)]
fn lexical_defects(#[case] src: &[u8], #[case] expected: ErrorKind) {
    assert_eq!(expect_error(src).kind(), expected);
}

#[test]
fn errors_carry_the_defect_line() {
    let err = expect_error(b"ok\n)\n|;");
    assert_eq!(err.kind(), ErrorKind::UnmatchedRightParen);
    assert_eq!(err.line(), 2);

    let err = expect_error(b"(\n|;");
    assert_eq!(err.kind(), ErrorKind::UnclosedGroupAtEof);
    assert_eq!(err.line(), 2);
}

#[test]
fn entities_before_the_defect_still_surface() {
    let mut reader = EntityReader::from_slice(b"(\n|;");
    assert_eq!(reader.read(), Ok(Entity::BeginGroup));
    let err = reader.read().expect_err("unclosed group");
    assert_eq!(err.kind(), ErrorKind::UnclosedGroupAtEof);
}

#[test]
fn token_length_ceiling() {
    let options = ReaderOptions {
        max_token_length: 8,
        ..ReaderOptions::default()
    };
    let err = expect_error_with(b"averylongword |;", options);
    assert_eq!(err.kind(), ErrorKind::TokenTooLong);
}

#[test]
fn string_length_ceiling() {
    let options = ReaderOptions {
        max_string_length: 4,
        ..ReaderOptions::default()
    };
    let err = expect_error_with(b"\"abcdef\" |;", options);
    assert_eq!(err.kind(), ErrorKind::StringTooLong);
}

#[test]
fn array_depth_ceiling() {
    let options = ReaderOptions {
        max_array_depth: 1,
        ..ReaderOptions::default()
    };
    let err = expect_error_with(b"[[1 |;", options);
    assert_eq!(err.kind(), ErrorKind::ArrayNestingTooDeep);
}

#[test]
fn array_element_ceiling() {
    let options = ReaderOptions {
        max_array_elements: 2,
        ..ReaderOptions::default()
    };
    let err = expect_error_with(b"[1,2,3]|;", options);
    assert_eq!(err.kind(), ErrorKind::ArrayTooManyElements);
}

#[test]
fn group_depth_ceiling() {
    let options = ReaderOptions {
        max_group_depth: 2,
        ..ReaderOptions::default()
    };
    let err = expect_error_with(b"((( |;", options);
    assert_eq!(err.kind(), ErrorKind::GroupNestingTooDeep);
}

#[test]
fn curly_depth_ceiling() {
    let options = ReaderOptions {
        max_curly_depth: 2,
        ..ReaderOptions::default()
    };
    let err = expect_error_with(b"{a {b {c}}} |;", options);
    assert_eq!(err.kind(), ErrorKind::CurlyNestingTooDeep);
}

#[test]
fn io_failure_is_surfaced_and_sticky() {
    struct Flaky {
        reads: u32,
    }
    impl crate::ByteSource for Flaky {
        fn read_byte(&mut self) -> Result<Option<u8>, crate::SourceError> {
            self.reads += 1;
            if self.reads <= 2 {
                Ok(Some(b'a'))
            } else {
                Err(crate::SourceError)
            }
        }
        fn bytes_consumed(&self) -> u64 {
            u64::from(self.reads.min(2))
        }
    }

    let mut reader = EntityReader::new(Flaky { reads: 0 });
    let err = reader.read().expect_err("source failure");
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(reader.read(), Err(err));
}
