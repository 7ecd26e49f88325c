use mp4atoms::util::{hex_dump, read_slice, stream_len};
use std::io::{Cursor, ErrorKind, Seek, SeekFrom};

#[test]
fn stream_len_keeps_position() {
    let mut cur = Cursor::new(vec![0u8; 40]);
    cur.seek(SeekFrom::Start(7)).unwrap();
    assert_eq!(stream_len(&mut cur).unwrap(), 40);
    assert_eq!(cur.stream_position().unwrap(), 7);
}

#[test]
fn read_slice_reads_exact_range() {
    let mut cur = Cursor::new((0u8..32).collect::<Vec<_>>());
    assert_eq!(read_slice(&mut cur, 4, 3).unwrap(), vec![4, 5, 6]);
    assert!(read_slice(&mut cur, 32, 0).unwrap().is_empty());
}

#[test]
fn read_slice_past_end_is_eof() {
    let mut cur = Cursor::new(vec![1u8; 10]);
    let err = read_slice(&mut cur, 6, 8).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn hex_dump_rows() {
    let mut bytes = b"moov".to_vec();
    bytes.extend_from_slice(&[0xA9, b'n', b'a', b'm', 0, 1, 2, 3, 4, 5, 6, 7, 0xff]);
    let dump = hex_dump(&bytes, 0x100);
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("00000100  6d 6f 6f 76 a9 6e 61 6d  00 01 02 03"));
    assert!(lines[0].ends_with("|moov©nam........|"));
    assert!(lines[1].starts_with("00000110  ff "));
    assert!(lines[1].ends_with("|.|"));
    assert!(hex_dump(&[], 0).is_empty());
}
