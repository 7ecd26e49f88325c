use std::fmt::Write as _;
use std::io::{self, Read, Seek, SeekFrom};

/// Total length of a seekable source. The cursor position is preserved.
pub fn stream_len<R: Seek>(r: &mut R) -> io::Result<u64> {
    let pos = r.stream_position()?;
    let len = r.seek(SeekFrom::End(0))?;
    if pos != len {
        r.seek(SeekFrom::Start(pos))?;
    }
    Ok(len)
}

/// Read `len` bytes at absolute `offset`. Running out of input is
/// `UnexpectedEof`, never a short buffer.
pub fn read_slice<R: Read + Seek>(r: &mut R, offset: u64, len: u64) -> io::Result<Vec<u8>> {
    r.seek(SeekFrom::Start(offset))?;
    let mut buf = Vec::new();
    let got = r.by_ref().take(len).read_to_end(&mut buf)?;
    if (got as u64) < len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("wanted {len} bytes at {offset}, got {got}"),
        ));
    }
    Ok(buf)
}

/// Classic 16-column dump: offset, hex bytes split in two groups of
/// eight, printable bytes (with `©` kept) on the right.
pub fn hex_dump(bytes: &[u8], base: u64) -> String {
    let mut out = String::new();
    for (row, line) in (base..).step_by(16).zip(bytes.chunks(16)) {
        let (left, right) = line.split_at(line.len().min(8));
        let _ = write!(out, "{row:08x}  {:<24} {:<24} |", spaced(left), spaced(right));
        out.extend(line.iter().map(|&b| match b {
            0x20..=0x7e => b as char,
            0xA9 => '©',
            _ => '.',
        }));
        out.push_str("|\n");
    }
    out
}

fn spaced(bytes: &[u8]) -> String {
    bytes.iter().map(|b| hex::encode([*b])).collect::<Vec<_>>().join(" ")
}
