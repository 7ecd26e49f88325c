use crate::registry::{AtomBehavior, ContainerState};

/// Where a known atom may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    File,
    In([u8; 4]),
    Any,
}

/// One row of the built-in atom table.
#[derive(Debug)]
pub struct KnownAtom {
    pub code: [u8; 4],
    pub parents: &'static [Parent],
    pub behavior: AtomBehavior,
    pub name: &'static str,
}

use ContainerState::{Child, DualState, Parent as Branch};
use Parent::{Any, File, In};

const CONTAINER: AtomBehavior = AtomBehavior::new(Branch, false, false);
const FULL_CONTAINER: AtomBehavior = AtomBehavior::new(Branch, true, false);
const LEAF: AtomBehavior = AtomBehavior::new(Child, false, false);
const FULL_LEAF: AtomBehavior = AtomBehavior::new(Child, true, false);
const LANG_LEAF: AtomBehavior = AtomBehavior::new(Child, true, true);

// version/flags + entry_count
const ENTRY_LIST: AtomBehavior = AtomBehavior::new(DualState { prefix: 4 }, true, false);
// reserved(6) + data_reference_index(2) + VisualSampleEntry fields(70)
const VISUAL_ENTRY: AtomBehavior = AtomBehavior::new(DualState { prefix: 78 }, false, false);
// reserved(6) + data_reference_index(2) + AudioSampleEntry fields(20)
const AUDIO_ENTRY: AtomBehavior = AtomBehavior::new(DualState { prefix: 28 }, false, false);
// reserved(6) + data_reference_index(2)
const PLAIN_ENTRY: AtomBehavior = AtomBehavior::new(DualState { prefix: 8 }, false, false);

const fn atom(
    code: &[u8; 4],
    parents: &'static [Parent],
    behavior: AtomBehavior,
    name: &'static str,
) -> KnownAtom {
    KnownAtom { code: *code, parents, behavior, name }
}

const MOOV: &[Parent] = &[In(*b"moov")];
const TRAK: &[Parent] = &[In(*b"trak")];
const MDIA: &[Parent] = &[In(*b"mdia")];
const MINF: &[Parent] = &[In(*b"minf")];
const STBL: &[Parent] = &[In(*b"stbl")];
const STSD: &[Parent] = &[In(*b"stsd")];
const TRAF: &[Parent] = &[In(*b"traf")];
const UDTA: &[Parent] = &[In(*b"udta")];
const META: &[Parent] = &[In(*b"meta")];
const ILST: &[Parent] = &[In(*b"ilst")];
const FREEFORM: &[Parent] = &[In(*b"----")];
const JP2H: &[Parent] = &[In(*b"jp2h")];
const JP2H_HOLDERS: &[Parent] = &[File, In(*b"mjp2")];
const COLR_HOLDERS: &[Parent] = &[
    In(*b"jp2h"),
    In(*b"avc1"),
    In(*b"hvc1"),
    In(*b"hev1"),
    In(*b"mjp2"),
];
const MOOV_TRAK: &[Parent] = &[In(*b"moov"), In(*b"trak")];
const META_HOLDERS: &[Parent] = &[File, In(*b"moov"), In(*b"trak"), In(*b"udta")];
const MVEX: &[Parent] = &[In(*b"mvex")];
const MOOF: &[Parent] = &[In(*b"moof")];
const MFRA: &[Parent] = &[In(*b"mfra")];
const EDTS: &[Parent] = &[In(*b"edts")];
const TREF: &[Parent] = &[In(*b"tref")];
const MDIA_META: &[Parent] = &[In(*b"mdia"), In(*b"meta")];
const MINF_META: &[Parent] = &[In(*b"minf"), In(*b"meta")];
const DINF: &[Parent] = &[In(*b"dinf")];
const DREF: &[Parent] = &[In(*b"dref")];
const ALAC: &[Parent] = &[In(*b"alac")];
const STBL_TRAF: &[Parent] = &[In(*b"stbl"), In(*b"traf")];
const VISUAL: &[Parent] = &[
    In(*b"avc1"),
    In(*b"avc3"),
    In(*b"hvc1"),
    In(*b"hev1"),
    In(*b"mp4v"),
    In(*b"s263"),
    In(*b"mjp2"),
    In(*b"jpeg"),
];
const AUDIO: &[Parent] = &[
    In(*b"mp4a"),
    In(*b"samr"),
    In(*b"sawb"),
    In(*b"alac"),
    In(*b"ac-3"),
    In(*b"ec-3"),
];
const ESDS_HOLDERS: &[Parent] = &[In(*b"mp4a"), In(*b"mp4v"), In(*b"mp4s")];

const fn cr(tail: &[u8; 3]) -> [u8; 4] {
    [0xA9, tail[0], tail[1], tail[2]]
}

/// Built-in atom table for ISO base media, 3GPP/3GPP2, iTunes-style
/// metadata and MotionJPEG2000 files.
pub static KNOWN_ATOMS: &[KnownAtom] = &[
    // file level
    atom(b"ftyp", &[File], LEAF, "File Type Box"),
    atom(b"jP  ", &[File], LEAF, "JPEG 2000 Signature Box"),
    atom(b"moov", &[File], CONTAINER, "Movie Box"),
    atom(b"mdat", &[File], LEAF, "Media Data Box"),
    atom(b"pdin", &[File], FULL_LEAF, "Progressive Download Info Box"),
    atom(b"moof", &[File], CONTAINER, "Movie Fragment Box"),
    atom(b"mfra", &[File], CONTAINER, "Movie Fragment Random Access Box"),
    atom(b"styp", &[File], LEAF, "Segment Type Box"),
    atom(b"sidx", &[File], FULL_LEAF, "Segment Index Box"),
    atom(b"free", &[Any], LEAF, "Free Space Box"),
    atom(b"skip", &[Any], LEAF, "Free Space Box"),
    atom(b"wide", &[Any], LEAF, "Wide Box"),
    atom(b"uuid", &[Any], LEAF, "User Extension Box"),
    atom(b"jp2h", JP2H_HOLDERS, CONTAINER, "JP2 Header Box"),
    atom(b"ihdr", JP2H, LEAF, "Image Header Box"),
    atom(b"colr", COLR_HOLDERS, LEAF, "Colour Information Box"),
    // movie
    atom(b"mvhd", MOOV, FULL_LEAF, "Movie Header Box"),
    atom(b"iods", MOOV, FULL_LEAF, "Object Descriptor Box"),
    atom(b"trak", MOOV, CONTAINER, "Track Box"),
    atom(b"udta", MOOV_TRAK, CONTAINER, "User Data Box"),
    atom(b"mvex", MOOV, CONTAINER, "Movie Extends Box"),
    atom(b"mehd", MVEX, FULL_LEAF, "Movie Extends Header Box"),
    atom(b"trex", MVEX, FULL_LEAF, "Track Extends Box"),
    atom(b"meta", META_HOLDERS, FULL_CONTAINER, "Meta Box"),
    // fragments
    atom(b"mfhd", MOOF, FULL_LEAF, "Movie Fragment Header Box"),
    atom(b"traf", MOOF, CONTAINER, "Track Fragment Box"),
    atom(b"tfhd", TRAF, FULL_LEAF, "Track Fragment Header Box"),
    atom(b"trun", TRAF, FULL_LEAF, "Track Run Box"),
    atom(b"tfdt", TRAF, FULL_LEAF, "Track Fragment Decode Time Box"),
    atom(b"tfra", MFRA, FULL_LEAF, "Track Fragment Random Access Box"),
    atom(b"mfro", MFRA, FULL_LEAF, "Movie Fragment Random Access Offset Box"),
    // track
    atom(b"tkhd", TRAK, FULL_LEAF, "Track Header Box"),
    atom(b"tref", TRAK, CONTAINER, "Track Reference Box"),
    atom(b"edts", TRAK, CONTAINER, "Edit Box"),
    atom(b"elst", EDTS, FULL_LEAF, "Edit List Box"),
    atom(b"mdia", TRAK, CONTAINER, "Media Box"),
    atom(b"hint", TREF, LEAF, "Hint Track Reference"),
    atom(b"dpnd", TREF, LEAF, "Dependency Track Reference"),
    atom(b"chap", TREF, LEAF, "Chapter Track Reference"),
    atom(b"sync", TREF, LEAF, "Sync Track Reference"),
    // media
    atom(b"mdhd", MDIA, FULL_LEAF, "Media Header Box"),
    atom(b"hdlr", MDIA_META, FULL_LEAF, "Handler Reference Box"),
    atom(b"minf", MDIA, CONTAINER, "Media Information Box"),
    atom(b"vmhd", MINF, FULL_LEAF, "Video Media Header Box"),
    atom(b"smhd", MINF, FULL_LEAF, "Sound Media Header Box"),
    atom(b"hmhd", MINF, FULL_LEAF, "Hint Media Header Box"),
    atom(b"nmhd", MINF, FULL_LEAF, "Null Media Header Box"),
    atom(b"dinf", MINF_META, CONTAINER, "Data Information Box"),
    atom(b"dref", DINF, ENTRY_LIST, "Data Reference Box"),
    atom(b"url ", DREF, FULL_LEAF, "Data Entry URL Box"),
    atom(b"urn ", DREF, FULL_LEAF, "Data Entry URN Box"),
    atom(b"stbl", MINF, CONTAINER, "Sample Table Box"),
    // sample table
    atom(b"stsd", STBL, ENTRY_LIST, "Sample Description Box"),
    atom(b"stts", STBL, FULL_LEAF, "Decoding Time to Sample Box"),
    atom(b"ctts", STBL, FULL_LEAF, "Composition Time to Sample Box"),
    atom(b"stsc", STBL, FULL_LEAF, "Sample To Chunk Box"),
    atom(b"stsz", STBL, FULL_LEAF, "Sample Size Box"),
    atom(b"stz2", STBL, FULL_LEAF, "Compact Sample Size Box"),
    atom(b"stco", STBL, FULL_LEAF, "Chunk Offset Box"),
    atom(b"co64", STBL, FULL_LEAF, "64-bit Chunk Offset Box"),
    atom(b"stss", STBL, FULL_LEAF, "Sync Sample Box"),
    atom(b"stsh", STBL, FULL_LEAF, "Shadow Sync Sample Box"),
    atom(b"stdp", STBL, FULL_LEAF, "Degradation Priority Box"),
    atom(b"padb", STBL, FULL_LEAF, "Padding Bits Box"),
    atom(b"sdtp", STBL_TRAF, FULL_LEAF, "Independent and Disposable Samples Box"),
    atom(b"sbgp", STBL_TRAF, FULL_LEAF, "Sample To Group Box"),
    atom(b"sgpd", STBL_TRAF, FULL_LEAF, "Sample Group Description Box"),
    atom(b"subs", STBL_TRAF, FULL_LEAF, "Sub-Sample Information Box"),
    // sample entries
    atom(b"avc1", STSD, VISUAL_ENTRY, "AVC Sample Entry"),
    atom(b"avc3", STSD, VISUAL_ENTRY, "AVC Sample Entry"),
    atom(b"hvc1", STSD, VISUAL_ENTRY, "HEVC Sample Entry"),
    atom(b"hev1", STSD, VISUAL_ENTRY, "HEVC Sample Entry"),
    atom(b"mp4v", STSD, VISUAL_ENTRY, "MPEG-4 Visual Sample Entry"),
    atom(b"s263", STSD, VISUAL_ENTRY, "H.263 Sample Entry"),
    atom(b"mjp2", STSD, VISUAL_ENTRY, "Motion JPEG 2000 Sample Entry"),
    atom(b"jpeg", STSD, VISUAL_ENTRY, "JPEG Sample Entry"),
    atom(b"mp4a", STSD, AUDIO_ENTRY, "MPEG-4 Audio Sample Entry"),
    atom(b"samr", STSD, AUDIO_ENTRY, "AMR Sample Entry"),
    atom(b"sawb", STSD, AUDIO_ENTRY, "AMR-WB Sample Entry"),
    atom(b"alac", STSD, AUDIO_ENTRY, "Apple Lossless Sample Entry"),
    atom(b"ac-3", STSD, AUDIO_ENTRY, "AC-3 Sample Entry"),
    atom(b"ec-3", STSD, AUDIO_ENTRY, "Enhanced AC-3 Sample Entry"),
    atom(b"mp4s", STSD, PLAIN_ENTRY, "MPEG-4 Systems Sample Entry"),
    // sample entry configuration
    atom(b"avcC", VISUAL, LEAF, "AVC Configuration Box"),
    atom(b"hvcC", VISUAL, LEAF, "HEVC Configuration Box"),
    atom(b"btrt", &[Any], LEAF, "Bit Rate Box"),
    atom(b"pasp", VISUAL, LEAF, "Pixel Aspect Ratio Box"),
    atom(b"fiel", VISUAL, LEAF, "Field Coding Box"),
    atom(b"d263", VISUAL, LEAF, "H.263 Decoder Configuration Box"),
    atom(b"esds", ESDS_HOLDERS, FULL_LEAF, "Elementary Stream Descriptor Box"),
    atom(b"damr", AUDIO, LEAF, "AMR Decoder Configuration Box"),
    atom(b"alac", ALAC, FULL_LEAF, "Apple Lossless Configuration Box"),
    atom(b"dac3", AUDIO, LEAF, "AC-3 Specific Box"),
    atom(b"dec3", AUDIO, LEAF, "Enhanced AC-3 Specific Box"),
    // user data, 3GPP assets
    atom(b"cprt", UDTA, LANG_LEAF, "Copyright Box"),
    atom(b"titl", UDTA, LANG_LEAF, "Title Box"),
    atom(b"dscp", UDTA, LANG_LEAF, "Description Box"),
    atom(b"perf", UDTA, LANG_LEAF, "Performer Box"),
    atom(b"auth", UDTA, LANG_LEAF, "Author Box"),
    atom(b"gnre", UDTA, LANG_LEAF, "Genre Box"),
    atom(b"albm", UDTA, LANG_LEAF, "Album Box"),
    atom(b"clsf", UDTA, LANG_LEAF, "Classification Box"),
    atom(b"kywd", UDTA, LANG_LEAF, "Keywords Box"),
    atom(b"loci", UDTA, LANG_LEAF, "Location Information Box"),
    atom(b"yrrc", UDTA, FULL_LEAF, "Recording Year Box"),
    atom(b"rtng", UDTA, FULL_LEAF, "Rating Box"),
    atom(b"name", UDTA, LEAF, "Name Box"),
    atom(b"chpl", UDTA, FULL_LEAF, "Chapter List Box"),
    atom(b"hnti", UDTA, CONTAINER, "Hint Information Box"),
    // meta
    atom(b"ilst", META, CONTAINER, "Metadata Item List Box"),
    atom(b"keys", META, FULL_LEAF, "Metadata Keys Box"),
    atom(b"ID32", META, LANG_LEAF, "ID3v2 Box"),
    atom(b"xml ", META, FULL_LEAF, "XML Box"),
    atom(b"bxml", META, FULL_LEAF, "Binary XML Box"),
    atom(b"pitm", META, FULL_LEAF, "Primary Item Box"),
    atom(b"iloc", META, FULL_LEAF, "Item Location Box"),
    atom(b"iinf", META, FULL_LEAF, "Item Information Box"),
    atom(b"ipro", META, FULL_CONTAINER, "Item Protection Box"),
    // iTunes-style items
    atom(&cr(b"nam"), ILST, CONTAINER, "Title Item"),
    atom(&cr(b"ART"), ILST, CONTAINER, "Artist Item"),
    atom(&cr(b"alb"), ILST, CONTAINER, "Album Item"),
    atom(&cr(b"gen"), ILST, CONTAINER, "Custom Genre Item"),
    atom(&cr(b"day"), ILST, CONTAINER, "Release Date Item"),
    atom(&cr(b"wrt"), ILST, CONTAINER, "Composer Item"),
    atom(&cr(b"cmt"), ILST, CONTAINER, "Comment Item"),
    atom(&cr(b"too"), ILST, CONTAINER, "Encoding Tool Item"),
    atom(&cr(b"grp"), ILST, CONTAINER, "Grouping Item"),
    atom(&cr(b"lyr"), ILST, CONTAINER, "Lyrics Item"),
    atom(b"aART", ILST, CONTAINER, "Album Artist Item"),
    atom(b"gnre", ILST, CONTAINER, "Genre Item"),
    atom(b"trkn", ILST, CONTAINER, "Track Number Item"),
    atom(b"disk", ILST, CONTAINER, "Disc Number Item"),
    atom(b"cpil", ILST, CONTAINER, "Compilation Item"),
    atom(b"tmpo", ILST, CONTAINER, "Tempo Item"),
    atom(b"covr", ILST, CONTAINER, "Cover Art Item"),
    atom(b"cprt", ILST, CONTAINER, "Copyright Item"),
    atom(b"rtng", ILST, CONTAINER, "Advisory Rating Item"),
    atom(b"stik", ILST, CONTAINER, "Media Kind Item"),
    atom(b"desc", ILST, CONTAINER, "Description Item"),
    atom(b"ldes", ILST, CONTAINER, "Long Description Item"),
    atom(b"tvsh", ILST, CONTAINER, "TV Show Item"),
    atom(b"tven", ILST, CONTAINER, "TV Episode ID Item"),
    atom(b"tvsn", ILST, CONTAINER, "TV Season Item"),
    atom(b"tves", ILST, CONTAINER, "TV Episode Item"),
    atom(b"tvnn", ILST, CONTAINER, "TV Network Item"),
    atom(b"purd", ILST, CONTAINER, "Purchase Date Item"),
    atom(b"pgap", ILST, CONTAINER, "Gapless Playback Item"),
    atom(b"pcst", ILST, CONTAINER, "Podcast Item"),
    atom(b"catg", ILST, CONTAINER, "Category Item"),
    atom(b"keyw", ILST, CONTAINER, "Keyword Item"),
    atom(b"purl", ILST, CONTAINER, "Podcast URL Item"),
    atom(b"egid", ILST, CONTAINER, "Episode GUID Item"),
    atom(b"sonm", ILST, CONTAINER, "Sort Name Item"),
    atom(b"soar", ILST, CONTAINER, "Sort Artist Item"),
    atom(b"soal", ILST, CONTAINER, "Sort Album Item"),
    atom(b"soaa", ILST, CONTAINER, "Sort Album Artist Item"),
    atom(b"soco", ILST, CONTAINER, "Sort Composer Item"),
    atom(b"sosn", ILST, CONTAINER, "Sort Show Item"),
    atom(b"----", ILST, CONTAINER, "Reverse DNS Item"),
    atom(b"mean", FREEFORM, FULL_LEAF, "Reverse DNS Domain"),
    atom(b"name", FREEFORM, FULL_LEAF, "Reverse DNS Name"),
    atom(b"data", &[Any], FULL_LEAF, "Item Data"),
];
