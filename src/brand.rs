//! Major-brand classification.

use crate::boxes::FourCC;
use crate::parser::{ParseError, Result};
use serde::Serialize;

/// Which metadata conventions apply to a file, derived from its major brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetadataStyle {
    Undefined,
    ITunesStyle,
    ThirdGenPartner,
    ThirdGenPartnerVer1Rel6,
    ThirdGenPartnerVer1Rel7,
    ThirdGenPartnerVer2,
    ThirdGenPartnerVer2RelA,
    MotionJpeg2000,
}

/// The brand used by Sony PSP files; classified as iTunes-style.
pub const PSP_BRAND: FourCC = FourCC::new(b"MSNV");

const QUICKTIME_BRAND: FourCC = FourCC::new(b"qt  ");

/// Every brand this crate accepts, with the style it maps to.
pub static SUPPORTED_BRANDS: &[(FourCC, MetadataStyle)] = &[
    // 3GPP2
    (FourCC::new(b"3g2b"), MetadataStyle::ThirdGenPartnerVer2RelA),
    (FourCC::new(b"3g2a"), MetadataStyle::ThirdGenPartnerVer2),
    // 3GPP release 7
    (FourCC::new(b"3gp7"), MetadataStyle::ThirdGenPartnerVer1Rel7),
    (FourCC::new(b"3gs7"), MetadataStyle::ThirdGenPartnerVer1Rel7),
    (FourCC::new(b"3gr7"), MetadataStyle::ThirdGenPartnerVer1Rel7),
    (FourCC::new(b"3ge7"), MetadataStyle::ThirdGenPartnerVer1Rel7),
    (FourCC::new(b"3gg7"), MetadataStyle::ThirdGenPartnerVer1Rel7),
    // 3GPP release 6
    (FourCC::new(b"3gp6"), MetadataStyle::ThirdGenPartnerVer1Rel6),
    (FourCC::new(b"3gr6"), MetadataStyle::ThirdGenPartnerVer1Rel6),
    (FourCC::new(b"3gs6"), MetadataStyle::ThirdGenPartnerVer1Rel6),
    (FourCC::new(b"3ge6"), MetadataStyle::ThirdGenPartnerVer1Rel6),
    (FourCC::new(b"3gg6"), MetadataStyle::ThirdGenPartnerVer1Rel6),
    // 3GPP release 4/5
    (FourCC::new(b"3gp4"), MetadataStyle::ThirdGenPartner),
    (FourCC::new(b"3gp5"), MetadataStyle::ThirdGenPartner),
    // carrier brands with 3GPP/3GPP2 compatibility
    (FourCC::new(b"kddi"), MetadataStyle::ThirdGenPartnerVer2),
    (FourCC::new(b"mmp4"), MetadataStyle::ThirdGenPartner),
    // iTunes-style
    (PSP_BRAND, MetadataStyle::ITunesStyle),
    (FourCC::new(b"M4A "), MetadataStyle::ITunesStyle),
    (FourCC::new(b"M4B "), MetadataStyle::ITunesStyle),
    (FourCC::new(b"M4P "), MetadataStyle::ITunesStyle),
    (FourCC::new(b"M4V "), MetadataStyle::ITunesStyle),
    (FourCC::new(b"M4VH"), MetadataStyle::ITunesStyle),
    (FourCC::new(b"M4VP"), MetadataStyle::ITunesStyle),
    (FourCC::new(b"mp42"), MetadataStyle::ITunesStyle),
    (FourCC::new(b"mp41"), MetadataStyle::ITunesStyle),
    (FourCC::new(b"isom"), MetadataStyle::ITunesStyle),
    (FourCC::new(b"iso2"), MetadataStyle::ITunesStyle),
    (FourCC::new(b"avc1"), MetadataStyle::ITunesStyle),
    // MotionJPEG2000
    (FourCC::new(b"mjp2"), MetadataStyle::MotionJpeg2000),
    (FourCC::new(b"mj2s"), MetadataStyle::MotionJpeg2000),
];

/// Map a major brand to its metadata style.
///
/// `qt  ` is a registered brand but is rejected: QuickTime files carry
/// structures (such as the trailing null bytes after `udta`) that the atom
/// model does not represent.
pub fn classify(brand: FourCC) -> Result<MetadataStyle> {
    if brand == QUICKTIME_BRAND {
        return Err(ParseError::UnsupportedBrand(
            "Quicktime movie files are not supported".to_string(),
        ));
    }
    SUPPORTED_BRANDS
        .iter()
        .find(|(b, _)| *b == brand)
        .map(|(_, style)| *style)
        .ok_or_else(|| ParseError::UnsupportedBrand(brand.to_string()))
}

pub fn is_psp_brand(brand: FourCC) -> bool {
    brand == PSP_BRAND
}
