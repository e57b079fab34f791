//! Bates stamp text and placement.
//!
//! The stamp is drawn with the standard Type 1 Helvetica font, so no font
//! program is embedded; text is measured with Helvetica's published advance
//! widths. Layout is fixed: 12pt red text, right-aligned 20pt from the right
//! edge with its baseline 20pt above the bottom edge, on an opaque white
//! rectangle padded by 4pt.

use lopdf::content::Operation;
use lopdf::{Dictionary, Object, dictionary};

use super::canvas::Canvas;

/// Stamp font size in points.
pub const FONT_SIZE: f32 = 12.0;

/// Distance of the text from the right and bottom edges.
pub const MARGIN: f32 = 20.0;

/// Padding of the white backing rectangle around the text box.
pub const PADDING: f32 = 4.0;

/// Minimum number of digits in the counter.
pub const COUNTER_WIDTH: usize = 6;

/// Resource name of the stamp font on composited pages.
pub const FONT_RESOURCE: &str = "BatesF1";

const HELVETICA_ASCENT: f32 = 718.0;
const HELVETICA_DESCENT: f32 = -207.0;
const HELVETICA_DEFAULT_WIDTH: u16 = 556;

// Helvetica advance widths for WinAnsi codes 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, //
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, //
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, //
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Build the stamp text for `number`.
///
/// The counter is zero-padded to six digits; larger numbers are printed in
/// full.
///
/// ```
/// use batesmerge::compose::stamp::format_stamp;
///
/// assert_eq!(format_stamp("EX-", 5), "EX-000005");
/// assert_eq!(format_stamp("", 1234567), "1234567");
/// ```
pub fn format_stamp(prefix: &str, number: u64) -> String {
    format!("{prefix}{number:0width$}", width = COUNTER_WIDTH)
}

/// Axis-aligned rectangle in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Lower-left x.
    pub x: f32,
    /// Lower-left y.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// Where the stamp lands on a given canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct StampLayout {
    /// Start of the text baseline.
    pub text_x: f32,
    /// Baseline height.
    pub baseline_y: f32,
    /// Advance width of the text at [`FONT_SIZE`].
    pub text_width: f32,
    /// White rectangle painted behind the text.
    pub backing: Rect,
    /// Text as encoded for the font.
    pub encoded: Vec<u8>,
}

impl StampLayout {
    /// Lay out `text` in the bottom-right corner of `canvas`.
    pub fn new(text: &str, canvas: &Canvas) -> Self {
        let encoded = encode_win_ansi(text);
        let text_width = encoded_width(&encoded, FONT_SIZE);
        let text_x = canvas.right() - MARGIN - text_width;
        let baseline_y = canvas.y + MARGIN;

        let ascent = HELVETICA_ASCENT * FONT_SIZE / 1000.0;
        let descent = HELVETICA_DESCENT * FONT_SIZE / 1000.0;
        let backing = Rect {
            x: text_x - PADDING,
            y: baseline_y + descent - PADDING,
            width: text_width + 2.0 * PADDING,
            height: (ascent - descent) + 2.0 * PADDING,
        };

        Self {
            text_x,
            baseline_y,
            text_width,
            backing,
            encoded,
        }
    }

    /// Content stream operations drawing the stamp.
    ///
    /// The sequence is wrapped in `q`/`Q` so it leaves the graphics state as
    /// it found it.
    pub fn operations(&self) -> Vec<Operation> {
        let r = self.backing;
        vec![
            Operation::new("q", vec![]),
            Operation::new("rg", vec![1.into(), 1.into(), 1.into()]),
            Operation::new(
                "re",
                vec![r.x.into(), r.y.into(), r.width.into(), r.height.into()],
            ),
            Operation::new("f", vec![]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![FONT_RESOURCE.into(), FONT_SIZE.into()]),
            Operation::new("rg", vec![1.into(), 0.into(), 0.into()]),
            Operation::new("Td", vec![self.text_x.into(), self.baseline_y.into()]),
            Operation::new("Tj", vec![Object::string_literal(self.encoded.clone())]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ]
    }
}

/// Font resource for the stamp: the standard Helvetica, WinAnsi encoded.
pub fn font_dictionary() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    }
}

fn encoded_width(encoded: &[u8], font_size: f32) -> f32 {
    let units: u32 = encoded.iter().map(|&b| glyph_width(b) as u32).sum();
    units as f32 * font_size / 1000.0
}

fn glyph_width(code: u8) -> u16 {
    match code {
        32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
        _ => HELVETICA_DEFAULT_WIDTH,
    }
}

/// Map text to single-byte codes.
///
/// Latin-1 printable characters keep their code point; anything else becomes
/// `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}
