//! Image XObject creation for JPEG labels
//!
//! JPEG data is stored as-is behind a `DCTDecode` filter; only the header
//! is decoded to learn the pixel size and color model.

use crate::types::Result;
use image::ImageDecoder;
use image::codecs::jpeg::JpegDecoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Cursor;

/// Color model of the compressed JPEG data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColor {
    Gray,
    Rgb,
    /// `inverted` is set for Adobe-written CMYK, which stores inverted samples
    Cmyk { inverted: bool },
}

/// Header facts needed to embed a JPEG
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegInfo {
    pub width: u32,
    pub height: u32,
    pub color: JpegColor,
}

/// Component count and Adobe marker, read straight from the frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameHeader {
    components: u8,
    adobe: bool,
}

/// Read the JPEG header without decoding pixel data
pub fn read_jpeg_info(bytes: &[u8]) -> Result<JpegInfo> {
    let decoder = JpegDecoder::new(Cursor::new(bytes))?;
    let (width, height) = decoder.dimensions();

    // The decoder reports the color type it converts to, not the one stored
    // in the file, so the passthrough color space comes from the frame header.
    let color = match read_frame_header(bytes) {
        Some(FrameHeader { components: 1, .. }) => JpegColor::Gray,
        Some(FrameHeader {
            components: 4,
            adobe,
        }) => JpegColor::Cmyk { inverted: adobe },
        Some(_) => JpegColor::Rgb,
        None if decoder.color_type().channel_count() == 1 => JpegColor::Gray,
        None => JpegColor::Rgb,
    };

    Ok(JpegInfo {
        width,
        height,
        color,
    })
}

/// Walk the marker segments up to the first start-of-frame
fn read_frame_header(bytes: &[u8]) -> Option<FrameHeader> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }

    let mut adobe = false;
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        match marker {
            // Fill byte
            0xFF => {
                pos += 1;
                continue;
            }
            // Standalone markers carry no length
            0x01 | 0xD0..=0xD8 => {
                pos += 2;
                continue;
            }
            _ => {}
        }

        let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        let segment = bytes.get(pos + 4..pos + 2 + length)?;

        match marker {
            0xEE if segment.starts_with(b"Adobe") => adobe = true,
            // SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC)
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                return segment.get(5).map(|&components| FrameHeader { components, adobe });
            }
            // Start of scan or end of image before any frame
            0xDA | 0xD9 => return None,
            _ => {}
        }

        pos += 2 + length;
    }
    None
}

/// Image XObject dictionary for a JPEG passed through unchanged
fn image_dictionary(info: &JpegInfo) -> Dictionary {
    let color_space: &[u8] = match info.color {
        JpegColor::Gray => b"DeviceGray",
        JpegColor::Rgb => b"DeviceRGB",
        JpegColor::Cmyk { .. } => b"DeviceCMYK",
    };

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(info.width as i64));
    dict.set("Height", Object::Integer(info.height as i64));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));

    if let JpegColor::Cmyk { inverted: true } = info.color {
        let decode = [1, 0, 1, 0, 1, 0, 1, 0].map(Object::Integer).to_vec();
        dict.set("Decode", Object::Array(decode));
    }
    dict
}

/// Add a JPEG as an Image XObject.
///
/// Returns the object id and the header info. The image occupies the unit
/// square, so callers scale it to its final size with `cm`.
pub fn create_jpeg_xobject(output: &mut Document, bytes: &[u8]) -> Result<(ObjectId, JpegInfo)> {
    let info = read_jpeg_info(bytes)?;
    let stream = Stream::new(image_dictionary(&info), bytes.to_vec()).with_compression(false);
    Ok((output.add_object(stream), info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    fn encode_jpeg(width: u32, height: u32, color: ExtendedColorType) -> Vec<u8> {
        let channels = match color {
            ExtendedColorType::L8 => 1,
            _ => 3,
        };
        let pixels = vec![128u8; (width * height * channels) as usize];
        let mut out = Vec::new();
        JpegEncoder::new(&mut out)
            .write_image(&pixels, width, height, color)
            .unwrap();
        out
    }

    /// SOI, optional Adobe APP14, then a 4-component baseline frame header
    fn cmyk_header(adobe: bool) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8];
        if adobe {
            bytes.extend_from_slice(&[0xFF, 0xEE, 0x00, 0x0E]);
            bytes.extend_from_slice(b"Adobe");
            bytes.extend_from_slice(&[0x00, 0x64, 0x00, 0x00, 0x00, 0x00, 0x02]);
        }
        bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x14, 0x08, 0x00, 0x10, 0x00, 0x20, 0x04]);
        for id in 1..=4u8 {
            bytes.extend_from_slice(&[id, 0x11, 0x00]);
        }
        bytes.extend_from_slice(&[0xFF, 0xDA]);
        bytes
    }

    #[test]
    fn test_read_rgb_header() {
        let jpeg = encode_jpeg(40, 20, ExtendedColorType::Rgb8);
        let info = read_jpeg_info(&jpeg).unwrap();
        assert_eq!((info.width, info.height), (40, 20));
        assert_eq!(info.color, JpegColor::Rgb);
    }

    #[test]
    fn test_read_gray_header() {
        let jpeg = encode_jpeg(8, 8, ExtendedColorType::L8);
        assert_eq!(read_jpeg_info(&jpeg).unwrap().color, JpegColor::Gray);
    }

    #[test]
    fn test_frame_header_component_counts() {
        let rgb = encode_jpeg(8, 8, ExtendedColorType::Rgb8);
        assert_eq!(
            read_frame_header(&rgb),
            Some(FrameHeader {
                components: 3,
                adobe: false
            })
        );
        assert_eq!(
            read_frame_header(&cmyk_header(false)),
            Some(FrameHeader {
                components: 4,
                adobe: false
            })
        );
        assert_eq!(
            read_frame_header(&cmyk_header(true)),
            Some(FrameHeader {
                components: 4,
                adobe: true
            })
        );
        assert_eq!(read_frame_header(b"not a jpeg"), None);
    }

    #[test]
    fn test_cmyk_dictionary() {
        let info = JpegInfo {
            width: 32,
            height: 16,
            color: JpegColor::Cmyk { inverted: true },
        };
        let dict = image_dictionary(&info);
        assert_eq!(dict.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceCMYK");
        assert_eq!(dict.get(b"Decode").unwrap().as_array().unwrap().len(), 8);

        let plain = image_dictionary(&JpegInfo {
            color: JpegColor::Cmyk { inverted: false },
            ..info
        });
        assert_eq!(plain.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceCMYK");
        assert!(plain.get(b"Decode").is_err());
    }

    #[test]
    fn test_corrupt_jpeg() {
        assert!(read_jpeg_info(b"not a jpeg").is_err());
    }

    #[test]
    fn test_jpeg_xobject_keeps_bytes() {
        let jpeg = encode_jpeg(16, 16, ExtendedColorType::Rgb8);
        let mut doc = Document::with_version("1.7");
        let (id, _) = create_jpeg_xobject(&mut doc, &jpeg).unwrap();

        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert_eq!(stream.content, jpeg);
        assert_eq!(stream.dict.get(b"Filter").unwrap().as_name().unwrap(), b"DCTDecode");
        assert_eq!(stream.dict.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceRGB");
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 16);
    }
}
