//! Document text extraction for uploaded emails.
//!
//! Supports plain text and PDF. The declared media type decides the
//! decoder; the bytes are never sniffed.

use tracing::debug;

use crate::error::ExtractionError;

/// Upload formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
}

impl DocumentKind {
    /// Resolve a declared media type, ignoring parameters and case.
    ///
    /// `text/plain; charset=utf-8` resolves to [`DocumentKind::PlainText`].
    pub fn from_media_type(media_type: &str) -> Result<Self, ExtractionError> {
        let unsupported = || ExtractionError::UnsupportedFormat {
            media_type: media_type.to_string(),
        };

        let parsed: mime::Mime = media_type.trim().parse().map_err(|_| unsupported())?;
        if parsed.type_() == mime::TEXT && parsed.subtype() == mime::PLAIN {
            Ok(DocumentKind::PlainText)
        } else if parsed.type_() == mime::APPLICATION && parsed.subtype() == mime::PDF {
            Ok(DocumentKind::Pdf)
        } else {
            Err(unsupported())
        }
    }
}

/// Extract plain text from an upload.
///
/// Blank output is not an error here; callers decide whether an empty
/// document is acceptable.
pub fn extract(bytes: &[u8], media_type: &str) -> Result<String, ExtractionError> {
    match DocumentKind::from_media_type(media_type)? {
        DocumentKind::PlainText => Ok(String::from_utf8(bytes.to_vec())?),
        DocumentKind::Pdf => extract_pdf(bytes),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed streams instead of erroring.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| ExtractionError::UnreadablePdf("parser panicked".to_string()))?
        .map_err(|e| ExtractionError::UnreadablePdf(e.to_string()))?;

    debug!(pages = pages.len(), bytes = bytes.len(), "Extracted PDF text");
    Ok(pages.concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a PDF with one page per entry; `None` gives a page with no text.
    fn make_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let content = match page {
                Some(text) => format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET"),
                None => String::new(),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn plain_text_is_returned_verbatim() {
        let text = "Olá equipe,\n\n  por favor enviem a fatura do Q3.  \n";
        assert_eq!(extract(text.as_bytes(), "text/plain").unwrap(), text);
    }

    #[test]
    fn plain_text_accepts_charset_parameter() {
        let result = extract(b"hello", "Text/Plain; charset=utf-8").unwrap();
        assert_eq!(result, "hello");
    }

    #[test]
    fn invalid_utf8_fails_with_decode_error() {
        let result = extract(&[0x66, 0x6f, 0xff, 0xfe], "text/plain");
        assert!(matches!(result, Err(ExtractionError::Decode(_))));
    }

    #[test]
    fn unsupported_media_type_fails_regardless_of_content() {
        let pdf = make_pdf(&[Some("hello")]);
        for media_type in ["image/png", "application/msword", "text/html", "", "garbage"] {
            let result = extract(&pdf, media_type);
            assert!(
                matches!(result, Err(ExtractionError::UnsupportedFormat { .. })),
                "{media_type:?} should be unsupported"
            );
            let result = extract(b"plain words", media_type);
            assert!(matches!(
                result,
                Err(ExtractionError::UnsupportedFormat { .. })
            ));
        }
    }

    #[test]
    fn pdf_text_is_extracted() {
        let pdf = make_pdf(&[Some("Invoice request for Q3")]);
        let text = extract(&pdf, "application/pdf").unwrap();
        assert!(
            text.contains("Invoice") && text.contains("Q3"),
            "unexpected text: {text:?}"
        );
    }

    #[test]
    fn pdf_pages_are_joined_in_order() {
        let pdf = make_pdf(&[Some("Alpha"), None, Some("Omega")]);
        let text = extract(&pdf, "application/pdf").unwrap();
        let alpha = text.find("Alpha").expect("first page text");
        let omega = text.find("Omega").expect("last page text");
        assert!(alpha < omega);
    }

    #[test]
    fn pdf_without_text_yields_blank_string() {
        let pdf = make_pdf(&[None, None]);
        let text = extract(&pdf, "application/pdf").unwrap();
        assert!(text.trim().is_empty(), "expected blank text, got {text:?}");
    }

    #[test]
    fn corrupt_pdf_is_unreadable() {
        let result = extract(b"%PDF-1.4 this is not really a pdf", "application/pdf");
        assert!(matches!(result, Err(ExtractionError::UnreadablePdf(_))));

        let result = extract(b"not a pdf", "application/pdf");
        assert!(matches!(result, Err(ExtractionError::UnreadablePdf(_))));
    }

    #[test]
    fn media_type_resolution() {
        assert_eq!(
            DocumentKind::from_media_type("application/pdf").unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::from_media_type(" text/plain ").unwrap(),
            DocumentKind::PlainText
        );
        assert!(DocumentKind::from_media_type("text/csv").is_err());
    }
}
