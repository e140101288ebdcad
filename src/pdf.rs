//! Certificate and appreciation letter rendering
//!
//! Uses genpdf, which needs real TrueType files for font metrics. The font
//! directory comes from configuration; a few common system locations are
//! tried as a fallback.

use std::path::{Path, PathBuf};

use genpdf::{elements, style, Document, Element, SimplePageDecorator};

use crate::error::{AppError, AppResult};

const FALLBACK_FONT_DIRS: [&str; 4] = [
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/truetype/dejavu",
    "/Library/Fonts",
];

const FONT_FAMILIES: [&str; 3] = ["LiberationSans", "DejaVuSans", "Arial"];

/// Text content of a certificate
#[derive(Debug, Clone)]
pub struct CertificateContent {
    pub recipient_name: String,
    pub submission_title: String,
    /// Human readable submission kind, e.g. "research paper"
    pub submission_kind: String,
    pub verification_code: String,
    pub issued_on: String,
}

/// Text content of a reviewer appreciation letter
#[derive(Debug, Clone)]
pub struct LetterContent {
    pub recipient_name: String,
    pub submission_title: String,
    pub verification_code: String,
    pub issued_on: String,
}

/// PDF renderer for generated documents
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    fonts_path: PathBuf,
    organization: String,
}

impl PdfRenderer {
    pub fn new(fonts_path: impl Into<PathBuf>, organization: impl Into<String>) -> Self {
        Self {
            fonts_path: fonts_path.into(),
            organization: organization.into(),
        }
    }

    /// Render a certificate of acceptance
    pub fn render_certificate(&self, content: &CertificateContent) -> AppResult<Vec<u8>> {
        let mut doc = self.document("Certificate of Acceptance")?;

        doc.push(
            elements::Paragraph::new("Certificate of Acceptance")
                .styled(style::Style::new().with_font_size(24)),
        );
        doc.push(elements::Break::new(1.5));
        for line in certificate_lines(content, &self.organization) {
            doc.push(elements::Paragraph::new(line));
            doc.push(elements::Break::new(0.5));
        }

        render(doc)
    }

    /// Render a reviewer appreciation letter
    pub fn render_letter(&self, content: &LetterContent) -> AppResult<Vec<u8>> {
        let mut doc = self.document("Letter of Appreciation")?;

        doc.push(
            elements::Paragraph::new("Letter of Appreciation")
                .styled(style::Style::new().with_font_size(20)),
        );
        doc.push(elements::Break::new(1.0));
        for line in letter_lines(content, &self.organization) {
            doc.push(elements::Paragraph::new(line));
            doc.push(elements::Break::new(0.5));
        }

        render(doc)
    }

    fn document(&self, title: &str) -> AppResult<Document> {
        let font_family = self.load_fonts()?;

        let mut doc = Document::new(font_family);
        doc.set_title(title);

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(20);
        doc.set_page_decorator(decorator);

        Ok(doc)
    }

    fn load_fonts(&self) -> AppResult<genpdf::fonts::FontFamily<genpdf::fonts::FontData>> {
        let dirs = std::iter::once(self.fonts_path.as_path())
            .chain(FALLBACK_FONT_DIRS.iter().map(Path::new))
            .filter(|p| p.exists());

        for dir in dirs {
            for name in FONT_FAMILIES {
                if let Ok(family) = genpdf::fonts::from_files(dir, name, None) {
                    return Ok(family);
                }
            }
        }

        Err(AppError::Rendering(format!(
            "No usable font family found in {} (install fonts-liberation or set FONTS_PATH)",
            self.fonts_path.display()
        )))
    }
}

fn render(doc: Document) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    doc.render(&mut buf)
        .map_err(|e| AppError::Rendering(e.to_string()))?;
    Ok(buf)
}

/// Body lines of a certificate
pub fn certificate_lines(content: &CertificateContent, organization: &str) -> Vec<String> {
    vec![
        "This is to certify that".to_string(),
        content.recipient_name.clone(),
        format!(
            "is an author of the {} \"{}\"",
            content.submission_kind,
            truncate(&content.submission_title, 120)
        ),
        format!("which has been reviewed and approved by {}.", organization),
        format!("Issued on {}", content.issued_on),
        format!("Verification code: {}", content.verification_code),
    ]
}

/// Body lines of an appreciation letter
pub fn letter_lines(content: &LetterContent, organization: &str) -> Vec<String> {
    vec![
        format!("Dear {},", content.recipient_name),
        format!(
            "On behalf of {}, thank you for reviewing \"{}\".",
            organization,
            truncate(&content.submission_title, 120)
        ),
        "Your careful assessment and feedback are what make our review process work."
            .to_string(),
        format!("Issued on {}", content.issued_on),
        format!("Verification code: {}", content.verification_code),
    ]
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_lines() {
        let content = CertificateContent {
            recipient_name: "Ada Lovelace".to_string(),
            submission_title: "Notes on the Analytical Engine".to_string(),
            submission_kind: "research paper".to_string(),
            verification_code: "ABCDEF0123456789".to_string(),
            issued_on: "March 05, 2024".to_string(),
        };

        let lines = certificate_lines(&content, "Review Desk");
        assert_eq!(lines[1], "Ada Lovelace");
        assert!(lines[2].contains("research paper \"Notes on the Analytical Engine\""));
        assert!(lines.iter().any(|l| l.ends_with("ABCDEF0123456789")));
    }

    #[test]
    fn test_letter_lines_truncate_long_titles() {
        let content = LetterContent {
            recipient_name: "Grace".to_string(),
            submission_title: "t".repeat(500),
            verification_code: "0000".to_string(),
            issued_on: "today".to_string(),
        };

        let lines = letter_lines(&content, "Review Desk");
        assert_eq!(lines[0], "Dear Grace,");
        assert!(lines[1].contains("..."));
        assert!(lines[1].len() < 200);
    }

    #[test]
    fn test_missing_fonts_is_rendering_error() {
        let renderer = PdfRenderer::new("/definitely/not/a/font/dir", "Review Desk");
        // Fallback directories may exist on the host; only assert the error kind when they don't.
        if FALLBACK_FONT_DIRS.iter().all(|d| !Path::new(d).exists()) {
            let content = LetterContent {
                recipient_name: "Grace".to_string(),
                submission_title: "T".to_string(),
                verification_code: "0".to_string(),
                issued_on: "today".to_string(),
            };
            assert!(matches!(
                renderer.render_letter(&content),
                Err(AppError::Rendering(_))
            ));
        }
    }

    #[test]
    fn test_renders_pdf_when_fonts_are_installed() {
        let renderer = PdfRenderer::new("/usr/share/fonts/truetype/liberation", "Review Desk");
        if renderer.load_fonts().is_err() {
            return;
        }

        let certificate = CertificateContent {
            recipient_name: "Ada Lovelace".to_string(),
            submission_title: "Notes on the Analytical Engine".to_string(),
            submission_kind: "research paper".to_string(),
            verification_code: "ABCDEF0123456789".to_string(),
            issued_on: "March 05, 2024".to_string(),
        };
        let bytes = renderer.render_certificate(&certificate).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let letter = LetterContent {
            recipient_name: "Grace".to_string(),
            submission_title: "Notes".to_string(),
            verification_code: "0123456789ABCDEF".to_string(),
            issued_on: "March 05, 2024".to_string(),
        };
        let bytes = renderer.render_letter(&letter).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
