use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt;
use std::io::{Cursor, Read};

/// Largest upload accepted, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Extensions offered in the file dialog.
pub const ACCEPTED_EXTENSIONS: &str = ".docx,.txt,.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Docx,
    Markdown,
    Text,
}

impl DocumentKind {
    pub fn from_filename(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".docx") {
            Some(Self::Docx)
        } else if lower.ends_with(".md") {
            Some(Self::Markdown)
        } else if lower.ends_with(".txt") {
            Some(Self::Text)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    UnsupportedType,
    Unreadable(String),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType => write!(
                f,
                "Định dạng file không hỗ trợ. Vui lòng tải lên file .docx, .md hoặc .txt"
            ),
            Self::Unreadable(_) => write!(f, "Không thể đọc file. Vui lòng thử lại."),
        }
    }
}

/// Turn an uploaded file into the plain text of the blog post.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, IngestError> {
    let kind = DocumentKind::from_filename(filename).ok_or(IngestError::UnsupportedType)?;
    match kind {
        DocumentKind::Docx => docx_to_text(bytes),
        DocumentKind::Markdown | DocumentKind::Text => {
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Raw text of a Word document: runs joined, one line per paragraph.
pub fn docx_to_text(bytes: &[u8]) -> Result<String, IngestError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| IngestError::Unreadable(format!("not a docx archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| IngestError::Unreadable(format!("missing word/document.xml: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| IngestError::Unreadable(e.to_string()))?;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:p" => current.clear(),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|err| IngestError::Unreadable(err.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(IngestError::Unreadable(e.to_string())),
        }
    }

    Ok(paragraphs.join("\n\n"))
}

/// The blog text being worked on plus where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogDraft {
    pub content: String,
    /// Name of the last loaded file; `None` once the text is edited by hand.
    pub file_name: Option<String>,
}

impl BlogDraft {
    /// Replace the text from an upload. On failure nothing changes.
    pub fn load_file(&mut self, filename: &str, bytes: &[u8]) -> Result<(), IngestError> {
        match extract_text(filename, bytes) {
            Ok(text) => {
                self.content = text;
                self.file_name = Some(filename.to_string());
                Ok(())
            }
            Err(e) => {
                if let IngestError::Unreadable(ref detail) = e {
                    log::warn!("Failed to read upload {}: {}", filename, detail);
                }
                Err(e)
            }
        }
    }

    /// Manual edit: keep the text, drop the filename.
    pub fn edit(&mut self, text: String) {
        self.content = text;
        self.file_name = None;
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Minimal .docx holding the given document.xml body.
    pub fn docx(body: &str) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            write!(
                zip,
                r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
                body
            )
            .unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }
}
