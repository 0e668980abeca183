//! Resume text from `.docx` files.

use std::path::Path;

use docx_rs::{DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild};
use tracing::{error, info};

/// Reads the body paragraphs of a `.docx` file, one line per paragraph.
///
/// Empty paragraphs stay as empty lines. Returns `None` when the file cannot be
/// read or is not a valid document; an empty document yields `Some("")`.
pub fn extract_docx_text(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            error!("Error reading docx file {}: {e}", path.display());
            return None;
        }
    };

    match docx_rs::read_docx(&bytes) {
        Ok(docx) => {
            let lines: Vec<String> = docx
                .document
                .children
                .iter()
                .filter_map(|child| match child {
                    DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
                    _ => None,
                })
                .collect();
            info!("Successfully extracted text from {}", path.display());
            Some(lines.join("\n"))
        }
        Err(e) => {
            error!("Error parsing docx file {}: {e}", path.display());
            None
        }
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&paragraph.children, &mut text);
    text
}

// Hyperlinks and tracked insertions hold their own runs; their text is part of the paragraph.
fn push_children_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, text),
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, text),
            ParagraphChild::Insert(insert) => {
                for inserted in &insert.children {
                    if let InsertChild::Run(run) = inserted {
                        push_run_text(run, text);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run_text(run: &Run, text: &mut String) {
    for run_child in &run.children {
        match run_child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}
