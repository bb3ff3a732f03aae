use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};

use crate::errors::ScreeningError;

/// Text of every top-level body paragraph, in document order.
/// Empty paragraphs are kept as empty strings.
pub fn paragraph_texts(content: &[u8]) -> Result<Vec<String>, ScreeningError> {
    let docx = docx_rs::read_docx(content)
        .map_err(|e| ScreeningError::extraction(format!("DOCX parse error: {e:?}")))?;

    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect())
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_children(&para.children, &mut text);
    text
}

// Runs are parts of the same sentence, so they concatenate without a separator.
fn push_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children(&link.children, out),
            _ => {}
        }
    }
}
