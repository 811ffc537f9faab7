//! printpdf backend for [`DocumentLayout`]

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use tandem_types::{Error, Result};

use super::layout::{paginate, DocumentLayout, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

pub(super) fn write_pdf(layout: &DocumentLayout, font_path: Option<&Path>, path: &Path) -> Result<()> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        layout.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let (regular, bold) = load_fonts(&doc, font_path)?;

    for (page_no, placed) in paginate(&layout.lines).iter().enumerate() {
        let (page, layer) = if page_no == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), format!("Layer {}", page_no + 1))
        };
        let current = doc.get_page(page).get_layer(layer);

        for placement in placed {
            let line = &layout.lines[placement.index];
            let font = if line.bold { &bold } else { &regular };
            for run in &line.runs {
                current.use_text(run.text.as_str(), line.size_pt, Mm(run.x_mm), Mm(placement.y_mm), font);
            }
        }
    }

    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| Error::Report(e.to_string()))?;
    Ok(())
}

/// Regular and bold faces. An external font serves both.
fn load_fonts(
    doc: &PdfDocumentReference,
    font_path: Option<&Path>,
) -> Result<(IndirectFontRef, IndirectFontRef)> {
    match font_path {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                Error::Report(format!("Failed to open font {}: {}", path.display(), e))
            })?;
            let font = doc
                .add_external_font(file)
                .map_err(|e| Error::Report(e.to_string()))?;
            Ok((font.clone(), font))
        }
        None => {
            let regular = doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| Error::Report(e.to_string()))?;
            let bold = doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| Error::Report(e.to_string()))?;
            Ok((regular, bold))
        }
    }
}
