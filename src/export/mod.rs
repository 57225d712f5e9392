//! Export pipeline: raster snapshot in, paginated A4 PDF (or a host
//! print job) out. The document model never reaches into this layer;
//! it only sees the rendered view.

pub mod paginate;

pub use paginate::{PagePlan, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use crate::document::InvoiceDocument;
use crate::error::{Result, StudioError};
use crate::render::{self, Snapshot, CAPTURE_SCALE};

/// Raster resolution used when placing the snapshot on PDF pages.
const PLACEMENT_DPI: f64 = 300.0;

/// Download filename for the current document.
pub fn pdf_filename(invoice_number: &str) -> String {
    format!("invoice-{invoice_number}.pdf")
}

/// Capture the rendered view at 2x and save it as a paginated A4 PDF.
/// Any capture or encoding failure aborts without partial output.
pub fn export_pdf(doc: &InvoiceDocument, output_path: &Path) -> Result<()> {
    let snapshot = render::capture_document(doc, CAPTURE_SCALE)?;
    let title = format!("Invoice {}", doc.invoice_number);
    write_pdf(&snapshot, &title, output_path)
}

/// Slice the snapshot into consecutive A4-height bands, one per page.
/// Page n places the full image shifted up by n * 297 mm, so the bands
/// read top to bottom across the document.
pub fn write_pdf(snapshot: &Snapshot, title: &str, output_path: &Path) -> Result<()> {
    let raster = printpdf::image_crate::load_from_memory(&snapshot.png)?;
    let plan = paginate::plan_pages(snapshot.width_px, snapshot.height_px);

    let natural_width_mm = snapshot.width_px as f64 * 25.4 / PLACEMENT_DPI;
    let scale = PAGE_WIDTH_MM / natural_width_mm;

    let (pdf, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    for (index, top_offset_mm) in plan.top_offsets_mm.iter().enumerate() {
        let layer = if index == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = pdf.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            pdf.get_page(page).get_layer(layer)
        };

        // printpdf places from the bottom-left corner; the offset tracks
        // the image top measured down from the page top.
        let translate_y = PAGE_HEIGHT_MM - plan.image_height_mm - top_offset_mm;

        Image::from_dynamic_image(&raster).add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(Mm(translate_y)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(PLACEMENT_DPI),
                ..Default::default()
            },
        );
    }

    // Assemble fully in memory so a failed save never leaves a partial file.
    let mut writer = BufWriter::new(Vec::new());
    pdf.save(&mut writer)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| StudioError::Io(e.into_error()))?;
    fs::write(output_path, bytes)?;
    Ok(())
}

/// Hand the rendered view to the host print facility. The view is
/// captured once at display scale; pagination is the print renderer's
/// job, not ours.
pub fn print_view(doc: &InvoiceDocument) -> Result<()> {
    let snapshot = render::capture_document(doc, 1.0)?;

    // the temp file must outlive the spool command; it is removed on drop
    let spool_file = write_spool_file(&snapshot)?;
    spool(spool_file.path())
}

fn write_spool_file(snapshot: &Snapshot) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("invoice-")
        .suffix(".png")
        .tempfile()?;
    file.write_all(&snapshot.png)?;
    file.flush()?;
    Ok(file)
}

#[cfg(unix)]
fn spool(path: &Path) -> Result<()> {
    use std::process::Command;

    for program in ["lp", "lpr"] {
        match Command::new(program).arg(path).status() {
            Ok(status) if status.success() => return Ok(()),
            Ok(status) => {
                return Err(StudioError::PrintFailed(format!(
                    "{program} exited with {status}"
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(StudioError::Io(e)),
        }
    }
    Err(StudioError::PrintUnavailable)
}

#[cfg(windows)]
fn spool(path: &Path) -> Result<()> {
    use std::process::Command;

    let script = format!(
        "Start-Process -FilePath '{}' -Verb Print",
        path.display()
    );
    let status = Command::new("powershell")
        .args(["-NoProfile", "-Command", &script])
        .status()
        .map_err(StudioError::Io)?;
    if status.success() {
        Ok(())
    } else {
        Err(StudioError::PrintFailed(format!(
            "powershell exited with {status}"
        )))
    }
}

#[cfg(not(any(unix, windows)))]
fn spool(_path: &Path) -> Result<()> {
    Err(StudioError::PrintUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_snapshot(width_px: u32, height_px: u32) -> Snapshot {
        let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        Snapshot {
            png: pixmap.encode_png().unwrap(),
            width_px,
            height_px,
        }
    }

    #[test]
    fn filename_follows_invoice_number() {
        assert_eq!(pdf_filename("INV-001"), "invoice-INV-001.pdf");
    }

    #[test]
    fn multi_page_snapshot_writes_a_pdf() {
        // 210x650 px fits to 650 mm of image height, three pages
        let snapshot = synthetic_snapshot(210, 650);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice-TEST.pdf");

        write_pdf(&snapshot, "Invoice TEST", &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        // three page objects expected
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Type /Pages") || text.contains("/Type/Pages"));
    }

    #[test]
    fn single_page_snapshot_writes_a_pdf() {
        let snapshot = synthetic_snapshot(794, 800);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice-ONE.pdf");

        write_pdf(&snapshot, "Invoice ONE", &path).unwrap();
        assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn spool_file_lives_only_as_long_as_its_handle() {
        let snapshot = synthetic_snapshot(100, 100);
        let file = write_spool_file(&snapshot).unwrap();
        let path = file.path().to_path_buf();
        assert!(path.extension().is_some_and(|ext| ext == "png"));
        assert!(fs::read(&path).unwrap().starts_with(&[0x89, b'P', b'N', b'G']));

        // distinct handles never collide, even for the same invoice
        let second = write_spool_file(&snapshot).unwrap();
        assert_ne!(path, second.path());

        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_snapshot_aborts_without_output() {
        let snapshot = Snapshot {
            png: vec![0, 1, 2, 3],
            width_px: 10,
            height_px: 10,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice-BAD.pdf");

        assert!(write_pdf(&snapshot, "Invoice BAD", &path).is_err());
        assert!(!path.exists());
    }
}
