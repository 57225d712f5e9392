mod snapshot;
mod template;

pub use snapshot::{capture, Snapshot, CAPTURE_SCALE};
pub use template::{invoice_svg, VIEW_WIDTH_PX};

use crate::document::InvoiceDocument;
use crate::error::Result;

/// Render the document and capture it at the given scale in one step.
pub fn capture_document(doc: &InvoiceDocument, scale: f32) -> Result<Snapshot> {
    capture(&invoice_svg(doc), scale)
}
