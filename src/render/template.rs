//! Lays the invoice out as SVG markup. The markup is the "rendered view"
//! that the snapshot step rasterizes, so everything the document holds
//! (logo included, inlined as a data URL) is embedded here.

use crate::document::InvoiceDocument;

/// View width in CSS pixels, A4 portrait at 96 dpi.
pub const VIEW_WIDTH_PX: f32 = 794.0;

const MARGIN: f32 = 48.0;
const RIGHT: f32 = VIEW_WIDTH_PX - MARGIN;
const MIN_HEIGHT: f32 = 800.0;

const INK: &str = "#0f172a";
const MUTED: &str = "#475569";
const ACCENT: &str = "#2563eb";
const RULE: &str = "#e2e8f0";
const ROW_RULE: &str = "#f1f5f9";

/// Render the document into a standalone SVG string. Height grows with
/// content so long item lists paginate across several PDF pages.
pub fn invoice_svg(doc: &InvoiceDocument) -> String {
    let mut body = String::new();
    let mut y = 64.0f32;

    // Header: logo + company identity on the left, invoice meta on the right.
    let name_x = match &doc.logo {
        Some(data_url) => {
            body.push_str(&format!(
                r#"<image x="{MARGIN}" y="40" width="64" height="64" preserveAspectRatio="xMidYMid meet" href="{}"/>"#,
                esc(data_url)
            ));
            MARGIN + 80.0
        }
        None => MARGIN,
    };
    text(&mut body, name_x, y, 24.0, INK, "bold", "start", &doc.company.name);

    let mut left_y = y + 20.0;
    for line in doc.company.address.lines() {
        text(&mut body, name_x, left_y, 12.0, MUTED, "normal", "start", line);
        left_y += 16.0;
    }

    text(&mut body, RIGHT, y, 30.0, ACCENT, "bold", "end", "INVOICE");
    let mut right_y = y + 28.0;
    for meta in [
        format!("Invoice #: {}", doc.invoice_number),
        format!("Date: {}", doc.invoice_date.format("%B %d, %Y")),
        format!("Due Date: {}", doc.due_date.format("%B %d, %Y")),
    ] {
        text(&mut body, RIGHT, right_y, 12.0, MUTED, "normal", "end", &meta);
        right_y += 16.0;
    }

    y = left_y.max(right_y).max(112.0) + 8.0;
    let contact = format!("{} \u{2022} {}", doc.company.phone, doc.company.email);
    text(&mut body, MARGIN, y, 12.0, MUTED, "normal", "start", &contact);
    y += 24.0;

    rule(&mut body, y, RULE, 1.0);
    y += 36.0;

    // Bill To block
    text(&mut body, MARGIN, y, 16.0, INK, "bold", "start", "Bill To:");
    y += 22.0;
    text(&mut body, MARGIN, y, 15.0, INK, "600", "start", &doc.client.name);
    y += 20.0;
    for line in doc.client.address.lines() {
        text(&mut body, MARGIN, y, 12.0, MUTED, "normal", "start", line);
        y += 16.0;
    }
    text(&mut body, MARGIN, y, 12.0, MUTED, "normal", "start", &doc.client.phone);
    y += 16.0;
    text(&mut body, MARGIN, y, 12.0, MUTED, "normal", "start", &doc.client.email);
    y += 36.0;

    // Items table
    let qty_x = 520.0;
    let rate_x = 630.0;
    text(&mut body, MARGIN, y, 12.0, INK, "bold", "start", "Description");
    text(&mut body, qty_x, y, 12.0, INK, "bold", "middle", "Qty");
    text(&mut body, rate_x, y, 12.0, INK, "bold", "end", "Rate");
    text(&mut body, RIGHT, y, 12.0, INK, "bold", "end", "Amount");
    y += 10.0;
    rule(&mut body, y, "#cbd5e1", 2.0);
    y += 24.0;

    for item in doc.items() {
        text(&mut body, MARGIN, y, 12.0, INK, "normal", "start", &item.description);
        text(&mut body, qty_x, y, 12.0, INK, "normal", "middle", &num(item.quantity));
        text(&mut body, rate_x, y, 12.0, INK, "normal", "end", &money(item.rate));
        text(&mut body, RIGHT, y, 12.0, INK, "normal", "end", &money(item.amount));
        y += 8.0;
        rule(&mut body, y, ROW_RULE, 1.0);
        y += 22.0;
    }

    // Totals, right-aligned
    y += 12.0;
    let label_x = 640.0;
    text(&mut body, label_x, y, 12.0, MUTED, "normal", "end", "Subtotal:");
    text(&mut body, RIGHT, y, 12.0, INK, "normal", "end", &money(doc.subtotal()));
    y += 20.0;
    let tax_label = format!("Tax ({}%):", doc.tax_rate_percent);
    text(&mut body, label_x, y, 12.0, MUTED, "normal", "end", &tax_label);
    text(&mut body, RIGHT, y, 12.0, INK, "normal", "end", &money(doc.tax_amount()));
    y += 12.0;
    body.push_str(&format!(
        r#"<line x1="560" y1="{y}" x2="{RIGHT}" y2="{y}" stroke="{RULE}" stroke-width="1"/>"#
    ));
    y += 20.0;
    text(&mut body, label_x, y, 16.0, INK, "bold", "end", "Total:");
    text(&mut body, RIGHT, y, 16.0, ACCENT, "bold", "end", &money(doc.total()));
    y += 32.0;

    // Notes
    if !doc.notes.is_empty() {
        rule(&mut body, y, RULE, 1.0);
        y += 28.0;
        text(&mut body, MARGIN, y, 12.0, INK, "bold", "start", "Notes:");
        y += 18.0;
        for line in doc.notes.lines() {
            text(&mut body, MARGIN, y, 12.0, MUTED, "normal", "start", line);
            y += 16.0;
        }
    }

    let height = (y + MARGIN).max(MIN_HEIGHT).ceil();
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r##"<rect width="100%" height="100%" fill="#ffffff"/>"##,
            "{body}</svg>"
        ),
        w = VIEW_WIDTH_PX,
        h = height,
        body = body
    )
}

fn text(
    buf: &mut String,
    x: f32,
    y: f32,
    size: f32,
    fill: &str,
    weight: &str,
    anchor: &str,
    content: &str,
) {
    buf.push_str(&format!(
        r#"<text x="{x}" y="{y}" font-family="sans-serif" font-size="{size}" fill="{fill}" font-weight="{weight}" text-anchor="{anchor}">{}</text>"#,
        esc(content)
    ));
}

fn rule(buf: &mut String, y: f32, stroke: &str, width: f32) {
    buf.push_str(&format!(
        r#"<line x1="{MARGIN}" y1="{y}" x2="{RIGHT}" y2="{y}" stroke="{stroke}" stroke-width="{width}"/>"#
    ));
}

fn money(value: f64) -> String {
    format!("${value:.2}")
}

fn num(value: f64) -> String {
    format!("{value}")
}

fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Action, InvoiceDocument};

    fn svg_height(svg: &str) -> f32 {
        let start = svg.find("height=\"").unwrap() + 8;
        let end = svg[start..].find('"').unwrap() + start;
        svg[start..end].parse().unwrap()
    }

    #[test]
    fn view_contains_document_content() {
        let doc = InvoiceDocument::new();
        let svg = invoice_svg(&doc);
        assert!(svg.contains("Your Company Name"));
        assert!(svg.contains("INVOICE"));
        assert!(svg.contains("Web Development Services"));
        assert!(svg.contains("$1500.00"));
        assert!(svg.contains("Thank you for your business!"));
        assert!(!svg.contains("<image"));
    }

    #[test]
    fn markup_is_escaped() {
        let mut doc = InvoiceDocument::new();
        doc.apply(Action::SetText(
            "company-name".parse().unwrap(),
            "Smith & Sons <Ltd>".into(),
        ));
        let svg = invoice_svg(&doc);
        assert!(svg.contains("Smith &amp; Sons &lt;Ltd&gt;"));
        assert!(!svg.contains("Smith & Sons <Ltd>"));
    }

    #[test]
    fn logo_is_inlined() {
        let mut doc = InvoiceDocument::new();
        doc.load_logo(&[0x89, b'P', b'N', b'G']);
        let svg = invoice_svg(&doc);
        assert!(svg.contains(r#"href="data:image/png;base64,"#));
    }

    #[test]
    fn height_grows_with_items() {
        let short = InvoiceDocument::new();
        let mut long = InvoiceDocument::new();
        for _ in 0..60 {
            let id = long.add_item();
            long.set_item_description(id, "Consulting");
            long.set_item_rate(id, 100.0);
        }
        let short_h = svg_height(&invoice_svg(&short));
        let long_h = svg_height(&invoice_svg(&long));
        assert!(long_h > short_h);
        assert!(short_h >= 800.0);
    }
}
