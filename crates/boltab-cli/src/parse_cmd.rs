use std::fs;
use std::path::Path;

use boltab::{PageExtraction, PageParser};

use crate::cli::OutputFormat;

pub fn run(file: &Path, format: &OutputFormat) -> Result<(), i32> {
    let text = fs::read_to_string(file).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", file.display());
        1
    })?;

    let parser = PageParser::new();
    let invoice_no = parser.invoice_no(&text);

    let Some(page) = parser.parse(&text) else {
        eprintln!("Error: no table header found in {}", file.display());
        return Err(1);
    };

    match format {
        OutputFormat::Text => write_text(&invoice_no, &page),
        OutputFormat::Json => write_json(&invoice_no, &page),
    }

    Ok(())
}

fn write_text(invoice_no: &str, page: &PageExtraction) {
    println!(
        "Invoice: {}",
        if invoice_no.is_empty() { "(none)" } else { invoice_no }
    );

    // Compute column widths for aligned output
    let mut widths = ["CARTONS".len(), "STYLE".len(), "PIECES".len(), "WEIGHT".len()];
    for row in &page.rows {
        widths[0] = widths[0].max(row.cartons.len());
        widths[1] = widths[1].max(row.style.len());
        widths[2] = widths[2].max(row.individual_pieces.len());
        widths[3] = widths[3].max(row.individual_weight.len());
    }

    println!(
        "| {:<w0$} | {:<w1$} | {:<w2$} | {:<w3$} |",
        "CARTONS",
        "STYLE",
        "PIECES",
        "WEIGHT",
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    );
    for row in &page.rows {
        println!(
            "| {:<w0$} | {:<w1$} | {:<w2$} | {:<w3$} |",
            row.cartons,
            row.style,
            row.individual_pieces,
            row.individual_weight,
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        );
    }

    if page.has_totals {
        println!(
            "Totals: pieces={} weight={}",
            page.totals.pieces, page.totals.weight,
        );
    }
    if !page.bol_cube.is_empty() {
        println!("BOL cube: {}", page.bol_cube);
    }
}

fn write_json(invoice_no: &str, page: &PageExtraction) {
    let rows: Vec<serde_json::Value> = page
        .rows
        .iter()
        .map(|row| {
            serde_json::json!({
                "cartons": row.cartons,
                "style": row.style,
                "individual_pieces": row.individual_pieces,
                "individual_weight": row.individual_weight,
            })
        })
        .collect();

    let json = serde_json::json!({
        "invoice_no": invoice_no,
        "rows": rows,
        "has_totals": page.has_totals,
        "totals": {
            "pieces": page.totals.pieces,
            "weight": page.totals.weight,
        },
        "bol_cube": page.bol_cube,
    });
    println!("{json}");
}
