//! # Quire CLI
//!
//! Usage:
//!   quire sheet.json -o sheet.pdf
//!   quire sheet.json -o pages.png      (one file per page: pages-1.png, …)
//!   echo '{ ... }' | quire -o sheet.pdf
//!   quire --example > sheet.json

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;

use quire::{PageExporter, Sheet};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_sheet_json());
        return;
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .expect("Failed to read stdin");
        buf
    };

    let output = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "sheet.pdf".to_string());

    let sheet: Sheet = match serde_json::from_str(&input) {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("✗ Failed to parse sheet: {e}");
            process::exit(1);
        }
    };

    let exporter = PageExporter::new(&sheet);
    let path = Path::new(&output);
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("pdf")
        .to_ascii_lowercase();

    let result = match extension.as_str() {
        "pdf" => exporter.export_pdf_file(path),
        "png" => exporter.export_pngs(path),
        "jpg" | "jpeg" => exporter.export_jpegs(path),
        "webp" => exporter.export_webps(path),
        other => {
            eprintln!("✗ Unsupported output format: .{other} (use pdf, png, jpeg, or webp)");
            process::exit(1);
        }
    };

    match result {
        Ok(()) => {
            eprintln!("✓ Exported {} page(s) from {}", exporter.page_count(), output);
        }
        Err(e) => {
            eprintln!("✗ Export failed: {e}");
            process::exit(1);
        }
    }
}

fn example_sheet_json() -> &'static str {
    r##"{
  "name": "Kessa Thornwood",
  "player": "Robin",
  "page": {
    "paper": "Letter",
    "orientation": "Portrait",
    "margin": { "top": 18, "right": 18, "bottom": 18, "left": 18 }
  },
  "blocks": {
    "reactions": {
      "rows": [
        { "text": "+2 from Charisma", "height": 14 },
        { "text": "-1 from Social Stigma (Outsider)", "height": 14 }
      ]
    },
    "conditional_modifiers": {
      "rows": [
        { "text": "+1 DX when climbing (Flexibility)", "height": 14 }
      ]
    },
    "melee_weapons": {
      "rows": [
        { "text": "Shortsword  1d+1 cut  Reach 1  Parry 11", "height": 14 },
        { "text": "Dagger  1d-2 imp  Reach C  Parry 9", "height": 14 }
      ]
    },
    "ranged_weapons": {
      "rows": [
        { "text": "Short Bow  1d imp  Acc 1  Range 110/165", "height": 14 }
      ]
    },
    "traits": {
      "rows": [
        { "text": "Acute Vision 2", "height": 14 },
        { "text": "Combat Reflexes", "height": 14 },
        { "text": "Flexibility", "height": 14 },
        { "text": "Code of Honor (Outlaw's)", "height": 28 },
        { "text": "Social Stigma (Outsider)", "height": 14 }
      ]
    },
    "skills": {
      "rows": [
        { "text": "Acrobatics  DX-1  12", "height": 14 },
        { "text": "Bow  DX+1  14", "height": 14 },
        { "text": "Climbing  DX+2  15", "height": 14 },
        { "text": "Shortsword  DX+1  14", "height": 14 },
        { "text": "Stealth  DX+1  14", "height": 14 },
        { "text": "Survival (Woodlands)  Per  12", "height": 14 }
      ]
    },
    "equipment": {
      "rows": [
        { "text": "Backpack, Small  $60  3 lb", "height": 14 },
        { "text": "Rope, 10 yards  $5  1.5 lb", "height": 14 },
        { "text": "Personal Basics  $5  1 lb", "height": 14 },
        { "text": "Shortsword  $400  2 lb", "height": 14 },
        { "text": "Short Bow with 10 arrows  $70  4 lb", "height": 28 }
      ]
    },
    "notes": {
      "rows": [
        { "text": "Wanted in the river baronies; travels under the name 'Wren'.", "height": 28 }
      ]
    }
  }
}"##
}
