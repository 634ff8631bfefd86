//! # Etiqueta CLI
//!
//! Usage:
//!   etiqueta config.json -o labels.pdf
//!   echo '{ ... }' | etiqueta -o labels.pdf
//!   etiqueta --example > config.json

use std::env;
use std::fs;
use std::io::{self, Read};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "etiqueta=info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_config_json());
        return;
    }

    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .expect("Failed to read stdin");
        buf
    };

    // Parse output path
    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "labels.pdf".to_string());

    let config: etiqueta::SheetConfig = match serde_json::from_str(&input) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", etiqueta::EtiquetaError::from(e));
            std::process::exit(1);
        }
    };

    match etiqueta::capacity(&config) {
        Ok(capacity) => eprintln!(
            "Estimated {} labels per page (≈ {} columns × {} rows)",
            capacity.labels_per_page(),
            capacity.columns,
            capacity.rows
        ),
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }

    match etiqueta::render(&config) {
        Ok(pdf_bytes) => {
            fs::write(&output_path, &pdf_bytes).expect("Failed to write PDF");
            eprintln!("✓ Written {} bytes to {}", pdf_bytes.len(), output_path);
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}

fn example_config_json() -> &'static str {
    r##"{
  "start": "JB-02721",
  "count": 5,
  "repetitions": 1,
  "page": "Letter",
  "unit": "mm",
  "labelWidth": 70.0,
  "labelHeight": 50.0,
  "marginX": 10.0,
  "marginY": 10.0,
  "padding": 5.0,
  "fontSize": 6.0,
  "lineSpacing": 8.0,
  "lines": [
    "IMPORTER:",
    "ACME DISTRIBUTION LTD",
    "TAX ID: 900.123.456-1",
    "REF: {REF}",
    "UPPER: 100% SYNTHETIC",
    "LINING: 100% SYNTHETIC",
    "SOLE: 100% RUBBER",
    "SIZE: 38-41   MADE IN CHINA"
  ],
  "qr": true,
  "qrSize": 30.0,
  "qrPayload": { "type": "plain", "template": "REF-{REF}" }
}
"##
}
