//! daily-report – command-line daily report → PDF exporter.
//!
//! Usage:
//!   daily-report <report.json> [output-dir] [--estimate] [--layout-json <path>]
//!                [--title "Daily Report"] [--photo-max-width <px>] [--photo-quality <1-100>]
//!
//! The PDF is written to `<output-dir>/<date>__<project>__daily-report.pdf`.
//! If `output-dir` is omitted the directory of the input file is used.

use std::{env, fs, path::Path, path::PathBuf, process};

use daily_report_pdf::pipeline::{
    compute_layout_config, estimate_page_count, file_name, PipelineConfig,
};
use daily_report_pdf::render::render_pdf;
use daily_report_pdf::ReportDocument;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_dir: Option<PathBuf> = None;
    let mut layout_json: Option<PathBuf> = None;
    let mut estimate_only = false;
    let mut config = PipelineConfig::default();
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--estimate" | "-e" => estimate_only = true,
            "--layout-json" => layout_json = Some(PathBuf::from(flag_value(&mut iter, arg, &args[0]))),
            "--title" | "-t" => config.title = flag_value(&mut iter, arg, &args[0]),
            "--photo-max-width" => {
                config.photo_max_width = parse_number(&flag_value(&mut iter, arg, &args[0]), arg)
            }
            "--photo-quality" => {
                let quality: u8 = parse_number(&flag_value(&mut iter, arg, &args[0]), arg);
                if !(1..=100).contains(&quality) {
                    eprintln!("Error: --photo-quality must be between 1 and 100.");
                    process::exit(1);
                }
                config.photo_quality = quality;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 {
                    input_path = Some(PathBuf::from(path));
                } else if positional == 1 {
                    output_dir = Some(PathBuf::from(path));
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    let input = match input_path {
        Some(p) => p,
        None => {
            eprintln!("Error: no input file specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };
    let base_dir = input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let json = match fs::read_to_string(&input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", input.display());
            process::exit(1);
        }
    };

    let doc = match ReportDocument::from_json(&json, &base_dir) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error loading '{}': {e}", input.display());
            process::exit(1);
        }
    };

    if estimate_only {
        println!("{}", estimate_page_count(&doc));
        return;
    }

    let layout = match compute_layout_config(&doc, &config) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error laying out report: {e}");
            process::exit(1);
        }
    };

    if let Some(path) = layout_json {
        let written = layout
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|j| fs::write(&path, j).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Error writing layout '{}': {e}", path.display());
            process::exit(1);
        }
    }

    let bytes = match render_pdf(&layout) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error generating PDF: {e}");
            process::exit(1);
        }
    };

    let dir = output_dir.unwrap_or(base_dir);
    if !dir.as_os_str().is_empty() {
        if let Err(e) = fs::create_dir_all(&dir) {
            eprintln!("Error creating output directory: {e}");
            process::exit(1);
        }
    }
    let output = dir.join(file_name(&doc));
    if let Err(e) = fs::write(&output, &bytes) {
        eprintln!("Error writing '{}': {e}", output.display());
        process::exit(1);
    }

    let pages = layout.page_count();
    eprintln!(
        "Wrote '{}' ({} bytes, {} page{})",
        output.display(),
        bytes.len(),
        pages,
        if pages == 1 { "" } else { "s" }
    );
}

fn flag_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str, prog: &str) -> String {
    match iter.next() {
        Some(v) => v.clone(),
        None => {
            eprintln!("Error: {flag} expects a value.");
            print_usage(prog);
            process::exit(1);
        }
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> T {
    match value.parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Error: {flag} expects a number, got '{value}'.");
            process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("daily-report – construction daily report to PDF");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <report.json> [output-dir] [flags]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <report.json>  Persisted report (photos as data URIs or paths relative to the file)");
    eprintln!("  [output-dir]   Where to write the PDF (default: directory of the input)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --estimate, -e           Print the page count and exit");
    eprintln!("  --layout-json <path>     Also write the computed layout as JSON");
    eprintln!("  --title, -t <title>      Document title in PDF metadata (default: Daily Report)");
    eprintln!("  --photo-max-width <px>   Downscale wider photos (default: 1400)");
    eprintln!("  --photo-quality <1-100>  JPEG quality for photos (default: 72)");
    eprintln!("  --help                   Print this message");
}
