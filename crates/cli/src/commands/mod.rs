pub(crate) mod collections;
pub(crate) mod evaluate;
pub(crate) mod expand;
pub(crate) mod render;
pub(crate) mod resolve;

use std::path::Path;
use std::process;

use convenant_core::{replacements_from_json, CaseData, Replacements};

use crate::{report_error, OutputFormat};

/// Read a UTF-8 file or exit with an error naming `what`.
pub(crate) fn read_file(path: &Path, what: &str, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => {
            let msg = format!("error: {} file not found: {}", what, path.display());
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Read and parse a JSON file or exit.
pub(crate) fn read_json(
    path: &Path,
    what: &str,
    output: OutputFormat,
    quiet: bool,
) -> serde_json::Value {
    let text = read_file(path, what, output, quiet);
    match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error: invalid JSON in {}: {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn load_case(path: &Path, output: OutputFormat, quiet: bool) -> CaseData {
    let value = read_json(path, "case", output, quiet);
    match CaseData::from_value(value) {
        Ok(case) => case,
        Err(e) => {
            let msg = format!("error: invalid case data in {}: {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn load_replacements(path: &Path, output: OutputFormat, quiet: bool) -> Replacements {
    let value = read_json(path, "replacements", output, quiet);
    match replacements_from_json(&value) {
        Ok(map) => map,
        Err(e) => {
            let msg = format!("error: invalid replacements in {}: {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Print resolved text, or `{"text", "unresolved"}` in JSON mode.
pub(crate) fn print_text(text: &str, output: OutputFormat) {
    match output {
        OutputFormat::Text => println!("{}", text),
        OutputFormat::Json => {
            let unresolved = convenant_eval::unresolved_markers(text);
            let json = serde_json::json!({ "text": text, "unresolved": unresolved });
            println!("{}", json);
        }
    }
}
