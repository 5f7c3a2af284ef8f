use std::path::Path;

use convenant_eval::{resolve_nested, EngineOptions};

use super::{load_replacements, print_text, read_file};
use crate::OutputFormat;

pub(crate) fn cmd_resolve(
    file: &Path,
    replacements_path: &Path,
    options: &EngineOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let text = read_file(file, "text", output, quiet);
    let replacements = load_replacements(replacements_path, output, quiet);

    let resolved = resolve_nested(&text, &replacements, options.max_placeholder_depth);
    print_text(&resolved, output);
}
