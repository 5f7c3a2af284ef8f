use std::path::Path;

use convenant_eval::{render, unresolved_markers, EngineOptions};

use super::{load_case, print_text, read_file};
use crate::OutputFormat;

pub(crate) fn cmd_render(
    template_path: &Path,
    case_path: &Path,
    options: &EngineOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let template = read_file(template_path, "template", output, quiet);
    let case = load_case(case_path, output, quiet);

    let text = render(&template, &case, options);
    let unresolved = unresolved_markers(&text);
    if !unresolved.is_empty() && !quiet && output == OutputFormat::Text {
        eprintln!("warning: unresolved markers: {}", unresolved.join(", "));
    }
    print_text(&text, output);
}
