use std::path::Path;

use convenant_eval::{EngineOptions, LoopExpander};

use super::{load_case, print_text, read_file};
use crate::OutputFormat;

pub(crate) fn cmd_expand(
    template_path: &Path,
    case_path: &Path,
    options: &EngineOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let template = read_file(template_path, "template", output, quiet);
    let case = load_case(case_path, output, quiet);

    let expanded = LoopExpander::standard(*options).expand(&template, Some(&case));
    print_text(&expanded, output);
}
