use std::path::Path;
use std::process;

use convenant_core::{EvaluationContext, Replacements, RuleSet};
use convenant_eval::{evaluate_resolved, EngineOptions};

use super::{load_replacements, read_json};
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_evaluate(
    rules_path: &Path,
    context_path: &Path,
    replacements_path: Option<&Path>,
    options: &EngineOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let rules_json = read_json(rules_path, "rules", output, quiet);
    let rule_set = match RuleSet::from_json(&rules_json) {
        Ok(rs) => rs,
        Err(e) => {
            let msg = format!("error: invalid rule set in {}: {}", rules_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let context_json = read_json(context_path, "context", output, quiet);
    let ctx = match EvaluationContext::from_json(&context_json) {
        Ok(ctx) => ctx,
        Err(e) => {
            let msg = format!("error: invalid context in {}: {}", context_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let replacements = match replacements_path {
        Some(path) => load_replacements(path, output, quiet),
        None => Replacements::new(),
    };

    let evaluation = evaluate_resolved(&rule_set, &ctx, &replacements, options.max_placeholder_depth);
    match output {
        OutputFormat::Json => println!("{}", evaluation.to_json()),
        OutputFormat::Text => {
            if !quiet {
                match evaluation.matched_rule {
                    Some(n) => eprintln!("matched rule {}", n),
                    None => eprintln!("no rule matched; default used"),
                }
            }
            println!("{}", evaluation.result);
        }
    }
}
