//! Usage, help, attribution and error text generation.

use crate::config::{ArgSpec, ArgTable, ATTRIBUTION_NAME, HELP_NAME, HELP_SHORT};
use std::fmt::Display;

/// Width of the name column in help listings.
const HELP_COLUMN_WIDTH: usize = 25;

/// Header line of every error report.
const ERROR_HEADER: &str = "ERROR!";

/// Decorated option name as shown in usage and help, e.g. `[--depth|-L ...]`.
fn option_label(table: &ArgTable, spec: &ArgSpec) -> String {
    let mut label = String::new();
    if !spec.required {
        label.push('[');
    }
    label.push_str(&table.long_prefix);
    label.push_str(&spec.name);
    if let Some(short) = spec.short.filter(|_| !table.short_prefix.is_empty()) {
        label.push('|');
        label.push_str(&table.short_prefix);
        label.push(short);
    }
    if spec.takes_value() {
        label.push_str(" ...");
    }
    if !spec.required {
        label.push(']');
    }
    label
}

/// Decorated positional name: `<name>` when required by the minimum count, else `[name]`.
fn positional_label(table: &ArgTable, index: usize, spec: &ArgSpec) -> String {
    if index < table.min_positionals {
        format!("<{}>", spec.name)
    } else {
        format!("[{}]", spec.name)
    }
}

/// The token that requests help, if help is reachable at all.
fn help_flag(table: &ArgTable) -> Option<String> {
    if table.no_help {
        None
    } else if !table.long_prefix.is_empty() {
        Some(format!("{}{}", table.long_prefix, HELP_NAME))
    } else if !table.short_prefix.is_empty() {
        Some(format!("{}{}", table.short_prefix, HELP_SHORT))
    } else {
        None
    }
}

fn padding(width: usize, used: usize) -> String {
    " ".repeat(width.saturating_sub(used))
}

/// Generate the one-line usage summary, newline included.
pub fn generate_usage(table: &ArgTable, program: &str) -> String {
    if let Some(ref usage) = table.usage {
        return format!("USAGE: {}\n", usage);
    }

    let mut usage = format!("USAGE: {} ", program);

    for spec in &table.options {
        usage.push_str(&option_label(table, spec));
        usage.push(' ');
    }

    if !table.end_of_options.is_empty() {
        usage.push_str(&format!("[{}] ", table.end_of_options));
    }

    for (index, spec) in table.positionals.iter().enumerate() {
        usage.push_str(&positional_label(table, index, spec));
        usage.push(' ');
    }

    usage.push('\n');
    usage
}

/// Generate the full help text.
pub fn generate_help(table: &ArgTable, program: &str) -> String {
    let mut help = String::new();

    if let Some(ref description) = table.description {
        help.push_str(description);
        help.push('\n');
    }
    help.push_str(&generate_usage(table, program));

    help.push_str("\n  Positional Arguments:\n");
    for (index, spec) in table.positionals.iter().enumerate() {
        let label = positional_label(table, index, spec);
        let used = spec.name.chars().count() + 3;
        help.push_str(&format!(
            "    {} {} {}\n",
            label,
            padding(HELP_COLUMN_WIDTH, used),
            spec.help.as_deref().unwrap_or_default()
        ));
    }

    help.push_str("\n  Options:\n");
    let attribution = format!("{}{}", table.long_prefix, ATTRIBUTION_NAME);
    push_option_line(
        &mut help,
        &attribution,
        "License attribution for the declargs library.",
    );
    if let Some(flag) = help_flag(table) {
        push_option_line(&mut help, &flag, "Show this message.");
    }
    for spec in &table.options {
        push_option_line(
            &mut help,
            &option_label(table, spec),
            spec.help.as_deref().unwrap_or_default(),
        );
    }

    if let Some(ref epilog) = table.epilog {
        help.push_str(epilog);
        help.push('\n');
    }

    help
}

fn push_option_line(help: &mut String, label: &str, text: &str) {
    help.push_str(&format!(
        "    {}{} {}\n",
        label,
        padding(HELP_COLUMN_WIDTH, label.chars().count()),
        text
    ));
}

/// Generate the attribution notice printed by `--declargs`.
pub fn generate_attribution() -> String {
    format!(
        "Copyright (c) 2026 yanctab\n\
         This program uses declargs {}, an Apache-2.0 licensed Rust library, for its command-line interface.\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Generate the canonical error report: header, usage, detail and help hint.
pub fn generate_error(table: &ArgTable, program: &str, detail: &dyn Display) -> String {
    let mut report = format!("{}\n", ERROR_HEADER);
    report.push_str(&generate_usage(table, program));
    report.push_str(&detail.to_string());
    if let Some(flag) = help_flag(table) {
        report.push_str(&format!(
            "\nType '{} {}' for more information.",
            program, flag
        ));
    }
    report.push('\n');
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Bounds, ValueType};
    use crate::parser::ParseError;

    fn filetree_table() -> ArgTable {
        ArgTable {
            description: Some(
                "Iterate recursively over a directory and print its files.".to_string(),
            ),
            options: vec![
                ArgSpec::new("follow-symlink")
                    .help("Follow symbolic links for directories.")
                    .value_type(ValueType::Bool)
                    .default_value("false"),
                ArgSpec::new("full-path").help("Print full path.").short('f'),
                ArgSpec::new("max-depth")
                    .help("How much the iteration can be nested.")
                    .short('L')
                    .value_type(ValueType::Int)
                    .int_bounds(Bounds::Between(1, 50))
                    .default_value("5"),
            ],
            positionals: vec![ArgSpec::new("root")
                .help("Root directory to be iterated over.")
                .needs_value()
                .default_value(".")],
            ..ArgTable::default()
        }
    }

    fn calc_table() -> ArgTable {
        ArgTable {
            min_positionals: 2,
            options: vec![ArgSpec::new("int").short('i').required()],
            positionals: vec![
                ArgSpec::new("left").value_type(ValueType::Float),
                ArgSpec::new("right").value_type(ValueType::Float),
                ArgSpec::new("note"),
            ],
            ..ArgTable::default()
        }
    }

    #[test]
    fn test_generate_usage() {
        assert_eq!(
            generate_usage(&filetree_table(), "filetree"),
            "USAGE: filetree [--follow-symlink ...] [--full-path|-f] [--max-depth|-L ...] [--] [root] \n"
        );
    }

    #[test]
    fn test_usage_required_option_and_positionals() {
        assert_eq!(
            generate_usage(&calc_table(), "calc"),
            "USAGE: calc --int|-i [--] <left> <right> [note] \n"
        );
    }

    #[test]
    fn test_usage_without_short_prefix_or_marker() {
        let mut table = calc_table();
        table.short_prefix = String::new();
        table.end_of_options = String::new();
        assert_eq!(
            generate_usage(&table, "calc"),
            "USAGE: calc --int <left> <right> [note] \n"
        );
    }

    #[test]
    fn test_usage_override() {
        let mut table = calc_table();
        table.usage = Some("calc [options] LEFT RIGHT".to_string());
        assert_eq!(
            generate_usage(&table, "ignored"),
            "USAGE: calc [options] LEFT RIGHT\n"
        );
    }

    #[test]
    fn test_generate_help_layout() {
        let expected = concat!(
            "Iterate recursively over a directory and print its files.\n",
            "USAGE: filetree [--follow-symlink ...] [--full-path|-f] [--max-depth|-L ...] [--] [root] \n",
            "\n",
            "  Positional Arguments:\n",
            "    [root]                    Root directory to be iterated over.\n",
            "\n",
            "  Options:\n",
            "    --declargs                License attribution for the declargs library.\n",
            "    --help                    Show this message.\n",
            "    [--follow-symlink ...]    Follow symbolic links for directories.\n",
            "    [--full-path|-f]          Print full path.\n",
            "    [--max-depth|-L ...]      How much the iteration can be nested.\n",
        );
        assert_eq!(generate_help(&filetree_table(), "filetree"), expected);
    }

    #[test]
    fn test_help_is_idempotent() {
        let table = filetree_table();
        assert_eq!(
            generate_help(&table, "filetree"),
            generate_help(&table, "filetree")
        );
    }

    #[test]
    fn test_help_required_positional_and_epilog() {
        let mut table = calc_table();
        table.no_help = true;
        table.epilog = Some("Report bugs upstream.".to_string());
        let help = generate_help(&table, "calc");

        assert!(help.starts_with("USAGE: calc "));
        assert!(help.contains("    <left>                    \n"));
        assert!(help.contains("    [note]                    \n"));
        assert!(help.contains("    --int|-i                  \n"));
        assert!(!help.contains("--help"));
        assert!(help.ends_with("Report bugs upstream.\n"));
    }

    #[test]
    fn test_help_long_names_overflow_column() {
        let table = ArgTable {
            options: vec![ArgSpec::new("a-very-long-option-name-here").help("Long.")],
            positionals: vec![ArgSpec::new("an-extremely-long-positional").help("Pos.")],
            ..ArgTable::default()
        };
        let help = generate_help(&table, "prog");
        assert!(help.contains("    [an-extremely-long-positional]  Pos.\n"));
        assert!(help.contains("    [--a-very-long-option-name-here] Long.\n"));
    }

    #[test]
    fn test_help_uses_short_flag_when_long_disabled() {
        let table = ArgTable {
            long_prefix: String::new(),
            ..ArgTable::default()
        };
        let report = generate_error(&table, "prog", &"bad");
        assert!(report.ends_with("bad\nType 'prog -h' for more information.\n"));
    }

    #[test]
    fn test_generate_error() {
        let err = ParseError::UnknownOption("--bogus".to_string());
        let report = generate_error(&calc_table(), "calc", &err);
        assert_eq!(
            report,
            "ERROR!\n\
             USAGE: calc --int|-i [--] <left> <right> [note] \n\
             Unknown option: --bogus\n\
             Type 'calc --help' for more information.\n"
        );
    }

    #[test]
    fn test_generate_error_without_help_hint() {
        let mut table = calc_table();
        table.no_help = true;
        let report = generate_error(&table, "calc", &"something failed");
        assert!(report.ends_with("[note] \nsomething failed\n"));
        assert!(!report.contains("Type '"));
    }

    #[test]
    fn test_generate_attribution() {
        let text = generate_attribution();
        assert!(text.starts_with("Copyright (c) 2026 yanctab\n"));
        assert!(text.contains("declargs"));
        assert!(text.ends_with("command-line interface.\n"));
    }
}
