//! Evaluate a binary operation given on the command line.
//!
//! ```text
//! cargo run --example calc -- --sentence mult 6 7
//! ```

use declargs::{exit_with_error, parse_or_exit, ArgSpec, ArgTable, Hooks, ValueType};

fn main() {
    let table = ArgTable {
        description: Some("Calculate the result of a binary operation.".to_string()),
        min_positionals: 3,
        options: vec![
            ArgSpec::new("int")
                .short('i')
                .help("Values are considered as int."),
            ArgSpec::new("sentence")
                .short('s')
                .help("Will print a sentence instead of the raw result."),
        ],
        positionals: vec![
            ArgSpec::new("operation")
                .help("Operation evaluated on left and right values.")
                .choices(["add", "sub", "mult", "div"]),
            ArgSpec::new("left-value")
                .help("Left operand")
                .value_type(ValueType::Float),
            ArgSpec::new("right-value")
                .help("Right operand")
                .value_type(ValueType::Float),
        ],
        ..ArgTable::default()
    };

    let argv: Vec<String> = std::env::args().collect();
    let matches = parse_or_exit(&table, &argv, &mut Hooks::new());

    let operand = |name: &str| {
        matches
            .positional(name)
            .and_then(|r| r.as_float())
            .unwrap_or_default()
    };
    let truncate = matches.is_present("int");
    let (mut lhs, mut rhs) = (operand("left-value"), operand("right-value"));
    if truncate {
        lhs = lhs.trunc();
        rhs = rhs.trunc();
    }

    let operation = matches
        .positional("operation")
        .and_then(|r| r.raw())
        .unwrap_or_default();
    if truncate && operation == "div" && rhs == 0.0 {
        let program = table.effective_program_name(&argv);
        exit_with_error(&table, program, &"Integer division by zero.");
    }

    let (symbol, mut result) = match operation {
        "add" => ('+', lhs + rhs),
        "sub" => ('-', lhs - rhs),
        "mult" => ('*', lhs * rhs),
        _ => ('/', lhs / rhs),
    };
    if truncate && symbol == '/' {
        result = result.trunc();
    }

    if matches.is_present("sentence") {
        println!("The result of {} {} {} is {}.", lhs, symbol, rhs, result);
    } else {
        println!("{}", result);
    }
}
