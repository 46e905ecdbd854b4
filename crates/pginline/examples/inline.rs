//! Statement inlining example
//!
//! Run with:
//! `cargo run --example inline -p pginline`

use colored::Colorize;
use pginline::{InlineError, ParamValue, format_literal, inline_sql, params, validate_sql};

fn main() {
    println!("{}", "=== SQL Inline Examples ===".bold().cyan());
    println!();

    // 1. Syntax validation
    println!("{}", "1. Syntax Validation".bold());
    check_syntax("SELECT * FROM users WHERE id = $1");
    check_syntax("select * from users where id = $1");
    check_syntax("SELECT * FORM users");
    check_syntax("SELECT * FROM (");
    check_syntax("SELECT 1; SELECT 2");
    println!();

    // 2. Literals
    println!("{}", "2. Literal Formatting".bold());
    show_literal(ParamValue::from("O'Brien"));
    show_literal(ParamValue::from("line\nbreak"));
    show_literal(ParamValue::raw_text(b"bad\xFFbyte".to_vec()));
    show_literal(ParamValue::from(-42i32));
    show_literal(ParamValue::from(u64::MAX));
    show_literal(ParamValue::from(0.1f64));
    show_literal(ParamValue::from(true));
    show_literal(ParamValue::Float(f64::NAN));
    show_literal(ParamValue::unsupported::<Vec<String>>());
    println!();

    // 3. Full inlining
    println!("{}", "3. Inlining".bold());
    inline(
        "SELECT * FROM t WHERE name = $1 AND id = $2",
        &params!["O'Brien", 42],
    );
    inline("SELECT $2, $1, $2", &params!["a", "b"]);
    inline("SELECT '$1', $1 -- $1", &params![7]);
    inline("SELECT 1 - $1", &params![-5]);
    inline("SELECT $1", &params![]);
    inline("SELECT $1, $2", &params![1]);
    inline("SELECT * FROM (", &params![1]);
}

fn check_syntax(sql: &str) {
    let result = validate_sql(sql);
    let status = if result.is_ok() {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {}", status, sql.dimmed());
    if let Err(err) = result {
        println!("    {}: {}", "Error".red(), err);
    }
}

fn show_literal(value: ParamValue) {
    match format_literal(&value) {
        Ok(lit) => println!("  {} {:?} => {}", "✓".green().bold(), value, lit.cyan()),
        Err(err) => println!("  {} {:?} => {}", "✗".red().bold(), value, err.to_string().red()),
    }
}

fn inline(sql: &str, values: &[ParamValue]) {
    println!("  {}", sql.dimmed());
    match inline_sql(sql, values) {
        Ok(out) => println!("    {} {}", "=>".green().bold(), out.cyan()),
        Err(err) => {
            let kind = match &err {
                InlineError::Syntax(_) => "SYNTAX",
                InlineError::ParameterIndex(_) => "INDEX",
                InlineError::UnsupportedType { .. } => "TYPE",
                InlineError::Format(_) => "FORMAT",
                InlineError::InputTooLarge { .. } => "SIZE",
            };
            println!("    {} [{}] {}", "ERROR".red().bold(), kind.yellow(), err);
        }
    }
}
