use std::path::Path;
use std::process;

use warrant_core::decode_value;

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_expr(file: &Path, output: OutputFormat, quiet: bool) {
    let doc = super::load_json(file, output, quiet);

    match decode_value(&doc) {
        Ok(value) => match output {
            OutputFormat::Text => println!("{}", value.to_expr()),
            OutputFormat::Json => {
                let wrapped = serde_json::json!({ "expr": value.to_expr() });
                println!("{}", wrapped);
            }
        },
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}
