use std::path::Path;
use std::process;

use warrant_core::{decode_entities, decode_value, encode_entities, encode_value};

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_canon(file: &Path, entities: bool, output: OutputFormat, quiet: bool) {
    let doc = super::load_json(file, output, quiet);

    let canonical = if entities {
        match decode_entities(&doc) {
            Ok(parsed) => encode_entities(&parsed),
            Err(e) => {
                report_error(&e.to_string(), output, quiet);
                process::exit(1);
            }
        }
    } else {
        match decode_value(&doc) {
            Ok(parsed) => encode_value(&parsed),
            Err(e) => {
                report_error(&e.to_string(), output, quiet);
                process::exit(1);
            }
        }
    };

    match serde_json::to_string_pretty(&canonical) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            let msg = format!("internal error: failed to render canonical JSON: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}
