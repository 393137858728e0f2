use std::path::Path;
use std::process;

use warrant_core::{decode_entities, decode_value, DecodeError};

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_check(file: &Path, entities: bool, output: OutputFormat, quiet: bool) {
    let doc = super::load_json(file, output, quiet);

    let result: Result<(), DecodeError> = if entities {
        decode_entities(&doc).map(|_| ())
    } else {
        decode_value(&doc).map(|_| ())
    };

    match result {
        Ok(()) => {
            if !quiet {
                match output {
                    OutputFormat::Text => println!("ok: {}", file.display()),
                    OutputFormat::Json => println!("{{\"ok\": true}}"),
                }
            }
        }
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}
