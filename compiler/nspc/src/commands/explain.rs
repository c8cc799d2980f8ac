//! The `explain` command: print the documentation for an error code.

use nsp_diagnostic::{ErrorCode, ErrorDocs};

/// Print the docs for `code_str`. Returns false if there are none.
pub fn explain_error(code_str: &str) -> bool {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes look like EXXXX where X is a digit.");
        eprintln!("Examples: E1002, E2002, E3001");
        return false;
    };

    match ErrorDocs::get(code) {
        Some(doc) => {
            println!("{doc}");
            true
        }
        None => {
            eprintln!("No documentation available for {code_str}");
            false
        }
    }
}
