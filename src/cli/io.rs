//! JSON output for CLI commands

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_response_to(data, &mut io::stdout())
}

/// Write a success response to `writer` as one line
pub fn write_response_to<W: Write>(data: Value, writer: &mut W) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    
    serde_json::to_writer(&mut *writer, &response)?;
    writeln!(writer)?;
    writer.flush()?;
    
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_one_line() {
        let mut buffer = Vec::new();
        write_response_to(serde_json::json!({"port": 8080}), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "{\"data\":{\"port\":8080},\"status\":\"ok\"}\n");
    }
}
