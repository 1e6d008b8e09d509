//! Report formatting.

use crate::resolver::ResolveReport;
use crate::OutputFormat;
use anyhow::Result;
use std::io::Write;

/// Write a resolution report in the requested format.
pub fn write_report<W: Write>(
    report: &ResolveReport,
    format: OutputFormat,
    mut out: W,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if let Some(name) = &report.name {
                writeln!(out, "Manifest: {}", name)?;
            }
            for lib in &report.libraries {
                writeln!(out, "{}", lib.library.as_deref().unwrap_or("<process>"))?;
                if let Some(error) = &lib.error {
                    writeln!(out, "  open failed: {}", error)?;
                    continue;
                }
                for sym in &lib.symbols {
                    match (&sym.address, &sym.error) {
                        (Some(address), _) => writeln!(out, "  {:<32} {}", sym.name, address)?,
                        (None, Some(error)) => {
                            writeln!(out, "  {:<32} error: {}", sym.name, error)?
                        }
                        (None, None) => writeln!(out, "  {:<32} -", sym.name)?,
                    }
                }
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "library,symbol,address,error")?;
            for lib in &report.libraries {
                let library = lib.library.as_deref().unwrap_or("");
                if let Some(error) = &lib.error {
                    writeln!(out, "{},,,{}", csv_field(library), csv_field(error))?;
                    continue;
                }
                for sym in &lib.symbols {
                    writeln!(
                        out,
                        "{},{},{},{}",
                        csv_field(library),
                        csv_field(&sym.name),
                        sym.address.as_deref().unwrap_or(""),
                        csv_field(sym.error.as_deref().unwrap_or(""))
                    )?;
                }
            }
        }
    }

    Ok(())
}

/// Quote a CSV field if it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{LibraryReport, SymbolReport};

    fn sample_report() -> ResolveReport {
        ResolveReport {
            name: Some("sample".to_string()),
            libraries: vec![
                LibraryReport {
                    library: None,
                    error: None,
                    symbols: vec![
                        SymbolReport {
                            name: "malloc".to_string(),
                            address: Some("0x7f00".to_string()),
                            error: None,
                        },
                        SymbolReport {
                            name: "nope".to_string(),
                            address: None,
                            error: Some("undefined symbol: nope".to_string()),
                        },
                    ],
                },
                LibraryReport {
                    library: Some("/no/such/lib.so".to_string()),
                    error: Some("cannot open shared object file, no such file".to_string()),
                    symbols: vec![],
                },
            ],
        }
    }

    fn render(format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_report(&sample_report(), format, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_output() {
        let text = render(OutputFormat::Text);
        assert!(text.starts_with("Manifest: sample\n<process>\n"));
        assert!(text.contains("0x7f00"));
        assert!(text.contains("error: undefined symbol: nope"));
        assert!(text.contains("open failed: cannot open"));
    }

    #[test]
    fn test_json_output() {
        let json: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json)).unwrap();
        assert_eq!(json["name"], "sample");
        assert_eq!(json["libraries"][0]["symbols"][0]["address"], "0x7f00");
        assert!(json["libraries"][0]["library"].is_null());
        assert!(json["libraries"][0]["symbols"][0].get("error").is_none());
    }

    #[test]
    fn test_csv_output_quotes_fields() {
        let csv = render(OutputFormat::Csv);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "library,symbol,address,error");
        assert_eq!(lines[1], ",malloc,0x7f00,");
        assert_eq!(
            lines[3],
            "/no/such/lib.so,,,\"cannot open shared object file, no such file\""
        );
    }
}
