//! Output formatting for parse results.

use optstream_core::{ParseResult, RecognizedItem};

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Formats a result in the requested output format.
pub fn format_result(result: &ParseResult<'_>, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&result.items)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => serde_yaml::to_string(&result.items)
            .map_err(|e| format!("YAML serialization failed: {e}")),
        OutputFormat::Table => Ok(result_to_table(result)),
    }
}

fn item_key(item: &RecognizedItem) -> String {
    match (&item.name, item.position) {
        (Some(name), _) if item.unregistered => format!("{name} (unregistered)"),
        (Some(name), _) => name.clone(),
        (None, Some(position)) => format!("#{position}"),
        (None, None) => format!("{} (wildcard)", item.raw_token),
    }
}

fn result_to_table(result: &ParseResult<'_>) -> String {
    let rows: Vec<(String, String)> = result
        .iter()
        .map(|item| {
            let key = match result.positional_name(item) {
                Some(slot) => format!("{} [{slot}]", item_key(item)),
                None => item_key(item),
            };
            (key, item.values.join(" "))
        })
        .collect();

    let width = rows
        .iter()
        .map(|(key, _)| key.len())
        .max()
        .unwrap_or(0)
        .max("KEY".len());

    let mut out = format!("{:<width$}  VALUES\n", "KEY");
    for (key, values) in rows {
        out.push_str(&format!("{key:<width$}  {values}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use optstream_core::{OptionDescription, OptionRegistry, PositionalDescription};

    use crate::CommandLineParser;

    use super::*;

    #[test]
    fn test_table_lists_every_item() {
        let registry = OptionRegistry::new()
            .with(OptionDescription::value("level"))
            .with(OptionDescription::value("plugin.*"));
        let mut positional = PositionalDescription::new();
        positional.add("input", None);
        let result = CommandLineParser::new(["--level", "3", "--plugin.x=1", "a.txt"])
            .options(&registry)
            .positional(&positional)
            .run()
            .unwrap();

        let table = format_result(&result, OutputFormat::Table).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("KEY"));
        assert!(lines[1].starts_with("level") && lines[1].ends_with('3'));
        assert!(lines[2].starts_with("plugin.x (wildcard)"));
        assert!(lines[3].starts_with("#0 [input]") && lines[3].ends_with("a.txt"));
    }

    #[test]
    fn test_json_is_item_array() {
        let result = crate::parse_command_line(["x"], None).unwrap();
        let raw = format_result(&result, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["position"], 0);
        assert_eq!(json[0]["values"][0], "x");
    }
}
