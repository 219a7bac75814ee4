use serde::Serialize;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// A response that can also be shown as rows.
pub trait Tabular {
    fn headers(&self) -> Vec<&'static str>;
    fn rows(&self) -> Vec<Vec<String>>;
}

/// Render a response to a string in the requested format.
pub fn render<T: Serialize + Tabular>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(value)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a response in the requested format.
pub fn output<T: Serialize + Tabular>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_table<T: Tabular>(value: &T) -> String {
    let rows = value.rows();
    if rows.is_empty() {
        return String::from("(no rows)");
    }

    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };
    table::render_rows(&value.headers(), &rows, options)
}

/// `-` for absent values in table cells.
pub fn cell(value: Option<&str>) -> String {
    value.map_or_else(|| String::from("-"), str::to_string)
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::{Tabular, render};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        port: u16,
        process: &'static str,
    }

    impl Tabular for Example {
        fn headers(&self) -> Vec<&'static str> {
            vec!["port", "process"]
        }

        fn rows(&self) -> Vec<Vec<String>> {
            vec![vec![self.port.to_string(), self.process.to_string()]]
        }
    }

    #[derive(Serialize)]
    struct Empty;

    impl Tabular for Empty {
        fn headers(&self) -> Vec<&'static str> {
            vec!["id"]
        }

        fn rows(&self) -> Vec<Vec<String>> {
            Vec::new()
        }
    }

    fn example() -> Example {
        Example {
            port: 31007,
            process: "anytypeHelper",
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&example(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["port"], 31007);
        assert_eq!(parsed["process"], "anytypeHelper");
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&example(), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["port"], 31007);
    }

    #[test]
    fn table_render_uses_tabular_rows() {
        let out = render(&example(), OutputFormat::Table).expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("port") && lines[0].contains("process"));
        assert!(lines[2].contains("anytypeHelper"));
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(render(&Empty, OutputFormat::Table).unwrap(), "(no rows)");
    }
}
