use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xmlmap::{beautify, from_xml, to_xml_with_config, EncodeConfig, Value};

#[derive(Debug, Parser)]
#[command(
    name = "xmlmap",
    version,
    about = "Convert between XML and JSON, or re-indent XML"
)]
struct Args {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Input format (json, xml)
    #[arg(short, long, value_enum)]
    from: Option<FormatArg>,
    /// Output format (json, xml)
    #[arg(short, long, value_enum)]
    to: FormatArg,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Root element name when writing XML
    #[arg(long, value_name = "NAME", default_value = "root")]
    root: String,
    /// Leave out the `<?xml ...?>` line when writing XML
    #[arg(long)]
    no_declaration: bool,
    /// Indent XML output, one tag per line
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Json,
    Xml,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();

    let input_data = read_input(args.input.as_ref())?;
    let from = match args.from.or_else(|| infer_format(args.input.as_ref())) {
        Some(format) => format,
        None => {
            bail!(
                "could not infer input format; pass --from or provide an input file with extension"
            );
        }
    };
    info!(?from, to = ?args.to, "converting");

    let output = convert(&input_data, from, &args)?;

    write_output(args.output.as_ref(), output.as_bytes())?;
    Ok(())
}

fn convert(input: &str, from: FormatArg, args: &Args) -> Result<String> {
    match (from, args.to) {
        (FormatArg::Xml, FormatArg::Json) => {
            let map = from_xml(input).context("failed to parse XML input")?;
            let mut json = serde_json::to_string_pretty(&Value::Mapping(map))
                .context("failed to serialize JSON")?;
            json.push('\n');
            Ok(json)
        }
        (FormatArg::Json, FormatArg::Xml) => {
            let value: Value =
                serde_json::from_str(input).context("failed to parse JSON input")?;
            let mut config = EncodeConfig::new(args.root.as_str());
            if args.no_declaration {
                config = config.without_declaration();
            }
            let xml = to_xml_with_config(&value, &config).context("failed to build XML")?;
            Ok(if args.pretty { beautify(&xml) } else { xml })
        }
        (FormatArg::Xml, FormatArg::Xml) => Ok(beautify(input)),
        (FormatArg::Json, FormatArg::Json) => {
            debug!("passing json through unchanged");
            Ok(input.to_string())
        }
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}

fn infer_format(path: Option<&PathBuf>) -> Option<FormatArg> {
    let ext = path?.extension().and_then(|s| s.to_str())?;
    match ext {
        "json" => Some(FormatArg::Json),
        "xml" => Some(FormatArg::Xml),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(to: FormatArg) -> Args {
        Args {
            input: None,
            from: None,
            to,
            output: None,
            root: "root".to_string(),
            no_declaration: false,
            pretty: false,
        }
    }

    #[test]
    fn test_infer_format() {
        assert_eq!(
            infer_format(Some(&PathBuf::from("a/b.xml"))),
            Some(FormatArg::Xml)
        );
        assert_eq!(
            infer_format(Some(&PathBuf::from("data.json"))),
            Some(FormatArg::Json)
        );
        assert_eq!(infer_format(Some(&PathBuf::from("notes.txt"))), None);
        assert_eq!(infer_format(None), None);
    }

    #[test]
    fn test_json_to_xml_options() -> Result<()> {
        let mut args = args(FormatArg::Xml);
        args.root = "doc".to_string();
        args.no_declaration = true;
        let xml = convert(r#"{"a": 1, "b": [true, null]}"#, FormatArg::Json, &args)?;
        assert_eq!(xml, "<doc><a>1</a><b>true</b><b/></doc>\n");

        args.pretty = true;
        let xml = convert(r#"{"a": {"c": "x"}}"#, FormatArg::Json, &args)?;
        assert_eq!(xml, "<doc>\n <a>\n  <c>x</c>\n </a>\n</doc>\n");
        Ok(())
    }

    #[test]
    fn test_json_empty_array_keeps_element() -> Result<()> {
        let mut args = args(FormatArg::Xml);
        args.no_declaration = true;
        let xml = convert(r#"{"nonBookEntity": [], "x": "1"}"#, FormatArg::Json, &args)?;
        assert_eq!(xml, "<root><nonBookEntity/><x>1</x></root>\n");
        Ok(())
    }

    #[test]
    fn test_xml_to_json() -> Result<()> {
        let json = convert("<r a=\"1\">t</r>", FormatArg::Xml, &args(FormatArg::Json))?;
        let parsed: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(
            parsed,
            serde_json::json!({"@content": "t", "@attributes": {"a": "1"}, "@root": "r"})
        );
        Ok(())
    }

    #[test]
    fn test_json_root_must_be_object() {
        assert!(convert("[1, 2]", FormatArg::Json, &args(FormatArg::Xml)).is_err());
    }
}
