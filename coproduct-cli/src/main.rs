use clap::{Parser, Subcommand};
use eyre::Result;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use coproduct_core::{Handlers, Layout, Matcher, TagSchema, Tagged};

mod logger;

#[derive(Parser)]
#[command(name = "coproduct")]
#[command(about = "Check and dispatch tagged JSON records")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the variants declared by a schema file
    Info {
        /// Schema file
        schema: PathBuf,
    },
    /// Check that every record carries a declared tag
    Check {
        /// Schema file
        #[arg(short, long)]
        schema: PathBuf,

        /// Data file holding a JSON array of records
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Render every record through the schema's templates
    Dispatch {
        /// Schema file
        #[arg(short, long)]
        schema: PathBuf,

        /// Data file holding a JSON array of records
        #[arg(short, long)]
        data: PathBuf,

        /// Allow templates to cover only some labels
        #[arg(long)]
        partial: bool,
    },
    /// Create example schema and data files
    Example {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

/// On-disk schema: the tag schema plus optional per-label templates
#[derive(Serialize, Deserialize, Debug)]
struct SchemaFile {
    schema: TagSchema,
    #[serde(default)]
    templates: BTreeMap<String, String>,
    #[serde(default)]
    fallback: Option<String>,
}

impl SchemaFile {
    fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: SchemaFile = serde_json::from_str(&content)?;

        for label in file.templates.keys() {
            if !file.schema.contains(label) {
                return Err(eyre::eyre!(
                    "Template for undeclared label '{}' in {}",
                    label,
                    path.display()
                ));
            }
        }

        Ok(file)
    }

    fn handlers(&self) -> Handlers<'_, serde_json::Value, String> {
        let mut handlers = Handlers::new();
        for (label, template) in &self.templates {
            handlers = handlers.on_value(label.as_str(), move |value| render(template, &value));
        }
        if let Some(template) = &self.fallback {
            handlers = handlers.otherwise_with(move |value| render(template, &value));
        }
        handlers
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose)?;

    match &cli.command {
        Commands::Info { schema } => {
            show_info(schema)?;
        }
        Commands::Check { schema, data } => {
            check_data(schema, data)?;
        }
        Commands::Dispatch {
            schema,
            data,
            partial,
        } => {
            dispatch_data(schema, data, *partial)?;
        }
        Commands::Example { output } => {
            create_examples(output)?;
        }
    }

    Ok(())
}

fn load_records(path: &Path) -> Result<Vec<serde_json::Value>> {
    let content = fs::read_to_string(path)?;
    match serde_json::from_str(&content)? {
        serde_json::Value::Array(records) => Ok(records),
        other => Err(eyre::eyre!(
            "Expected a JSON array of records in {}, found {}",
            path.display(),
            json_kind(&other)
        )),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn layout_name(layout: &Layout) -> String {
    match layout {
        Layout::TagKeyed => "tag-keyed (payload under the label)".to_string(),
        Layout::Field(field) => format!("fixed field '{}'", field),
        Layout::Whole => "whole record".to_string(),
    }
}

fn show_info(path: &PathBuf) -> Result<()> {
    let file = SchemaFile::load(path)?;
    let schema = &file.schema;

    println!("Schema: {}", path.display());
    println!("Discriminant: {}", schema.discriminant());
    println!("Payload layout: {}", layout_name(schema.layout()));
    println!("Variants: {}", schema.variants().len());

    for variant in schema.variants() {
        let shape = if variant.payload { "payload" } else { "tag only" };
        match file.templates.get(&variant.label) {
            Some(template) => println!("  {} ({}) -> {}", variant.label, shape, template),
            None => println!("  {} ({})", variant.label, shape),
        }
    }

    if let Some(template) = &file.fallback {
        println!("  _ -> {}", template);
    }

    Ok(())
}

fn check_data(schema_path: &PathBuf, data_path: &PathBuf) -> Result<()> {
    let file = SchemaFile::load(schema_path)?;
    let codec = file.schema.codec();
    let records = load_records(data_path)?;

    let mut failures = 0;
    for (i, record) in records.into_iter().enumerate() {
        match codec.decode(record) {
            Ok(value) if file.schema.admits(&value) => {
                debug!("record {}: '{}' ok", i, value.tag());
            }
            Ok(value) => {
                failures += 1;
                if file.schema.contains(value.tag()) {
                    println!("record {}: '{}' is missing its payload", i, value.tag());
                } else {
                    println!("record {}: undeclared tag '{}'", i, value.tag());
                }
            }
            Err(e) => {
                failures += 1;
                println!("record {}: {}", i, e);
            }
        }
    }

    if failures > 0 {
        return Err(eyre::eyre!(
            "{} record(s) in {} do not match the schema",
            failures,
            data_path.display()
        ));
    }

    println!("Schema validation: PASS");
    Ok(())
}

fn dispatch_data(schema_path: &PathBuf, data_path: &PathBuf, partial: bool) -> Result<()> {
    let file = SchemaFile::load(schema_path)?;
    let records = load_records(data_path)?;

    let uncovered = file.schema.uncovered(&file.handlers());
    if !partial && file.fallback.is_none() && !uncovered.is_empty() {
        warn!(
            "templates do not cover {}; add them or a fallback, or pass --partial",
            uncovered.join(", ")
        );
    }

    let (lines, failures) = dispatch_records(&file, records, partial);
    for line in &lines {
        println!("{}", line);
    }

    if failures > 0 {
        return Err(eyre::eyre!("{} record(s) could not be dispatched", failures));
    }

    info!("dispatched every record in {}", data_path.display());
    Ok(())
}

/// Render each record, or a `record <i>: <reason>` line when it cannot be
/// decoded or dispatched. Returns the lines and the number of failures.
fn dispatch_records(
    file: &SchemaFile,
    records: Vec<serde_json::Value>,
    partial: bool,
) -> (Vec<String>, usize) {
    let codec = file.schema.codec();
    let mut lines = Vec::with_capacity(records.len());
    let mut failures = 0;

    for (i, record) in records.into_iter().enumerate() {
        let matcher: Matcher<serde_json::Value> = match codec.matching(record) {
            Ok(matcher) => matcher,
            Err(e) => {
                failures += 1;
                lines.push(format!("record {}: {}", i, e));
                continue;
            }
        };

        let handlers = file.handlers();
        let outcome = if partial {
            matcher.partial(handlers)
        } else {
            matcher.case(handlers)
        };

        match outcome {
            Ok(line) => lines.push(line),
            Err(failure) => {
                failures += 1;
                lines.push(format!("record {}: {}", i, failure));
            }
        }
    }

    (lines, failures)
}

/// Fill `{tag}`, `{payload}` and `{payload.<field>}` placeholders.
///
/// Strings are written without quotes; anything else as compact JSON. Unknown
/// placeholders are left as they are.
fn render(template: &str, value: &Tagged<serde_json::Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match placeholder(key, value) {
            Some(text) => out.push_str(&text),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn placeholder(key: &str, value: &Tagged<serde_json::Value>) -> Option<String> {
    if key == "tag" {
        return Some(value.tag().to_string());
    }

    let payload = value.payload();
    if key == "payload" {
        return Some(payload.map(show_json).unwrap_or_default());
    }

    let field = key.strip_prefix("payload.")?;
    Some(
        payload
            .and_then(|p| p.get(field))
            .map(show_json)
            .unwrap_or_default(),
    )
}

fn show_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(show_json)
            .collect::<Vec<_>>()
            .join(" & "),
        other => other.to_string(),
    }
}

fn create_examples(output_dir: &PathBuf) -> Result<()> {
    println!("Creating example files in: {}", output_dir.display());

    fs::create_dir_all(output_dir)?;

    let schema_example = serde_json::json!({
        "schema": {
            "discriminant": "type",
            "layout": "whole",
            "variants": [
                { "label": "a", "payload": true },
                { "label": "b", "payload": true },
                { "label": "c", "payload": true },
                { "label": "d", "payload": true }
            ]
        },
        "templates": {
            "a": "a: {payload.a}",
            "b": "b: {payload.b}",
            "c": "c: {payload.c}",
            "d": "d: {payload.d}"
        },
        "fallback": "unexpected {tag}"
    });

    let schema_file = output_dir.join("schema.json");
    fs::write(&schema_file, serde_json::to_string_pretty(&schema_example)?)?;
    println!("Created: {}", schema_file.display());

    let data_example = serde_json::json!([
        { "type": "a", "a": 1 },
        { "type": "b", "b": "b" },
        { "type": "c", "c": true },
        { "type": "d", "d": [1, 2, 3] }
    ]);

    let data_file = output_dir.join("data.json");
    fs::write(&data_file, serde_json::to_string_pretty(&data_example)?)?;
    println!("Created: {}", data_file.display());

    println!("\nExample usage:");
    println!("  coproduct info {}", schema_file.display());
    println!(
        "  coproduct check --schema {} --data {}",
        schema_file.display(),
        data_file.display()
    );
    println!(
        "  coproduct dispatch --schema {} --data {}",
        schema_file.display(),
        data_file.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coproduct_core::{RecordCodec, TagSchema};
    use serde_json::json;

    fn example_file() -> SchemaFile {
        serde_json::from_value(json!({
            "schema": {
                "discriminant": "type",
                "layout": "whole",
                "variants": [
                    { "label": "a", "payload": true },
                    { "label": "d", "payload": true },
                    { "label": "e" }
                ]
            },
            "templates": { "a": "a: {payload.a}", "d": "{tag}: {payload.d}" }
        }))
        .unwrap()
    }

    #[test]
    fn render_fills_placeholders() {
        let value = RecordCodec::whole_record("type")
            .decode(json!({ "type": "d", "d": [1, 2, 3] }))
            .unwrap();
        assert_eq!(render("{tag}: {payload.d}", &value), "d: 1 & 2 & 3");
        assert_eq!(render("{missing} {payload.x}!", &value), "{missing} !");
        assert_eq!(render("open {tag", &value), "open {tag");
    }

    #[test]
    fn templates_dispatch_by_label() {
        let file = example_file();
        let codec = file.schema.codec();

        let line = codec
            .matching(json!({ "type": "a", "a": 1 }))
            .unwrap()
            .case(file.handlers())
            .unwrap();
        assert_eq!(line, "a: 1");

        let failure = codec
            .matching(json!({ "type": "e" }))
            .unwrap()
            .partial(file.handlers())
            .unwrap_err();
        assert_eq!(failure.to_string(), "Unhandled branch: e");
    }

    #[test]
    fn dispatch_keeps_going_past_bad_records() {
        let file = example_file();
        let records = vec![
            json!({ "type": "a", "a": 1 }),
            json!([1, 2]),
            json!({ "a": 2 }),
            json!({ "type": "e" }),
            json!({ "type": "a", "a": 3 }),
        ];

        let (lines, failures) = dispatch_records(&file, records, true);
        assert_eq!(failures, 3);
        assert_eq!(
            lines,
            vec![
                "a: 1".to_string(),
                "record 1: Expected a JSON object, but was: [1,2]".to_string(),
                "record 2: Missing discriminant field: type".to_string(),
                "record 3: Unhandled branch: e".to_string(),
                "a: 3".to_string(),
            ]
        );
    }

    #[test]
    fn dispatch_of_clean_records_has_no_failures() {
        let file = example_file();
        let records = vec![
            json!({ "type": "d", "d": [1, 2] }),
            json!({ "type": "a", "a": "x" }),
        ];

        let (lines, failures) = dispatch_records(&file, records, false);
        assert_eq!(failures, 0);
        assert_eq!(lines, vec!["d: 1 & 2".to_string(), "a: x".to_string()]);
    }

    #[test]
    fn uncovered_labels_are_reported() {
        let file = example_file();
        let schema: &TagSchema = &file.schema;
        assert_eq!(schema.uncovered(&file.handlers()), vec!["e"]);
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(logger::level_for(0), log::LevelFilter::Warn);
        assert_eq!(logger::level_for(2), log::LevelFilter::Debug);
        assert_eq!(logger::level_for(9), log::LevelFilter::Trace);
    }
}
