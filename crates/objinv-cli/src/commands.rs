use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use objinv_codec::{
    DecodedInventory, EncodeOptions, FormatVersion, Header, InventoryReader, InventoryWriter,
    UrlJoin,
};
use objinv_types::{Entry, InventoryTable};
use serde::Serialize;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Inspect(args) => cmd_inspect(args, cli.format),
        Command::Lookup(args) => cmd_lookup(args, cli.format),
        Command::Convert(args) => cmd_convert(args),
    }
}

#[derive(Serialize)]
struct InventoryView<'a> {
    header: &'a Header,
    entries: &'a InventoryTable,
}

#[derive(Serialize)]
struct EntryView<'a> {
    object_type: &'a str,
    name: &'a str,
    #[serde(flatten)]
    entry: &'a Entry,
}

fn load(path: &Path, base: &str) -> anyhow::Result<DecodedInventory> {
    InventoryReader::new(base, UrlJoin)
        .open(path)
        .with_context(|| format!("failed to read inventory {}", path.display()))
}

fn cmd_inspect(args: InspectArgs, format: OutputFormat) -> anyhow::Result<()> {
    let inv = load(&args.file, &args.base)?;
    match format {
        OutputFormat::Json => {
            let view = InventoryView {
                header: &inv.header,
                entries: &inv.table,
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Text => print!("{}", render_inventory(&inv)?),
    }
    Ok(())
}

/// Text listing: header, then each object type with its entries sorted by
/// name.
fn render_inventory(inv: &DecodedInventory) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let header = &inv.header;
    writeln!(
        out,
        "{} {} {}",
        header.project.bold(),
        header.project_version.cyan(),
        format!("(inventory {})", header.format).dimmed()
    )?;

    let mut types: Vec<_> = inv.table.object_types().collect();
    types.sort();
    for ty in types {
        writeln!(out, "{}", ty.as_str().yellow().bold())?;
        let Some(entries) = inv.table.entries(ty.as_str()) else {
            continue;
        };
        let mut sorted: Vec<_> = entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        for (name, entry) in sorted {
            let label = if entry.has_display_name() {
                entry.display_name.as_str()
            } else {
                ""
            };
            writeln!(out, "    {name:<40} {label:<40}: {}", entry.uri)?;
        }
    }
    writeln!(
        out,
        "{} entries in {} object types",
        inv.table.len(),
        inv.table.type_count()
    )?;
    Ok(out)
}

fn cmd_lookup(args: LookupArgs, format: OutputFormat) -> anyhow::Result<()> {
    let inv = load(&args.file, &args.base)?;
    let Some(entry) = inv.table.get(&args.object_type, &args.name) else {
        bail!(
            "{} {:?} not found in {}",
            args.object_type,
            args.name,
            args.file.display()
        );
    };
    match format {
        OutputFormat::Json => {
            let view = EntryView {
                object_type: &args.object_type,
                name: &args.name,
                entry,
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Text => {
            println!("{} {}", args.object_type.yellow(), args.name.bold());
            println!("  Project:  {} {}", entry.project_name, entry.project_version.cyan());
            println!("  URI:      {}", entry.uri);
            println!("  Label:    {}", entry.label(&args.name));
            println!("  Priority: {}", entry.priority);
        }
    }
    Ok(())
}

/// Encode options for `convert`: the options file (if any), then flags.
fn convert_options(args: &ConvertArgs) -> anyhow::Result<EncodeOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            EncodeOptions::from_toml_str(&text)?
        }
        None => EncodeOptions::default(),
    };
    if let Some(to) = args.to {
        options.format = match to {
            TargetVersion::V1 => FormatVersion::V1,
            TargetVersion::V2 => FormatVersion::V2,
        };
    }
    if let Some(level) = args.level {
        options.compression_level = level;
    }
    if args.no_shorten {
        options.shorten_uris = false;
    }
    options.validate()?;
    Ok(options)
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let options = convert_options(&args)?;
    debug!(?options, input = %args.input.display(), "converting inventory");
    // Empty base keeps every location relative, as it was in the input.
    let inv = load(&args.input, "")?;

    InventoryWriter::new(options.clone())
        .write_file(
            &inv.table,
            &inv.header.project,
            &inv.header.project_version,
            &args.output,
        )
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "{} Wrote {} entries to {} ({} -> {})",
        "✓".green().bold(),
        inv.table.len(),
        args.output.display().to_string().bold(),
        inv.header.format,
        options.format
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use objinv_codec::PosixJoin;
    use objinv_types::ObjectType;

    fn sample_table() -> InventoryTable {
        let mut table = InventoryTable::new();
        let ty = |s: &str| ObjectType::parse(s).unwrap();
        table.insert(
            ty("py:module"),
            "module1",
            Entry::new("foo", "2.0", "foo.html#module-module1", "Long Module desc").with_priority(0),
        );
        table.insert(
            ty("py:class"),
            "module1.Foo",
            Entry::new("foo", "2.0", "foo.html#module1.Foo", "-"),
        );
        table
    }

    fn write_sample(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("objects.inv");
        InventoryWriter::default()
            .write_file(&sample_table(), "foo", "2.0", &path)
            .unwrap();
        path
    }

    fn convert_args(input: &Path, output: &Path) -> ConvertArgs {
        ConvertArgs {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            to: None,
            level: None,
            no_shorten: false,
            options: None,
        }
    }

    #[test]
    fn render_lists_sorted_types() {
        colored::control::set_override(false);
        let dir = tempfile::tempdir().unwrap();
        let inv = load(&write_sample(dir.path()), "/util").unwrap();
        let text = render_inventory(&inv).unwrap();

        let class_pos = text.find("py:class").unwrap();
        let module_pos = text.find("py:module").unwrap();
        assert!(class_pos < module_pos);
        assert!(text.contains("/util/foo.html#module-module1"));
        assert!(text.contains("Long Module desc"));
        assert!(text.contains("2 entries in 2 object types"));
    }

    #[test]
    fn convert_v2_to_v1_and_back() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let v1 = dir.path().join("v1.inv");
        let back = dir.path().join("back.inv");

        let mut args = convert_args(&input, &v1);
        args.to = Some(TargetVersion::V1);
        cmd_convert(args).unwrap();
        let text = std::fs::read_to_string(&v1).unwrap();
        assert!(text.starts_with("# Sphinx inventory version 1\n"));
        assert!(text.contains("module1 mod foo.html\n"));

        cmd_convert(convert_args(&v1, &back)).unwrap();
        let decoded = InventoryReader::new("", PosixJoin).open(&back).unwrap();
        assert_eq!(decoded.header.format, FormatVersion::V2);
        assert_eq!(
            decoded.table.get("py:class", "module1.Foo").unwrap().uri,
            "foo.html#module1.Foo"
        );
    }

    #[test]
    fn convert_no_shorten_keeps_dollar_names() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.inv");
        let output = dir.path().join("out.inv");
        let mut table = InventoryTable::new();
        table.insert(
            ObjectType::parse("py:data").unwrap(),
            "a$",
            Entry::new("foo", "2.0", "x.html#a$", "-"),
        );
        InventoryWriter::default()
            .write_file(&table, "foo", "2.0", &input)
            .unwrap();

        let mut args = convert_args(&input, &output);
        args.no_shorten = true;
        cmd_convert(args).unwrap();
        let decoded = InventoryReader::new("", PosixJoin).open(&output).unwrap();
        assert_eq!(decoded.table.get("py:data", "a$").unwrap().uri, "x.html#a$");
    }

    #[test]
    fn flags_override_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let opts = dir.path().join("encode.toml");
        std::fs::write(&opts, "format = \"v1\"\ncompression_level = 3\n").unwrap();

        let mut args = convert_args(Path::new("in"), Path::new("out"));
        args.options = Some(opts);
        args.level = Some(6);
        args.no_shorten = true;
        let options = convert_options(&args).unwrap();
        assert_eq!(options.format, FormatVersion::V1);
        assert_eq!(options.compression_level, 6);
        assert!(!options.shorten_uris);
    }

    #[test]
    fn bad_level_is_rejected() {
        let mut args = convert_args(Path::new("in"), Path::new("out"));
        args.level = Some(10);
        assert!(convert_options(&args).is_err());
    }

    #[test]
    fn lookup_missing_entry_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = LookupArgs {
            file: write_sample(dir.path()),
            object_type: "py:function".into(),
            name: "nope".into(),
            base: String::new(),
        };
        assert!(cmd_lookup(args, OutputFormat::Text).is_err());
    }

    #[test]
    fn load_reports_path() {
        let err = load(Path::new("/nonexistent/objects.inv"), "").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/objects.inv"));
    }
}
