// Line-oriented command session driving the dashboard cascade

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::dashboard::Dashboard;
use crate::parser::{parse_session_line, Command};
use crate::{OutputFormat, RenderOptions};

const HELP: &str = "\
commands (chain with '|'):
  category <Histogram|Boxplot>   switch chart family
  chart \"<key>\"                  pick a chart from the current family
  options                        list charts for the current family
  show                           describe the current chart
  save \"<path>\"                  write the chart (.png .svg .json .html)
  help                           this text
  quit                           leave the session";

enum Flow {
    Continue,
    Stop,
}

/// Read commands from `input` until EOF or `quit`, reporting to `output`.
///
/// Parse errors and rejected commands are reported and the session carries on;
/// only I/O failures on `input`/`output` end it with an error.
pub fn run<R, W>(
    dashboard: &mut Dashboard,
    options: &RenderOptions,
    input: R,
    output: &mut W,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line.context("Failed to read session input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let commands = match parse_session_line(line) {
            Ok(commands) => commands,
            Err(e) => {
                writeln!(output, "error: {}", e)?;
                continue;
            }
        };

        for command in commands {
            debug!(?command, "session command");
            match execute(dashboard, options, command, output) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => return Ok(()),
                Err(e) => {
                    writeln!(output, "error: {:#}", e)?;
                    // Remaining commands on the line depended on this one.
                    break;
                }
            }
        }
    }
    Ok(())
}

fn execute<W: Write>(
    dashboard: &mut Dashboard,
    options: &RenderOptions,
    command: Command,
    output: &mut W,
) -> Result<Flow> {
    match command {
        Command::Category(category) => {
            dashboard.select_category(category);
            write_options(dashboard, output)?;
        }
        Command::Chart(key) => {
            dashboard.select_chart(&key)?;
            writeln!(output, "chart: {}", dashboard.chart_key())?;
        }
        Command::Options => write_options(dashboard, output)?,
        Command::Show => {
            let spec = dashboard.chart()?;
            writeln!(output, "{} [{}]", spec.title, spec.category)?;
            for series in &spec.series {
                writeln!(output, "  {}: {} values", series.name, series.values.len())?;
            }
        }
        Command::Save(path) => {
            let path = Path::new(&path);
            let format = OutputFormat::from_path(path).unwrap_or(options.format);
            let save_options = RenderOptions { format, ..options.clone() };
            let bytes = dashboard.export(&save_options)?;
            std::fs::write(path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "chart saved");
            writeln!(output, "saved {}", path.display())?;
        }
        Command::Help => writeln!(output, "{}", HELP)?,
        Command::Quit => return Ok(Flow::Stop),
    }
    Ok(Flow::Continue)
}

fn write_options<W: Write>(dashboard: &Dashboard, output: &mut W) -> Result<()> {
    writeln!(output, "{} charts:", dashboard.category())?;
    for key in dashboard.options() {
        let marker = if *key == dashboard.chart_key() { '*' } else { ' ' };
        writeln!(output, " {} {}", marker, key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::data::RecordTable;
    use crate::options::Category;
    use std::sync::Arc;

    fn make_dashboard() -> Dashboard {
        let header = catalog::required_columns();
        let row = vec!["2"; header.len()];
        let csv = format!("{}\n{}\n{}\n", header.join(","), row.join(","), row.join(","));
        let table = RecordTable::from_reader(csv.as_bytes()).unwrap();
        Dashboard::new(Arc::new(table)).unwrap()
    }

    fn run_script(dashboard: &mut Dashboard, script: &str) -> String {
        let mut out = Vec::new();
        run(dashboard, &RenderOptions::default(), script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_category_lists_options_with_marker() {
        let mut dash = make_dashboard();
        let out = run_script(&mut dash, "category boxplot\n");
        assert!(out.starts_with("Boxplot charts:\n"));
        assert!(out.contains(" * Work status vs. unemployment rate\n"));
        assert!(out.contains("   Health vs. age\n"));
        assert_eq!(dash.category(), Category::Boxplot);
    }

    #[test]
    fn test_chart_then_show() {
        let mut dash = make_dashboard();
        let out = run_script(&mut dash, "chart \"Ethanol by cigtax\" | show\n");
        assert!(out.contains("chart: Ethanol by cigtax"));
        assert!(out.contains("Ethanol by cigtax [Histogram]"));
        assert!(out.contains("  tax < 15 cents per pack: 2 values"));
        assert!(out.contains("  tax > 25 cents per pack: 0 values"));
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let mut dash = make_dashboard();
        let out = run_script(
            &mut dash,
            "# comment\n\nfrobnicate\nchart \"Health vs. age\" | show\noptions\n",
        );
        assert!(out.contains("error: Parse error"));
        assert!(out.contains("error: 'Health vs. age' is not a Histogram chart"));
        // `show` after the rejected chart is skipped
        assert!(!out.contains("[Histogram]"));
        assert!(out.contains("Histogram charts:"));
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut dash = make_dashboard();
        let out = run_script(&mut dash, "quit\ncategory Boxplot\n");
        assert!(out.is_empty());
        assert_eq!(dash.category(), Category::Histogram);
    }

    #[test]
    fn test_save_uses_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        let mut dash = make_dashboard();
        let out = run_script(&mut dash, &format!("save \"{}\"\n", path.display()));
        assert!(out.starts_with("saved "));

        let figure: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(figure["layout"]["title"], "Ethanol by beertax");
    }
}
