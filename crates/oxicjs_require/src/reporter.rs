use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
};

use colored::Colorize;
use log::{debug, trace};

use crate::types::{ModuleStatus, TransformReport};

/// Relativize a path to the current working directory for clickable links
fn relativize_to_cwd(path: &Path) -> String {
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(_) => {
            debug!("Failed to get current directory");
            return path.display().to_string();
        }
    };
    trace!("Relativizing {:?} to cwd {:?}", path, cwd);

    match make_relative(path, &cwd) {
        Some(rel_path) => rel_path.to_string_lossy().to_string(),
        None => {
            trace!("Could not relativize {:?}, using original", path);
            path.display().to_string()
        }
    }
}

/// Create a relative path from `base` to `target`
fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    use std::path::Component;

    let target: Vec<Component> = target.components().collect();
    let base: Vec<Component> = base.components().collect();
    let shared = target.iter().zip(&base).take_while(|(t, b)| t == b).count();
    // Without a shared root there is no relative path
    if shared == 0 {
        return None;
    }

    let mut rel: PathBuf = base[shared..].iter().map(|_| Component::ParentDir).collect();
    for component in &target[shared..] {
        if let Component::Normal(_) | Component::ParentDir = component {
            rel.push(component);
        }
    }
    Some(if rel.as_os_str().is_empty() { PathBuf::from(".") } else { rel })
}

/// One line per module: what happened and, for rewritten modules, the counts.
pub fn print_modules<W: Write>(writer: &mut W, report: &TransformReport) -> io::Result<()> {
    debug!("Printing {} module results", report.modules.len());
    for module in &report.modules {
        let path = relativize_to_cwd(&module.file);
        match &module.status {
            ModuleStatus::Transformed(out) => {
                let mut details = vec![format!("{} static", out.static_requires)];
                if out.dynamic_requires > 0 {
                    details.push(format!("{} dynamic", out.dynamic_requires));
                }
                if out.ignored_requires > 0 {
                    details.push(format!("{} ignored", out.ignored_requires));
                }
                if out.dynamic_counterparts > 0 {
                    details.push(format!("{} runtime", out.dynamic_counterparts));
                }
                writeln!(
                    writer,
                    "{} {} ({}, exports: {})",
                    "✓".green().bold(),
                    path.blue(),
                    details.join(", "),
                    out.export_mode.to_string().cyan()
                )?;
            }
            ModuleStatus::Unchanged => {
                writeln!(writer, "{} {}", "·".dimmed(), path.dimmed())?;
            }
            ModuleStatus::Failed { error } => {
                writeln!(writer, "{} {}", "✗".red().bold(), path.bright_white().bold())?;
                writeln!(writer, "  {} {}", "└──".dimmed(), error.red())?;
            }
        }
    }
    Ok(())
}

/// Prints the rewritten source of every transformed module.
pub fn print_code<W: Write>(writer: &mut W, report: &TransformReport) -> io::Result<()> {
    for module in &report.modules {
        if let ModuleStatus::Transformed(out) = &module.status {
            writeln!(writer, "{}", format!("// {}", relativize_to_cwd(&module.file)).dimmed())?;
            writeln!(writer, "{}", out.code)?;
        }
    }
    Ok(())
}

pub fn print_summary<W: Write>(writer: &mut W, report: &TransformReport) -> io::Result<()> {
    let transformed = report.transformed();
    let failed = report.failed();
    let unchanged = report.modules.len() - transformed - failed;

    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Summary".bold())?;
    writeln!(writer, "  Transformed: {}", transformed.to_string().green().bold())?;
    writeln!(writer, "  Unchanged: {}", unchanged.to_string().dimmed())?;
    if failed > 0 {
        writeln!(writer, "  Failed: {}", failed.to_string().red().bold())?;
    }

    writer.flush()?;
    Ok(())
}

pub fn print_json<W: Write>(writer: &mut W, report: &TransformReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    writer.flush()
}
