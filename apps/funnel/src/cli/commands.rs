//! Command implementations.
//!
//! Each `cmd_*` writes its output to the given writer so tests can inspect
//! it. With `json` set, output is a single JSON document.

use super::CliResult;
use funnel_core::policy::DEFAULT_CALLBACK_RESULT;
use funnel_core::{
    CallbackLimit, Checklist, RuleTable, Stage, Target, allowed_moves, check_manual_move,
};
use serde::Serialize;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

// =============================================================================
// HELPERS
// =============================================================================

/// Load a rule table from `path`, or fall back to the standard funnel.
pub fn load_rules(path: Option<&Path>) -> CliResult<Cow<'static, RuleTable>> {
    let Some(path) = path else {
        tracing::debug!("using standard rule table");
        return Ok(Cow::Borrowed(RuleTable::standard()));
    };

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read rule table {}: {e}", path.display()))?;
    let table = RuleTable::from_json(&content)?;
    tracing::info!(path = %path.display(), stages = table.len(), "loaded rule table");
    Ok(Cow::Owned(table))
}

/// Accept a stage as identifier, label or storage code.
///
/// Storage codes are translated to identifiers; anything else is passed
/// through so the resolver reports unknown stages itself.
fn stage_arg(input: &str) -> Cow<'_, str> {
    match Target::from_storage_code(input) {
        Ok(Target::Stage(stage)) => Cow::Borrowed(stage.id()),
        _ => Cow::Borrowed(input),
    }
}

/// Parse a move endpoint: identifier, label or storage code.
fn target_arg(input: &str) -> CliResult<Target> {
    let target = input
        .parse::<Target>()
        .or_else(|_| Target::from_storage_code(input))?;
    Ok(target)
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// STAGES / RULES
// =============================================================================

#[derive(Serialize)]
struct StageRow {
    id: &'static str,
    label: &'static str,
    storage_code: &'static str,
    on_board: bool,
}

/// List every target in funnel order, archive last.
pub fn cmd_stages(out: &mut dyn Write, json: bool) -> CliResult<()> {
    let rows: Vec<StageRow> = Target::ALL
        .into_iter()
        .map(|target| StageRow {
            id: target.id(),
            label: target.label(),
            storage_code: target.storage_code(),
            on_board: target.on_board(),
        })
        .collect();

    if json {
        return write_json(out, &rows);
    }

    for row in &rows {
        let board = if row.on_board { "board" } else { "-" };
        writeln!(
            out,
            "{:<16} {:<22} {:<18} {}",
            row.id, row.label, row.storage_code, board
        )?;
    }
    Ok(())
}

/// Print the rule table, or one stage of it.
pub fn cmd_rules(
    out: &mut dyn Write,
    table: &RuleTable,
    stage: Option<&str>,
    json: bool,
) -> CliResult<()> {
    let selected: Vec<_> = match stage {
        Some(stage) => {
            let (parsed, rule) = table.rule_for(&stage_arg(stage))?;
            vec![(parsed, rule)]
        }
        None => table.stages().collect(),
    };

    if json {
        let map: std::collections::BTreeMap<_, _> = selected.into_iter().collect();
        return write_json(out, &map);
    }

    for (stage, rule) in selected {
        writeln!(out, "{} ({})", stage, stage.label())?;

        if rule.checklist.is_empty() {
            writeln!(out, "  checklist: (none)")?;
        } else {
            writeln!(out, "  checklist:")?;
            for item in &rule.checklist {
                writeln!(out, "    - {}: {}", item.key, item.display_label())?;
            }
        }

        if rule.is_dead_end() {
            writeln!(out, "  results: (none, dead end)")?;
        } else {
            writeln!(out, "  results:")?;
            for (code, result) in &rule.results {
                writeln!(
                    out,
                    "    {} -> {}  ({})",
                    code,
                    result.target,
                    table.result_label(stage, code)
                )?;
            }
        }
    }
    Ok(())
}

// =============================================================================
// CHECK / RESOLVE / OPTIONS
// =============================================================================

#[derive(Serialize)]
struct CheckReport {
    stage: Stage,
    complete: bool,
    missing: Vec<String>,
}

/// Report whether the ticked items complete a stage checklist.
pub fn cmd_check(
    out: &mut dyn Write,
    table: &RuleTable,
    stage: &str,
    items: &[String],
    json: bool,
) -> CliResult<()> {
    let stage_id = stage_arg(stage);
    let (parsed, _) = table.rule_for(&stage_id)?;
    let checklist = Checklist::from_items(items.iter().cloned());

    let report = CheckReport {
        stage: parsed,
        complete: table.is_checklist_complete(&stage_id, &checklist),
        missing: table.missing_items(&stage_id, &checklist)?,
    };
    tracing::debug!(stage = %parsed, complete = report.complete, "checked checklist");

    if json {
        return write_json(out, &report);
    }

    if report.complete {
        writeln!(out, "{}: checklist complete", report.stage)?;
    } else {
        writeln!(
            out,
            "{}: checklist incomplete, missing: {}",
            report.stage,
            report.missing.join(", ")
        )?;
    }
    Ok(())
}

/// Resolve the next stage and print the transition.
pub fn cmd_resolve(
    out: &mut dyn Write,
    table: &RuleTable,
    stage: &str,
    result: &str,
    items: &[String],
    json: bool,
) -> CliResult<()> {
    let checklist = Checklist::from_items(items.iter().cloned());
    let transition = table.transition(&stage_arg(stage), result, &checklist)?;
    tracing::info!(
        from = %transition.from,
        result = %transition.result,
        to = %transition.to,
        "resolved transition"
    );

    if json {
        return write_json(out, &transition);
    }

    let kind = if transition.is_stay() {
        "stay"
    } else if transition.is_archival() {
        "archive"
    } else {
        "advance"
    };
    writeln!(
        out,
        "{} --{}--> {} ({})",
        transition.from, transition.result, transition.to, kind
    )?;
    Ok(())
}

/// List valid results of a stage with their destinations.
pub fn cmd_options(
    out: &mut dyn Write,
    table: &RuleTable,
    stage: &str,
    json: bool,
) -> CliResult<()> {
    let options = table.result_options(&stage_arg(stage))?;

    if json {
        return write_json(out, &options);
    }

    if options.is_empty() {
        writeln!(out, "no results; reactivate the lead by hand")?;
    }
    for option in &options {
        writeln!(
            out,
            "{:<28} {:<52} -> {}",
            option.code, option.label, option.target_label
        )?;
    }
    Ok(())
}

// =============================================================================
// MOVE / CALLBACK
// =============================================================================

#[derive(Serialize)]
struct MoveReport {
    from: Target,
    to: Target,
    allowed: Vec<Target>,
}

/// Check a manual board move. A refused move is an error.
pub fn cmd_move(out: &mut dyn Write, from: &str, to: &str, json: bool) -> CliResult<()> {
    let from = target_arg(from)?;
    let to = target_arg(to)?;
    check_manual_move(from, to)?;

    if json {
        let report = MoveReport {
            from,
            to,
            allowed: allowed_moves(from).to_vec(),
        };
        return write_json(out, &report);
    }

    writeln!(out, "{from} -> {to}: allowed")?;
    Ok(())
}

#[derive(Serialize)]
struct CallbackReport {
    archive: bool,
    remaining: u32,
}

/// Decide whether the recorded callback archives the lead.
pub fn cmd_callback(
    out: &mut dyn Write,
    result: &str,
    recorded: u32,
    max: u32,
    json: bool,
) -> CliResult<()> {
    let limit = CallbackLimit::new(DEFAULT_CALLBACK_RESULT, max);
    let report = CallbackReport {
        archive: limit.should_archive(result, recorded),
        remaining: limit.remaining(recorded),
    };

    if json {
        return write_json(out, &report);
    }

    if report.archive {
        writeln!(out, "archive (callback limit of {} reached)", limit.max_callbacks)?;
    } else {
        writeln!(out, "keep ({} callback(s) left)", report.remaining)?;
    }
    Ok(())
}

// =============================================================================
// VALIDATE
// =============================================================================

#[derive(Serialize)]
struct ValidateReport {
    valid: bool,
    stages: Vec<Stage>,
    dead_ends: Vec<Stage>,
}

/// Load a rule file and report what it defines.
pub fn cmd_validate(out: &mut dyn Write, file: &Path, json: bool) -> CliResult<()> {
    let table = load_rules(Some(file))?;

    let report = ValidateReport {
        valid: true,
        stages: table.stages().map(|(stage, _)| stage).collect(),
        dead_ends: table
            .stages()
            .filter(|(_, rule)| rule.is_dead_end())
            .map(|(stage, _)| stage)
            .collect(),
    };

    if json {
        return write_json(out, &report);
    }

    writeln!(out, "{}: valid, {} stage(s)", file.display(), report.stages.len())?;
    if !report.dead_ends.is_empty() {
        let names: Vec<_> = report.dead_ends.iter().copied().map(Stage::id).collect();
        writeln!(out, "dead ends: {}", names.join(", "))?;
    }
    Ok(())
}
