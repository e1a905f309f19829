use crate::model::{Calendar, Holiday, Leave};
use crate::planner::CalendarView;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Import de fériés depuis CSV: header `date,name[,description]`
pub fn import_holidays_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Holiday>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let date = rec.get(0).context("missing date")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        if date.is_empty() || name.is_empty() {
            bail!("invalid holiday row (empty)");
        }
        let date = parse_date(date)?;
        let mut holiday = Holiday::new(date, name);
        if let Some(desc) = rec.get(2) {
            let desc = desc.trim();
            if !desc.is_empty() {
                holiday.description = Some(desc.to_string());
            }
        }
        out.push(holiday);
    }
    Ok(out)
}

/// Import de fériés depuis un export JSON plat `{"YYYY-MM-DD": "Nom"}`
/// (format du flux externe de jours fériés).
pub fn import_holidays_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Holiday>> {
    let data = fs::read(&path)
        .with_context(|| format!("reading {}", path.as_ref().display()))?;
    let map: BTreeMap<String, String> =
        serde_json::from_slice(&data).with_context(|| "parsing holidays json")?;
    let mut out = Vec::new();
    for (date_raw, name) in map {
        let date = parse_date(date_raw.trim())
            .with_context(|| format!("invalid holiday date: {date_raw}"))?;
        out.push(Holiday::new(date, name));
    }
    Ok(out)
}

/// Import de congés depuis CSV: header `initials,start,end`
pub fn import_leaves_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Leave>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let initials = rec.get(0).context("missing initials")?.trim();
        let start = rec.get(1).context("missing start")?.trim();
        let end = rec.get(2).map(str::trim).filter(|s| !s.is_empty());
        let start = parse_date(start)?;
        let end = match end {
            Some(raw) => parse_date(raw)?,
            None => start,
        };
        let leave = Leave::new(initials, start, end).map_err(anyhow::Error::msg)?;
        out.push(leave);
    }
    Ok(out)
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}

/// Export JSON du calendrier (jolie mise en forme)
pub fn export_calendar_json<P: AsRef<Path>>(path: P, calendar: &Calendar) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(calendar)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export JSON d'une vue (planning + fériés + congés d'un intervalle)
pub fn export_view_json<P: AsRef<Path>>(path: P, view: &CalendarView) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(view)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV du planning: header `date,block,status`
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, view: &CalendarView) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "block", "status"])?;
    for entry in &view.entries {
        let date = entry.date.to_string();
        w.write_record([date.as_str(), entry.block.as_str(), entry.status.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des fériés: header `date,name,description,manual`
pub fn export_holidays_csv<P: AsRef<Path>>(path: P, holidays: &[Holiday]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "name", "description", "manual"])?;
    for h in holidays {
        let date = h.date.to_string();
        w.write_record([
            date.as_str(),
            h.name.as_str(),
            h.description.as_deref().unwrap_or(""),
            if h.manual { "true" } else { "false" },
        ])?;
    }
    w.flush()?;
    Ok(())
}
