use crate::planner::{CalendarView, Planner};
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Représente un rapport texte généré pour un mois.
#[derive(Debug, Clone)]
pub struct Report {
    pub year: i32,
    pub month: u32,
    pub generated_at: DateTime<Utc>,
    pub content: String,
}

/// Permet de customiser le rendu (texte, mail, chat, etc.).
pub trait ReportRenderer {
    fn render(&self, view: &CalendarView, generated_at: DateTime<Utc>) -> String;
}

/// Gabarit texte simple, prêt à coller dans un mail ou un canal d'équipe.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport;

impl ReportRenderer for TextReport {
    fn render(&self, view: &CalendarView, generated_at: DateTime<Utc>) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Planning rotation du {} au {}\n\n",
            view.start, view.end
        ));

        if view.entries.is_empty() {
            out.push_str("Aucun jour ouvré planifié sur cet intervalle.\n");
        } else {
            for entry in &view.entries {
                out.push_str(&format!(
                    "{}  bloc {}  {}\n",
                    entry.date, entry.block, entry.status
                ));
            }
        }

        if !view.holidays.is_empty() {
            out.push_str("\nJours fériés :\n");
            for h in &view.holidays {
                out.push_str(&format!("{}  {}\n", h.date, h.name));
            }
        }

        if !view.leaves.is_empty() {
            out.push_str("\nCongés :\n");
            for l in &view.leaves {
                if l.start == l.end {
                    out.push_str(&format!("{}  {}\n", l.start, l.initials));
                } else {
                    out.push_str(&format!("{} -> {}  {}\n", l.start, l.end, l.initials));
                }
            }
        }

        out.push_str(&format!("\nGénéré le {}.\n", generated_at.to_rfc3339()));
        out
    }
}

/// Prépare le rapport d'un mois calendaire.
pub fn prepare_report(
    planner: &Planner,
    year: i32,
    month: u32,
    now: DateTime<Utc>,
    renderer: &dyn ReportRenderer,
) -> Result<Report> {
    let view = planner.month_view(year, month)?;
    let content = renderer.render(&view, now);
    Ok(Report {
        year,
        month,
        generated_at: now,
        content,
    })
}
