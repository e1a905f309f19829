#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rotaplan::{
    io,
    model::{HolidayId, LeaveId, RotationConfig, Status},
    planner::{month_bounds, Planner},
    report::{prepare_report, TextReport},
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de calendrier de rotation (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de calendrier
    #[arg(long, global = true, default_value = "calendar.json")]
    calendar: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Définir la rotation (blocs, motif, date d'ancrage)
    SetRotation {
        /// liste "A,B,C,D"
        #[arg(long, default_value = "A,B,C,D")]
        blocks: String,
        /// liste "WFA,WFO,WFO,WFO"
        #[arg(long, default_value = "WFA,WFO,WFO,WFO")]
        pattern: String,
        /// YYYY-MM-DD
        #[arg(long)]
        start_date: String,
        /// Décalage initial du motif, en jours ouvrés
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Afficher le planning d'un mois ou d'un intervalle
    Show {
        /// YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        start: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Ajouter un férié manuel
    AddHoliday {
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Supprimer un férié
    RemoveHoliday {
        #[arg(long)]
        id: String,
    },

    /// Importer des fériés (CSV `date,name[,description]` ou JSON plat)
    ImportHolidays {
        #[arg(long)]
        csv: Option<String>,
        #[arg(long)]
        json: Option<String>,
    },

    /// Lister les fériés d'une année, export CSV optionnel
    Holidays {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Poser un congé
    AddLeave {
        #[arg(long)]
        initials: String,
        /// YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// YYYY-MM-DD (défaut: identique à start)
        #[arg(long)]
        end: Option<String>,
    },

    /// Importer des congés depuis un CSV `initials,start,end`
    ImportLeaves {
        #[arg(long)]
        csv: String,
    },

    /// Modifier un congé existant
    UpdateLeave {
        #[arg(long)]
        id: String,
        #[arg(long)]
        initials: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: Option<String>,
    },

    /// Supprimer un congé
    RemoveLeave {
        #[arg(long)]
        id: String,
    },

    /// Lister/chercher les congés
    Leaves {
        /// YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// Recherche par initiales (sous-chaîne)
        #[arg(long)]
        initials: Option<String>,
    },

    /// Vérifier les chevauchements de congés
    Check {},

    /// Générer un rapport texte pour un mois
    Report {
        /// YYYY-MM
        #[arg(long)]
        month: String,
        /// Fichier de sortie (texte brut)
        #[arg(long)]
        out: String,
    },

    /// Exporter le calendrier complet en JSON
    Export {
        #[arg(long)]
        out: String,
    },

    /// Afficher le journal d'audit
    Audit {},
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.calendar)?;
    let mut planner = match storage.load() {
        Ok(c) => {
            let mut p = Planner::new();
            *p.calendar_mut() = c;
            p
        }
        Err(_) => Planner::new(),
    };

    let code = match cli.cmd {
        Commands::SetRotation {
            blocks,
            pattern,
            start_date,
            offset,
        } => {
            let blocks: Vec<String> = blocks
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            let pattern: Vec<Status> = pattern
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Status::from)
                .collect();
            let start_date = parse_date(&start_date)?;
            let mut config = RotationConfig::new(blocks, pattern, start_date);
            config.offset = offset;
            planner.set_rotation(config);
            storage.save(planner.calendar())?;
            0
        }
        Commands::Show {
            month,
            start,
            end,
            out_json,
            out_csv,
        } => {
            let (start, end) = resolve_range(month.as_deref(), start.as_deref(), end.as_deref())?;
            let view = planner.range_view(start, end)?;
            if let Some(path) = out_json {
                io::export_view_json(path, &view)?;
            }
            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &view)?;
            }
            // impression compacte
            for entry in &view.entries {
                println!("{} | bloc {} | {}", entry.date, entry.block, entry.status);
            }
            for h in &view.holidays {
                println!("{} | férié | {}", h.date, h.name);
            }
            for l in &view.leaves {
                println!("{} → {} | congé | {}", l.start, l.end, l.initials);
            }
            0
        }
        Commands::AddHoliday {
            date,
            name,
            description,
        } => {
            let date = parse_date(&date)?;
            let id = planner.add_holiday(date, &name, description)?;
            storage.save(planner.calendar())?;
            println!("Holiday added: {}", id.as_str());
            0
        }
        Commands::RemoveHoliday { id } => {
            let removed = planner.remove_holiday(&HolidayId::new(id))?;
            storage.save(planner.calendar())?;
            println!("Holiday removed: {} ({})", removed.name, removed.date);
            0
        }
        Commands::ImportHolidays { csv, json } => {
            let incoming = match (csv, json) {
                (Some(path), None) => io::import_holidays_csv(path)?,
                (None, Some(path)) => io::import_holidays_json(path)?,
                _ => bail!("exactly one of --csv or --json is required"),
            };
            let count = planner.upsert_holidays(incoming);
            storage.save(planner.calendar())?;
            println!("Imported {count} holiday(s)");
            0
        }
        Commands::Holidays { year, out_csv } => {
            let holidays: Vec<_> = planner.holidays_in_year(year).into_iter().cloned().collect();
            if let Some(path) = out_csv {
                io::export_holidays_csv(path, &holidays)?;
            }
            for h in &holidays {
                println!("{} | {} | {}", h.id.as_str(), h.date, h.name);
            }
            0
        }
        Commands::AddLeave {
            initials,
            start,
            end,
        } => {
            let start = parse_date(&start)?;
            let end = match end {
                Some(raw) => parse_date(&raw)?,
                None => start,
            };
            let id = planner.add_leave(&initials, start, end)?;
            storage.save(planner.calendar())?;
            println!("Leave added: {}", id.as_str());
            0
        }
        Commands::ImportLeaves { csv } => {
            let incoming = io::import_leaves_csv(csv)?;
            let count = planner.import_leaves(incoming);
            storage.save(planner.calendar())?;
            println!("Imported {count} leave(s)");
            0
        }
        Commands::UpdateLeave {
            id,
            initials,
            start,
            end,
        } => {
            let start = parse_date(&start)?;
            let end = match end {
                Some(raw) => parse_date(&raw)?,
                None => start,
            };
            planner.update_leave(&LeaveId::new(id), &initials, start, end)?;
            storage.save(planner.calendar())?;
            println!("Leave updated");
            0
        }
        Commands::RemoveLeave { id } => {
            let removed = planner.remove_leave(&LeaveId::new(id))?;
            storage.save(planner.calendar())?;
            println!(
                "Leave removed: {} ({} → {})",
                removed.initials, removed.start, removed.end
            );
            0
        }
        Commands::Leaves { month, initials } => {
            let leaves: Vec<_> = match (month, initials) {
                (Some(m), None) => {
                    let (start, end) = parse_month(&m)?;
                    planner.leaves_overlapping(start, end).into_iter().cloned().collect()
                }
                (None, Some(q)) => planner.leaves_for_initials(&q).into_iter().cloned().collect(),
                (Some(m), Some(q)) => {
                    let (start, end) = parse_month(&m)?;
                    planner
                        .leaves_overlapping(start, end)
                        .into_iter()
                        .filter(|l| l.initials.contains(&q.trim().to_ascii_uppercase()))
                        .cloned()
                        .collect()
                }
                (None, None) => planner.calendar().leaves.clone(),
            };
            for l in &leaves {
                println!(
                    "{} | {} → {} | {} | {}j",
                    l.id.as_str(),
                    l.start,
                    l.end,
                    l.initials,
                    l.duration_days()
                );
            }
            0
        }
        Commands::Check {} => {
            let overlaps = planner.detect_overlaps();
            if overlaps.is_empty() {
                println!("OK: no overlapping leaves");
                0
            } else {
                eprintln!("Found {} overlap(s)", overlaps.len());
                for o in &overlaps {
                    eprintln!(
                        "{} | {} / {}",
                        o.initials,
                        o.leave_a.as_str(),
                        o.leave_b.as_str()
                    );
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Report { month, out } => {
            let (start, _) = parse_month(&month)?;
            let renderer = TextReport;
            let report = prepare_report(&planner, start.year(), start.month(), Utc::now(), &renderer)?;
            std::fs::write(&out, report.content)?;
            println!(
                "Report generated for {}-{:02} at {}",
                report.year,
                report.month,
                report.generated_at.to_rfc3339()
            );
            0
        }
        Commands::Export { out } => {
            io::export_calendar_json(&out, planner.calendar())?;
            println!("Calendar exported to {out}");
            0
        }
        Commands::Audit {} => {
            for entry in &planner.calendar().audit {
                println!(
                    "{} | {} | {}",
                    entry.at.to_rfc3339(),
                    entry.action.as_str(),
                    entry.details
                );
            }
            0
        }
    };

    std::process::exit(code);
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date (expected YYYY-MM-DD): {raw}"))
}

/// "YYYY-MM" → premier et dernier jour du mois.
fn parse_month(raw: &str) -> Result<(NaiveDate, NaiveDate)> {
    let Some((year, month)) = raw.trim().split_once('-') else {
        bail!("invalid month (expected YYYY-MM): {raw}");
    };
    let year: i32 = year.parse()?;
    let month: u32 = month.parse()?;
    month_bounds(year, month).ok_or_else(|| anyhow::anyhow!("invalid month: {raw}"))
}

fn resolve_range(
    month: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(NaiveDate, NaiveDate)> {
    match (month, start, end) {
        (_, Some(s), Some(e)) => Ok((parse_date(s)?, parse_date(e)?)),
        (Some(m), None, None) => parse_month(m),
        _ => bail!("either --month (YYYY-MM) or --start/--end (YYYY-MM-DD) required"),
    }
}
