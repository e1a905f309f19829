//! Calcul pur du planning de rotation.
//!
//! Aucun état persistant : la position dans la rotation pour un jour ouvré
//! donné est entièrement déterminée par la date d'ancrage, le motif et
//! l'ensemble des jours fériés. Le même appel redonne toujours le même
//! résultat, passé comme futur.

use crate::model::{Holiday, RotationConfig, ScheduleEntry, Status};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RotationError {
    #[error("invalid date range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Résultat d'un calcul : entrées émises + fériés de l'intervalle demandé.
#[derive(Debug, Clone, Default)]
pub struct ScheduleResult {
    pub entries: Vec<ScheduleEntry>,
    pub holidays: Vec<Holiday>,
}

/// Samedi ou dimanche, quel que soit le fuseau ou la locale.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Jour ouvré : ni week-end, ni férié.
pub fn is_working_day(date: NaiveDate, holidays: &HashSet<NaiveDate>) -> bool {
    !is_weekend(date) && !holidays.contains(&date)
}

/// Nombre de jours ouvrés dans `[from, to)` (borne haute exclue).
pub fn working_days_between(from: NaiveDate, to: NaiveDate, holidays: &HashSet<NaiveDate>) -> u64 {
    let mut count = 0;
    let mut current = from;
    while current < to {
        if is_working_day(current, holidays) {
            count += 1;
        }
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    count
}

/// Ligne complète du motif pour le jour ouvré d'indice `day_index` :
/// un statut par bloc configuré.
///
/// Le motif est décalé circulairement vers la droite de `day_index +
/// config.offset` positions, donc le bloc *i* reçoit
/// `pattern[(i - décalage) mod len]`. Le jour d'ancrage (indice 0, décalage
/// nul) lit le motif tel quel.
pub fn day_statuses(config: &RotationConfig, day_index: u64) -> Vec<(String, Status)> {
    let blocks = config.effective_blocks();
    let pattern = config.effective_pattern();
    let len = pattern.len() as i64;
    let shift = (day_index + u64::from(config.offset)) as i64;

    blocks
        .into_iter()
        .enumerate()
        .map(|(i, block)| {
            let pos = (i as i64 - shift).rem_euclid(len) as usize;
            (block, pattern[pos].clone())
        })
        .collect()
}

/// Calcule le planning pour `[start, end]` inclusif.
///
/// Seuls les blocs dont le statut du jour vaut `config.away_status` sont
/// émis ; week-ends et fériés ne produisent rien et n'avancent pas le
/// compteur de rotation. Les fériés tombant dans l'intervalle demandé
/// (non tronqué) sont retournés à part.
pub fn compute(
    start: NaiveDate,
    end: NaiveDate,
    config: &RotationConfig,
    holidays: &[Holiday],
) -> Result<ScheduleResult, RotationError> {
    if end < start {
        return Err(RotationError::InvalidRange { start, end });
    }

    let epoch = config.start_date;
    if end < epoch {
        return Ok(ScheduleResult::default());
    }

    let clipped_start = start.max(epoch);
    let holiday_dates: HashSet<NaiveDate> = holidays.iter().map(|h| h.date).collect();

    // Position dans la rotation au premier jour demandé : jours ouvrés
    // écoulés depuis l'ancrage (ancrage inclus, premier jour exclu).
    let mut day_index = working_days_between(epoch, clipped_start, &holiday_dates);

    let mut entries = Vec::new();
    let mut current = clipped_start;
    while current <= end {
        if is_working_day(current, &holiday_dates) {
            for (block, status) in day_statuses(config, day_index) {
                if status == config.away_status {
                    entries.push(ScheduleEntry {
                        date: current,
                        block,
                        status,
                    });
                }
            }
            day_index += 1;
        }
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    let in_range = holidays
        .iter()
        .filter(|h| h.date >= start && h.date <= end)
        .cloned()
        .collect();

    Ok(ScheduleResult {
        entries,
        holidays: in_range,
    })
}
