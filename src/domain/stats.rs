use std::collections::BTreeMap;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::label_space::LabelSpace;
use crate::domain::segmentation::{AreaEntry, ConfidenceEntry, LabelMap, ProbabilityVolume};

pub const TOP_CLASSES_LIMIT: usize = 8;
pub const AREA_STATS_LIMIT: usize = 12;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassRankings {
    pub top_classes: Vec<ConfidenceEntry>,
    pub area_stats: Vec<AreaEntry>,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// One entry per present class, ascending by class id, before ranking.
pub fn per_class_entries(
    map: &LabelMap,
    probs: &ProbabilityVolume,
    labels: &LabelSpace,
) -> DomainResult<(Vec<ConfidenceEntry>, Vec<AreaEntry>)> {
    let (h, w) = (map.height(), map.width());
    if probs.size() != (h, w) {
        return Err(DomainError::InvalidInput(format!(
            "label map {h}x{w} does not match probability volume {:?}",
            probs.size()
        )));
    }

    let k = probs.num_classes();
    let volume = probs.view();

    // class_id -> (pixel count, summed probability of that class)
    let mut acc: BTreeMap<u32, (usize, f64)> = BTreeMap::new();
    for ((y, x), &class_id) in map.view().indexed_iter() {
        if class_id as usize >= k {
            return Err(DomainError::InvalidInput(format!(
                "class {class_id} has no probability plane (K={k})"
            )));
        }
        let slot = acc.entry(class_id).or_insert((0, 0.0));
        slot.0 += 1;
        slot.1 += volume[[class_id as usize, y, x]] as f64;
    }

    let total = (h * w) as f64;
    let mut confidences = Vec::with_capacity(acc.len());
    let mut areas = Vec::with_capacity(acc.len());
    for (class_id, (count, prob_sum)) in acc {
        if count == 0 {
            continue;
        }
        let label = labels.label(class_id);
        confidences.push(ConfidenceEntry {
            class_id,
            label: label.clone(),
            confidence: round_to(prob_sum / count as f64, 4),
        });
        areas.push(AreaEntry {
            class_id,
            label,
            area_ratio: round_to(100.0 * count as f64 / total, 2),
        });
    }
    Ok((confidences, areas))
}

/// Ranks present classes by mean confidence (top 8) and by covered area (top 12).
/// Both sorts are stable, so equal scores keep ascending class-id order.
pub fn class_stats(
    map: &LabelMap,
    probs: &ProbabilityVolume,
    labels: &LabelSpace,
) -> DomainResult<ClassRankings> {
    let (mut top_classes, mut area_stats) = per_class_entries(map, probs, labels)?;

    top_classes.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    top_classes.truncate(TOP_CLASSES_LIMIT);

    area_stats.sort_by(|a, b| b.area_ratio.total_cmp(&a.area_ratio));
    area_stats.truncate(AREA_STATS_LIMIT);

    Ok(ClassRankings { top_classes, area_stats })
}
