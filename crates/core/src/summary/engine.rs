//! Participation summary engine

use std::fmt::Write as _;

use huddle_domain::{
    AvailabilityRecord, Group, OptimalTimeSlot, ParticipationSummary, ScoringConfig, TimeSlotKey,
};
use tracing::debug;

use super::ports::SlotFormatter;
use crate::scoring::engine::member_records;
use crate::scoring::ScoringEngine;

/// Builds per-group participation summaries on top of the scoring engine.
#[derive(Debug, Clone, Default)]
pub struct SummaryEngine {
    scoring: ScoringEngine,
}

impl SummaryEngine {
    /// Engine ranking with `config`.
    pub fn new(config: ScoringConfig) -> Self {
        Self { scoring: ScoringEngine::new(config) }
    }

    /// Scoring engine used for ranking.
    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    /// Summarise participation for `group` over `candidates`.
    ///
    /// A member has responded once their record marks at least one slot
    /// available.
    pub fn summarize(
        &self,
        group: &Group,
        records: &[AvailabilityRecord],
        candidates: &[TimeSlotKey],
    ) -> ParticipationSummary {
        let respondents = member_records(group, records);
        let total_participants = respondents.len();
        let responded_count = respondents.iter().filter(|record| record.has_responded()).count();
        let response_rate = if total_participants == 0 {
            0.0
        } else {
            responded_count as f64 / total_participants as f64
        };

        let ranked = self.scoring.score_slots(candidates, &respondents);
        let limit = self.scoring.config().popular_slots_limit;

        debug!(
            group_id = %group.id,
            total_participants,
            responded_count,
            candidates = candidates.len(),
            "participation summarised"
        );

        ParticipationSummary {
            total_participants,
            responded_count,
            response_rate,
            most_popular_slots: ranked.iter().take(limit).cloned().collect(),
            least_popular_slots: least_popular(&ranked, limit),
        }
    }

    /// Plain-text summary for sharing outside the app.
    pub fn render_share_text(
        &self,
        title: &str,
        date_range: &str,
        summary: &ParticipationSummary,
        formatter: &dyn SlotFormatter,
    ) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "{title}");
        let _ = writeln!(text, "{date_range}");
        let _ = writeln!(
            text,
            "Responses: {}/{} ({}%)",
            summary.responded_count,
            summary.total_participants,
            summary.response_percent()
        );

        let top: Vec<&OptimalTimeSlot> = summary
            .most_popular_slots
            .iter()
            .filter(|slot| slot.available_count() > 0)
            .take(self.scoring.config().share_top_slots)
            .collect();

        if top.is_empty() {
            text.push_str("No overlapping availability yet");
            return text;
        }

        text.push_str("Best times:");
        for (rank, slot) in top.iter().enumerate() {
            let _ = write!(
                text,
                "\n{}. {} {} ({}/{} available)",
                rank + 1,
                formatter.format_date(&slot.time_slot.date),
                formatter.format_hour_range(slot.time_slot.hour),
                slot.available_count(),
                slot.total_respondents()
            );
        }
        text
    }
}

/// Lowest scores first, chronological among equals.
fn least_popular(ranked: &[OptimalTimeSlot], limit: usize) -> Vec<OptimalTimeSlot> {
    let mut ascending = ranked.to_vec();
    ascending.sort_by(|a, b| {
        a.score.total_cmp(&b.score).then_with(|| a.time_slot.cmp(&b.time_slot))
    });
    ascending.truncate(limit);
    ascending
}
