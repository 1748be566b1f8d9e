//! Read models for the stage screens and the packing dashboard.

use super::{
    Bin, Chamber, ChamberTask, Dispatch, PackedBox, Pallet, PreselectionSession,
    PreselectionWorker, ProcessProduct, ProcessSession, SessionInput, TruckEntry,
};
use crate::kpi::{efficiency, merma, round2, total_kg};
use serde::Serialize;

fn bin_kg(bins: &[Bin]) -> f64 {
    round2(total_kg(bins.iter().map(|b| b.net_weight)))
}

fn box_kg(boxes: &[PackedBox]) -> f64 {
    round2(total_kg(boxes.iter().map(|b| b.weight_kg)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckEntrySummary {
    #[serde(flatten)]
    pub entry: TruckEntry,
    pub bins: Vec<Bin>,
    pub total_weight: f64,
}

impl TruckEntrySummary {
    pub fn new(entry: TruckEntry, bins: Vec<Bin>) -> Self {
        Self {
            total_weight: bin_kg(&bins),
            entry,
            bins,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreselectionSummary {
    #[serde(flatten)]
    pub session: PreselectionSession,
    pub input_bins: Vec<Bin>,
    pub output_bins: Vec<Bin>,
    pub workers: Vec<PreselectionWorker>,
    pub inputs: Vec<SessionInput>,
    pub total_input_kg: f64,
    pub total_output_kg: f64,
    pub merma: f64,
    pub net_duration_hours: Option<f64>,
}

impl PreselectionSummary {
    pub fn new(
        session: PreselectionSession,
        input_bins: Vec<Bin>,
        output_bins: Vec<Bin>,
        workers: Vec<PreselectionWorker>,
        inputs: Vec<SessionInput>,
    ) -> Self {
        let total_input_kg = bin_kg(&input_bins);
        let total_output_kg = bin_kg(&output_bins);
        Self {
            merma: round2(merma(total_input_kg, total_output_kg, session.discard_kg)),
            net_duration_hours: session.timing.net_duration_hours(),
            total_input_kg,
            total_output_kg,
            session,
            input_bins,
            output_bins,
            workers,
            inputs,
        }
    }

    /// More output plus discard than input; shown as a warning
    pub fn has_negative_merma(&self) -> bool {
        self.merma < 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChamberSummary {
    #[serde(flatten)]
    pub chamber: Chamber,
    pub bins: Vec<Bin>,
    pub bin_count: usize,
    pub total_kg: f64,
    pub over_capacity: bool,
    pub recent_tasks: Vec<ChamberTask>,
}

impl ChamberSummary {
    /// Bins are listed in the order they entered the chamber
    pub fn new(chamber: Chamber, mut bins: Vec<Bin>, recent_tasks: Vec<ChamberTask>) -> Self {
        bins.sort_by_key(|b| b.chamber_entry_date);
        Self {
            bin_count: bins.len(),
            total_kg: bin_kg(&bins),
            over_capacity: chamber.is_over_capacity(bins.len()),
            chamber,
            bins,
            recent_tasks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSummary {
    #[serde(flatten)]
    pub session: ProcessSession,
    pub input_bins: Vec<Bin>,
    pub box_count: usize,
    pub total_input_kg: f64,
    pub total_box_kg: f64,
    pub efficiency: f64,
    pub total_discard_kg: f64,
    pub products: Vec<ProcessProduct>,
    pub net_duration_hours: Option<f64>,
}

impl ProcessSummary {
    pub fn new(
        session: ProcessSession,
        input_bins: Vec<Bin>,
        boxes: &[PackedBox],
        products: Vec<ProcessProduct>,
    ) -> Self {
        let total_input_kg = bin_kg(&input_bins);
        let total_box_kg = box_kg(boxes);
        Self {
            box_count: boxes.len(),
            efficiency: efficiency(total_box_kg, total_input_kg),
            total_discard_kg: round2(session.total_discard_kg()),
            net_duration_hours: session.timing.net_duration_hours(),
            total_input_kg,
            total_box_kg,
            session,
            input_bins,
            products,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PalletSummary {
    #[serde(flatten)]
    pub pallet: Pallet,
    pub box_count: usize,
    pub total_weight: f64,
}

impl PalletSummary {
    pub fn new(pallet: Pallet, boxes: &[PackedBox]) -> Self {
        Self {
            pallet,
            box_count: boxes.len(),
            total_weight: box_kg(boxes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchSummary {
    #[serde(flatten)]
    pub dispatch: Dispatch,
    pub pallets: Vec<PalletSummary>,
    pub pallet_count: usize,
    pub box_count: usize,
    pub total_weight: f64,
}

impl DispatchSummary {
    pub fn new(dispatch: Dispatch, pallets: Vec<PalletSummary>) -> Self {
        Self {
            pallet_count: pallets.len(),
            box_count: pallets.iter().map(|p| p.box_count).sum(),
            total_weight: round2(pallets.iter().map(|p| p.total_weight).sum()),
            dispatch,
            pallets,
        }
    }
}

/// Counters for the pipeline strip on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowCounts {
    pub truck_entries_today: usize,
    pub bins_in_preselection: usize,
    pub bins_in_chamber: usize,
    pub bins_in_process: usize,
    pub pallets_on_floor: usize,
    pub dispatches_this_month: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingDashboard {
    pub bins_in_yard: usize,
    pub kg_processed_today: f64,
    pub boxes_today: usize,
    pub line_efficiency: f64,
    pub flow: FlowCounts,
    pub chambers: Vec<ChamberSummary>,
    pub active_preselection: Option<PreselectionSummary>,
    pub active_process: Option<ProcessSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::{NewBin, NewChamber};
    use crate::tenant::TenantId;
    use chrono::{Duration, Utc};

    fn bin(weight: f64) -> Bin {
        Bin::weigh_in(
            TenantId::new("t1").unwrap(),
            "B-2024-0001".into(),
            NewBin {
                field_name: "Finca Norte".into(),
                fruit_type: "Limón".into(),
                lot_name: "L1".into(),
                net_weight: weight,
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_preselection_merma_is_derived() {
        let mut session = PreselectionSession::start(
            TenantId::new("t1").unwrap(),
            "LI-2024-001".into(),
            vec![],
            Utc::now(),
        )
        .unwrap();
        session.discard_kg = 50.0;

        let summary = PreselectionSummary::new(
            session.clone(),
            vec![bin(400.0), bin(600.0)],
            vec![bin(500.0), bin(400.0)],
            vec![],
            vec![],
        );
        assert_eq!(summary.total_input_kg, 1000.0);
        assert_eq!(summary.total_output_kg, 900.0);
        assert_eq!(summary.merma, 50.0);
        assert!(!summary.has_negative_merma());

        let over = PreselectionSummary::new(
            session,
            vec![bin(400.0)],
            vec![bin(450.0)],
            vec![],
            vec![],
        );
        assert_eq!(over.merma, -100.0);
        assert!(over.has_negative_merma());
    }

    #[test]
    fn test_chamber_bins_ordered_by_entry() {
        let chamber = Chamber::create(
            TenantId::new("t1").unwrap(),
            NewChamber {
                name: "Cámara 1".into(),
                capacity: Some(1),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();

        let now = Utc::now();
        let mut late = bin(300.0);
        late.chamber_entry_date = Some(now);
        let mut early = bin(200.0);
        early.chamber_entry_date = Some(now - Duration::hours(2));

        let summary = ChamberSummary::new(chamber, vec![late.clone(), early.clone()], vec![]);
        assert_eq!(summary.bins[0].id, early.id);
        assert_eq!(summary.total_kg, 500.0);
        assert!(summary.over_capacity);
    }

    #[test]
    fn test_empty_process_has_zero_efficiency() {
        let session = ProcessSession::start(
            TenantId::new("t1").unwrap(),
            "proceso-001".into(),
            Utc::now(),
        );
        let summary = ProcessSummary::new(session, vec![], &[], vec![]);
        assert_eq!(summary.efficiency, 0.0);
        assert_eq!(summary.box_count, 0);
    }
}
