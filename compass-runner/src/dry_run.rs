//! Dry runs against the simulated deck
//!
//! A dry run drives the real executor against [`SimDeck`] and keeps the
//! full command log, so a protocol can be checked end to end before it
//! touches an instrument.

use anyhow::{bail, Context, Result};
use compass_core::config::ProtocolConfig;
use compass_core::geometry::PlateGrid;
use compass_core::state::RunEvent;
use compass_core::transfer::{run_protocol, RunError, RunSummary};
use compass_core::validate::{validate_config, PlanGrids};
use compass_drivers::catalog::{find_labware, find_pipette, LabwareKind};
use compass_drivers::sim::{Command, CommandLog, SimDeck};
use tracing::{debug, info, warn};

/// Result of a dry run
#[derive(Debug)]
pub struct DryRun {
    /// How the run ended
    pub outcome: Result<RunSummary, RunError>,
    /// Every command the simulated deck accepted, in order
    pub commands: Vec<Command>,
}

/// Run the protocol on a fresh simulated deck
pub fn dry_run(config: &ProtocolConfig) -> DryRun {
    let log = CommandLog::new();
    let mut deck = SimDeck::new(&log);

    let outcome = run_protocol(&mut deck, config, &mut log_event);
    let commands = log.commands().to_vec();

    match &outcome {
        Ok(summary) => info!(
            transfers = summary.transfers,
            tips_consumed = summary.tips_consumed,
            tips_remaining = summary.tips_remaining,
            "Dry run complete"
        ),
        Err(e) => warn!(error = %e, commands = commands.len(), "Dry run aborted"),
    }

    DryRun { outcome, commands }
}

/// Check a protocol against the labware catalog without running it
pub fn validate_plan(config: &ProtocolConfig) -> Result<()> {
    let grids = PlanGrids {
        source: plate_grid(&config.source.load_name, LabwareKind::Plate)?,
        destination: plate_grid(&config.destination.load_name, LabwareKind::Plate)?,
        tiprack: plate_grid(&config.tiprack.load_name, LabwareKind::TipRack)?,
    };

    let pipette = find_pipette(&config.pipette.model)
        .with_context(|| format!("unknown pipette model '{}'", config.pipette.model))?;

    validate_config(config, &grids).map_err(|e| anyhow::anyhow!("invalid plan: {}", e))?;

    if config.mix.volume_ul > pipette.max_volume_ul {
        bail!(
            "mix volume {} uL exceeds {} capacity of {} uL",
            config.mix.volume_ul,
            pipette.model,
            pipette.max_volume_ul
        );
    }
    for (i, transfer) in config.transfers.iter().enumerate() {
        if transfer.volume_ul > pipette.max_volume_ul {
            bail!(
                "transfer {} volume {} uL exceeds {} capacity of {} uL",
                i,
                transfer.volume_ul,
                pipette.model,
                pipette.max_volume_ul
            );
        }
        if transfer.volume_ul < pipette.min_volume_ul {
            warn!(
                index = i,
                volume_ul = transfer.volume_ul,
                min_ul = pipette.min_volume_ul,
                "Transfer volume below pipette accuracy range"
            );
        }
    }

    info!(transfers = config.transfers.len(), "Plan is valid");
    Ok(())
}

fn plate_grid(load_name: &str, kind: LabwareKind) -> Result<PlateGrid> {
    let def = find_labware(load_name).with_context(|| format!("unknown labware '{}'", load_name))?;
    if def.kind != kind {
        bail!("'{}' is a {:?}, expected a {:?}", load_name, def.kind, kind);
    }
    Ok(def.grid)
}

fn log_event(event: &RunEvent) {
    match *event {
        RunEvent::Validated { transfers } => info!(transfers, "Plan validated"),
        RunEvent::HomingStarted => debug!("Homing"),
        RunEvent::Homed => info!("Homed"),
        RunEvent::Aborted(kind) => warn!(?kind, "Run aborted"),
        RunEvent::TransferStarted {
            index,
            source,
            dest,
        } => info!(index, %source, %dest, "Transfer started"),
        RunEvent::TipPickedUp { index, tip } => debug!(index, %tip, "Tip picked up"),
        RunEvent::PointMixed { index, point } => debug!(index, point = point.name(), "Mixed"),
        RunEvent::OffsetReset { index } => debug!(index, "Frame reset"),
        RunEvent::Aspirated { index, volume_ul } => debug!(index, volume_ul, "Aspirated"),
        RunEvent::Dispensed { index, volume_ul } => debug!(index, volume_ul, "Dispensed"),
        RunEvent::TipDropped { index } => debug!(index, "Tip dropped"),
        RunEvent::TransferFinished { index } => info!(index, "Transfer finished"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_protocol, EMBEDDED_PROTOCOL};
    use compass_drivers::sim::CommandKind;

    fn embedded() -> ProtocolConfig {
        parse_protocol(EMBEDDED_PROTOCOL).unwrap()
    }

    #[test]
    fn test_embedded_dry_run() {
        let run = dry_run(&embedded());
        let summary = run.outcome.unwrap();

        assert_eq!(summary.transfers, 2);
        assert_eq!(summary.tips_consumed, 2);
        assert_eq!(summary.tips_remaining, 0);

        let mixes = run
            .commands
            .iter()
            .filter(|c| c.kind() == CommandKind::Mix)
            .count();
        assert_eq!(mixes, 10);
        assert_eq!(run.commands.last(), Some(&Command::Home));
    }

    #[test]
    fn test_dry_run_keeps_log_on_abort() {
        let mut config = embedded();
        config.tips.truncate(1);

        let run = dry_run(&config);
        assert!(matches!(run.outcome, Err(RunError::Validation(_))));
        assert!(run.commands.iter().all(|c| !c.is_motion()));
        assert!(!run.commands.is_empty());
    }

    #[test]
    fn test_validate_embedded() {
        assert!(validate_plan(&embedded()).is_ok());
    }

    #[test]
    fn test_validate_unknown_labware() {
        let mut config = embedded();
        config.destination.load_name.clear();
        config.destination.load_name.push_str("corning_7_wellplate").unwrap();

        let err = validate_plan(&config).unwrap_err();
        assert!(err.to_string().contains("corning_7_wellplate"));
    }

    #[test]
    fn test_validate_tiprack_as_plate() {
        let mut config = embedded();
        config.source.load_name.clear();
        config
            .source
            .load_name
            .push_str("opentrons_96_tiprack_300ul")
            .unwrap();

        assert!(validate_plan(&config).is_err());
    }

    #[test]
    fn test_validate_volume_over_capacity() {
        let mut config = embedded();
        config.pipette.model.clear();
        config.pipette.model.push_str("p300_single_gen2").unwrap();
        config.mix.volume_ul = 200.0;

        let err = validate_plan(&config).unwrap_err();
        assert!(err.to_string().contains("transfer 0"));
    }
}
