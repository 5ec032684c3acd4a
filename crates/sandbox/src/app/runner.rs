use std::time::{Duration, Instant};

use targeting::{CycleKey, CycleOutcome, EntityId, GameHost, TargetingConfig, TargetingSession};
use tracing::{debug, info, warn};

use super::scenario::{Scenario, Step};
use super::sim_host::SimHost;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CycleRecord {
    pub step: usize,
    pub outcome: CycleOutcome,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RunReport {
    pub cycles: Vec<CycleRecord>,
    pub final_target: Option<EntityId>,
    pub frames: u64,
}

impl RunReport {
    pub(crate) fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .cycles
            .iter()
            .map(|record| match record.outcome {
                CycleOutcome::Targeted { id, index, reset } => format!(
                    "step {}: target {} '{}' index {}{}",
                    record.step,
                    id.0,
                    record.label.as_deref().unwrap_or("?"),
                    index,
                    reset.map_or(String::new(), |kind| format!(" (reset: {})", kind.name()))
                ),
                CycleOutcome::NoCandidates => format!("step {}: no candidates", record.step),
                CycleOutcome::Skipped => format!("step {}: skipped", record.step),
            })
            .collect();
        lines.push(match self.final_target {
            Some(id) => format!("final target: {}", id.0),
            None => "final target: none".to_string(),
        });
        lines
    }
}

struct Driver<'a> {
    host: SimHost,
    session: TargetingSession,
    key: CycleKey,
    config: &'a TargetingConfig,
    start: Instant,
    elapsed: Duration,
    frame: Duration,
    frames: u64,
}

impl Driver<'_> {
    fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    fn frame(&mut self, key_down: bool) -> Option<CycleOutcome> {
        self.elapsed += self.frame;
        self.frames += 1;
        let fired = self.key.update(key_down);
        let outcome = fired.then(|| self.session.on_cycle_input(&mut self.host, self.config));

        let now = self.now();
        self.session.update_visuals(&self.host, self.config, now);
        if self.config.debug_views_enabled() {
            let overlay = self.session.debug_overlay(&self.host, self.config);
            debug!(shapes = overlay.shapes.len(), "overlay_built");
        }
        outcome
    }

    fn wait(&mut self, duration: Duration) {
        let mut waited = Duration::ZERO;
        while waited < duration {
            self.frame(false);
            waited += self.frame;
        }
    }
}

pub(crate) fn run_scenario(scenario: &Scenario, config: &TargetingConfig) -> RunReport {
    let mut driver = Driver {
        host: scenario.build_host(),
        session: TargetingSession::new(),
        key: CycleKey::new(),
        config,
        start: Instant::now(),
        elapsed: Duration::ZERO,
        frame: Duration::from_millis(scenario.frame_ms.max(1)),
        frames: 0,
    };
    info!(
        scenario = %scenario.name,
        entities = scenario.entities.len(),
        steps = scenario.steps.len(),
        "scenario_started"
    );

    let mut report = RunReport::default();
    driver.frame(false);
    for (index, step) in scenario.steps.iter().enumerate() {
        let step_number = index + 1;
        match step {
            Step::Cycle => {
                let outcome = driver.frame(true).unwrap_or(CycleOutcome::Skipped);
                driver.frame(false);
                let label = match outcome {
                    CycleOutcome::Targeted { id, .. } => {
                        driver.host.entity(id).ok().map(|entity| entity.name)
                    }
                    _ => None,
                };
                info!(step = step_number, ?outcome, label = ?label, "cycle");
                report.cycles.push(CycleRecord {
                    step: step_number,
                    outcome,
                    label,
                });
            }
            Step::RotateCamera {
                yaw_degrees,
                pitch_degrees,
            } => {
                driver.host.camera.rotate(*yaw_degrees, *pitch_degrees);
                debug!(
                    step = step_number,
                    yaw = driver.host.camera.yaw_degrees,
                    pitch = driver.host.camera.pitch_degrees,
                    "camera_rotated"
                );
                driver.frame(false);
            }
            Step::Despawn { id } => {
                if !driver.host.despawn(EntityId(*id)) {
                    warn!(step = step_number, entity = id, "despawn_unknown_entity");
                }
                driver.frame(false);
            }
            Step::ClearTarget => {
                driver.host.set_target(None);
                driver.frame(false);
            }
            Step::Wait { ms } => driver.wait(Duration::from_millis(*ms)),
            Step::MoveEntity { id, position } => {
                if !driver.host.move_entity(EntityId(*id), *position) {
                    warn!(step = step_number, entity = id, "move_unknown_entity");
                }
                driver.frame(false);
            }
        }
    }

    report.final_target = driver.host.current_target();
    report.frames = driver.frames;
    info!(
        cycles = report.cycles.len(),
        frames = report.frames,
        "scenario_complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use targeting::TriggerKind;

    use super::*;

    fn targeted(record: &CycleRecord) -> (u64, usize, Option<TriggerKind>) {
        match record.outcome {
            CycleOutcome::Targeted { id, index, reset } => (id.0, index, reset),
            other => panic!("step {} did not target: {other:?}", record.step),
        }
    }

    #[test]
    fn demo_cycles_then_resets_on_camera_turn() {
        let scenario = Scenario::demo().expect("demo");
        let report = run_scenario(&scenario, &TargetingConfig::default());
        assert_eq!(report.cycles.len(), 6);

        let first = targeted(&report.cycles[0]);
        assert_eq!((first.1, first.2), (0, Some(TriggerKind::SetChanged)));
        assert_eq!(targeted(&report.cycles[1]).1, 1);
        assert_eq!(targeted(&report.cycles[2]).1, 2);

        let after_turn = targeted(&report.cycles[3]);
        assert_eq!(after_turn, (17, 0, Some(TriggerKind::CameraRotation)));

        let after_return = targeted(&report.cycles[4]);
        assert_eq!(after_return.1, 0);
        assert!(after_return.2.is_some());

        let after_clear = targeted(&report.cycles[5]);
        assert_eq!(after_clear.1, 0);
        assert_eq!(report.final_target, Some(EntityId(after_clear.0)));
    }

    #[test]
    fn demo_never_targets_filtered_or_hidden_entities() {
        let scenario = Scenario::demo().expect("demo");
        let report = run_scenario(&scenario, &TargetingConfig::default());
        for record in &report.cycles {
            let (id, _, _) = targeted(record);
            assert!(
                ![13, 14, 15].contains(&id),
                "step {} picked {id}",
                record.step
            );
        }
    }

    #[test]
    fn first_three_cycles_visit_distinct_targets() {
        let scenario = Scenario::demo().expect("demo");
        let report = run_scenario(&scenario, &TargetingConfig::default());
        let mut ids: Vec<u64> = report.cycles[..3]
            .iter()
            .map(|record| targeted(record).0)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn debug_views_do_not_change_outcomes() {
        let scenario = Scenario::demo().expect("demo");
        let plain = run_scenario(&scenario, &TargetingConfig::default());
        let debug = run_scenario(
            &scenario,
            &TargetingConfig {
                show_debug_selection: true,
                show_debug_raycast: true,
                ..TargetingConfig::default()
            },
        );
        let outcomes = |report: &RunReport| -> Vec<CycleOutcome> {
            report.cycles.iter().map(|record| record.outcome).collect()
        };
        assert_eq!(outcomes(&plain), outcomes(&debug));
    }

    #[test]
    fn empty_world_reports_no_candidates() {
        let scenario = Scenario::from_json_str(
            r#"{ "steps": [ { "action": "cycle" }, { "action": "despawn", "id": 9 } ] }"#,
            "inline",
        )
        .expect("parse");
        let report = run_scenario(&scenario, &TargetingConfig::default());
        assert_eq!(report.cycles[0].outcome, CycleOutcome::NoCandidates);
        assert_eq!(report.final_target, None);
        assert_eq!(
            report.summary_lines(),
            vec![
                "step 1: no candidates".to_string(),
                "final target: none".to_string()
            ]
        );
    }
}
